//! Decklist → ordered list of card face images on disk.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::api::ScryfallClient;
use crate::cache::ImageCache;
use crate::error::Result;
use crate::models::{DeckEntry, Decklist, Printing, RelatedPart};
use crate::overrides::SetOverrides;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Append one copy of every token the deck's cards create
    pub include_tokens: bool,
}

/// Cache-or-download every face of one physical copy, front first
fn push_copy(
    images: &mut Vec<PathBuf>,
    printing: &Printing,
    client: &ScryfallClient,
    cache: &ImageCache,
) -> Result<()> {
    for face_index in printing.face_indices() {
        images.push(cache.get_or_download(printing, client, face_index)?);
    }
    Ok(())
}

/// Resolve every entry and gather image paths in print order.
///
/// Each copy contributes its front image followed by its back image for
/// double-faced printings. The first card that cannot be resolved aborts the
/// whole run. `progress` is called after each entry with (done, total, entry).
pub fn collect_card_images<F>(
    decklist: &Decklist,
    overrides: &SetOverrides,
    client: &ScryfallClient,
    cache: &ImageCache,
    options: BuildOptions,
    mut progress: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(usize, usize, &DeckEntry),
{
    let total = decklist.unique_cards();
    let mut images = Vec::new();
    let mut tokens: Vec<RelatedPart> = Vec::new();
    let mut seen_tokens = HashSet::new();

    for (i, entry) in decklist.entries.iter().enumerate() {
        let set_code = overrides.effective_set(entry);
        let printing = client.card_by_name(&entry.name, set_code)?;
        log::info!(
            "Resolved '{}' to {} ({}) #{}",
            entry.name,
            printing.name,
            printing.set_code,
            printing.collector_number
        );

        for _ in 0..entry.count {
            push_copy(&mut images, &printing, client, cache)?;
        }

        if options.include_tokens {
            for part in printing.related.iter().filter(|p| p.is_token()) {
                if seen_tokens.insert(part.name.clone()) {
                    tokens.push(part.clone());
                }
            }
        }

        progress(i + 1, total, entry);
    }

    for token in &tokens {
        let printing = client.card_by_uri(&token.uri)?;
        log::info!("Adding token {} ({})", printing.name, printing.set_code);
        push_copy(&mut images, &printing, client, cache)?;
    }

    Ok(images)
}
