//! Decklist text parsing.
//!
//! Understands the common export formats (Moxfield, Arena, Manabox, MTGGoldfish
//! and plain "4 Card Name" lists). Section headers, comments and anything that
//! does not look like a card line are skipped.

use std::path::Path;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::models::{DeckEntry, Decklist};

lazy_static! {
    /// Card line formats, most specific first. The first match wins.
    static ref CARD_PATTERNS: Vec<Regex> = vec![
        // Moxfield/Arena/Manabox: 4 Card (SET) 123 *F*
        Regex::new(r"^(\d+)x?\s+(.+?)\s*\((\w+)\)\s*\d*\s*(?:\*F\*)?$").unwrap(),
        // MTGGoldfish: 4 Card <set>
        Regex::new(r"^(\d+)x?\s+(.+?)\s*<(\w+)>$").unwrap(),
        // Simple: 4 Card or 4x Card
        Regex::new(r"^(\d+)x?\s+(.+?)$").unwrap(),
    ];

    static ref IGNORE_PATTERNS: Vec<Regex> = vec![
        RegexBuilder::new(r"^(Main|Main Deck|Sideboard|Companion|Commander)")
            .case_insensitive(true)
            .build()
            .unwrap(),
        Regex::new(r"^(Creatures?|Spells?|Lands?|Planeswalkers?|Artifacts?|Enchantments?)\s*\(\d+\)").unwrap(),
        Regex::new(r"^(Built with|Exported from|Shared via|//)").unwrap(),
        Regex::new(r"^\s*$").unwrap(),
    ];
}

/// True for section headers, comments, export banners and blank lines
pub fn should_ignore_line(line: &str) -> bool {
    IGNORE_PATTERNS.iter().any(|p| p.is_match(line))
}

/// Parse a single decklist line. Returns `None` for anything that is not a card.
pub fn parse_line(line: &str) -> Option<DeckEntry> {
    let line = line.trim();
    if should_ignore_line(line) {
        return None;
    }

    for pattern in CARD_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(line) {
            let count: u32 = match caps[1].parse() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::debug!("Skipping line with unusable count: {line}");
                    return None;
                }
            };
            let name = caps[2].trim().to_string();
            let set_override = caps.get(3).map(|m| m.as_str().to_string());
            return Some(DeckEntry {
                name,
                count,
                set_override,
            });
        }
    }

    log::debug!("Skipping unrecognized line: {line}");
    None
}

/// Parse decklist text into entries, in order
pub fn parse_decklist_str(content: &str) -> Decklist {
    Decklist::new(content.lines().filter_map(parse_line).collect())
}

/// Read and parse a decklist file
pub fn parse_decklist<P: AsRef<Path>>(path: P) -> Result<Decklist> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let decklist = parse_decklist_str(&content);
    log::info!(
        "Parsed {} entries ({} cards) from {}",
        decklist.unique_cards(),
        decklist.total_cards(),
        path.as_ref().display()
    );
    Ok(decklist)
}

#[cfg(test)]
#[path = "decklist_tests.rs"]
mod tests;
