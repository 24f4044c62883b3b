//! MTG Print - proxy sheets from decklists
//!
//! Parses a decklist, resolves every card on Scryfall, caches the card images
//! locally and lays them out on a printable PDF.

pub mod api;
pub mod cache;
pub mod config;
pub mod decklist;
pub mod error;
pub mod models;
pub mod overrides;
pub mod pipeline;
pub mod sheet;
pub mod terminal;

// Re-export commonly used items
pub use api::{ScryfallCard, ScryfallClient};
pub use cache::{CacheStats, ImageCache};
pub use config::{Config, PaperSize};
pub use decklist::{parse_decklist, parse_decklist_str, parse_line};
pub use error::{Error, Result};
pub use models::{DeckEntry, Decklist, Face, Printing, RelatedPart};
pub use overrides::SetOverrides;
pub use pipeline::{collect_card_images, BuildOptions};
pub use sheet::{SheetGenerator, SheetLayout};
