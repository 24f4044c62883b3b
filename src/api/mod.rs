//! API clients for external services (Scryfall)

pub mod scryfall;

pub use scryfall::{ScryfallCard, ScryfallClient};
