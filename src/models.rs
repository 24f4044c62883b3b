use chrono::NaiveDate;

/// One card line of a decklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub name: String,
    pub count: u32,
    /// Set code embedded in the decklist line, if any
    pub set_override: Option<String>,
}

impl DeckEntry {
    pub fn new(name: impl Into<String>, count: u32, set_override: Option<String>) -> Self {
        Self {
            name: name.into(),
            count,
            set_override,
        }
    }
}

/// Parsed decklist. Entries keep file order and duplicate lines are not merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decklist {
    pub entries: Vec<DeckEntry>,
}

impl Decklist {
    pub fn new(entries: Vec<DeckEntry>) -> Self {
        Self { entries }
    }

    /// Sum of all requested copies
    pub fn total_cards(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    /// Number of card lines
    pub fn unique_cards(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One printable side of a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// 0 = front, 1 = back
    pub index: usize,
    pub image_uri_small: Option<String>,
    pub image_uri_large: String,
}

/// A card linked from another one on Scryfall (tokens, meld pieces, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedPart {
    pub name: String,
    /// Scryfall component: "token", "meld_part", "meld_result", "combo_piece"
    pub component: String,
    pub uri: String,
}

impl RelatedPart {
    pub fn is_token(&self) -> bool {
        self.component == "token"
    }
}

/// A resolved printing of a card.
///
/// Double-faced printings always carry exactly two faces, all others exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Printing {
    pub name: String,
    pub set_code: String,
    pub set_name: String,
    pub collector_number: String,
    pub release_date: Option<NaiveDate>,
    pub is_double_faced: bool,
    pub faces: Vec<Face>,
    pub related: Vec<RelatedPart>,
}

impl Printing {
    pub fn front(&self) -> Option<&Face> {
        self.faces.first()
    }

    /// Face indices to print for one physical copy
    pub fn face_indices(&self) -> std::ops::Range<usize> {
        0..self.faces.len()
    }

    /// "YYYY-MM-DD", or "unknown" when Scryfall has no release date
    pub fn release_date_display(&self) -> String {
        self.release_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
