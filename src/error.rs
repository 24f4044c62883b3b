//! Error types for mtg_print

/// Unified error type for parsing, API, cache and PDF operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Scryfall has no printing matching the name/set combination
    #[error("Card not found: '{name}'")]
    CardNotFound { name: String, set: Option<String> },

    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP error status code without a parseable Scryfall error body
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Scryfall returned an error object
    #[error("{code}: {details}")]
    Api { code: String, details: String },

    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No image available for card (or for the requested face)
    #[error("No image available for card: {0}")]
    NoImageAvailable(String),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// PDF rendering or writing failed
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Nothing to lay out
    #[error("No card images to put on the sheet")]
    EmptySheet,
}

impl Error {
    pub fn card_not_found(name: &str, set: Option<&str>) -> Self {
        Error::CardNotFound {
            name: name.to_string(),
            set: set.map(str::to_string),
        }
    }
}

/// Result alias for mtg_print operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_not_found_display() {
        let err = Error::card_not_found("Black Lotus", None);
        assert_eq!(err.to_string(), "Card not found: 'Black Lotus'");

        // The set stays on the variant but not in the message
        let err = Error::card_not_found("Black Lotus", Some("lea"));
        assert_eq!(err.to_string(), "Card not found: 'Black Lotus'");
        assert!(matches!(err, Error::CardNotFound { set: Some(ref s), .. } if s == "lea"));
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            code: "bad_request".to_string(),
            details: "Invalid set code".to_string(),
        };
        assert_eq!(err.to_string(), "bad_request: Invalid set code");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
