use mtg_print::{parse_decklist, DeckEntry, Error};
use std::io::Write;
use tempfile::NamedTempFile;

// Test fixtures - sample decklists in the common export formats

fn moxfield_export() -> String {
    r#"4 Ragavan, Nimble Pilferer (MH2) 138
4 Lightning Bolt (2X2) 117 *F*
2 Fire // Ice (MH2) 290
1 Delver of Secrets (ISD) 51

SIDEBOARD:
2 Blood Moon (MM3) 88"#
        .to_string()
}

fn goldfish_export() -> String {
    r#"// Izzet Murktide
4 Murktide Regent <mh2>
4 Expressive Iteration <stx>
1 Fire // Ice <mh2>
Sideboard
2 Engineered Explosives <5dn>"#
        .to_string()
}

fn plain_list() -> String {
    r#"Main Deck
Creatures (8)
4x Monastery Swiftspear
4x Goblin Guide
Lands (20)
20 Mountain

Built with some deck builder
this line means nothing"#
        .to_string()
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}

#[test]
fn test_moxfield_file() {
    let file = write_temp(&moxfield_export());
    let deck = parse_decklist(file.path()).unwrap();

    assert_eq!(deck.unique_cards(), 5);
    assert_eq!(deck.total_cards(), 13);
    assert_eq!(
        deck.entries[0],
        DeckEntry::new("Ragavan, Nimble Pilferer", 4, Some("MH2".to_string()))
    );
    assert_eq!(
        deck.entries[2],
        DeckEntry::new("Fire // Ice", 2, Some("MH2".to_string()))
    );
    // Sideboard cards still follow the header; only the header itself is skipped
    assert_eq!(deck.entries[4].name, "Blood Moon");
}

#[test]
fn test_goldfish_file() {
    let file = write_temp(&goldfish_export());
    let deck = parse_decklist(file.path()).unwrap();

    let names: Vec<&str> = deck.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Murktide Regent",
            "Expressive Iteration",
            "Fire // Ice",
            "Engineered Explosives"
        ]
    );
    assert_eq!(deck.entries[2].set_override.as_deref(), Some("mh2"));
    assert_eq!(deck.total_cards(), 11);
}

#[test]
fn test_plain_file_skips_headers_and_noise() {
    let file = write_temp(&plain_list());
    let deck = parse_decklist(file.path()).unwrap();

    assert_eq!(
        deck.entries,
        vec![
            DeckEntry::new("Monastery Swiftspear", 4, None),
            DeckEntry::new("Goblin Guide", 4, None),
            DeckEntry::new("Mountain", 20, None),
        ]
    );
    assert_eq!(deck.total_cards(), 28);
}

#[test]
fn test_windows_line_endings() {
    let file = write_temp("4 Lightning Bolt\r\n2 Brainstorm (ICE) 61\r\n");
    let deck = parse_decklist(file.path()).unwrap();

    assert_eq!(deck.entries[0], DeckEntry::new("Lightning Bolt", 4, None));
    assert_eq!(
        deck.entries[1],
        DeckEntry::new("Brainstorm", 2, Some("ICE".to_string()))
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let result = parse_decklist("/this/path/definitely/does/not/exist/deck.txt");
    assert!(matches!(result, Err(Error::Io(_))));
}
