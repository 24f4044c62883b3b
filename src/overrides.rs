//! Per-card set overrides given on the command line (`--set "Name=SET"`).

use std::collections::HashMap;

use crate::models::DeckEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOverrides {
    by_name: HashMap<String, String>,
}

impl SetOverrides {
    /// Parse `Name=SET` flags. The split happens on the last `=`; flags without
    /// one are skipped with a warning.
    pub fn parse<S: AsRef<str>>(flags: &[S]) -> Self {
        let mut by_name = HashMap::new();
        for flag in flags {
            let flag = flag.as_ref();
            match flag.rsplit_once('=') {
                Some((name, set_code)) => {
                    by_name.insert(name.trim().to_string(), set_code.trim().to_string());
                }
                None => log::warn!("Ignoring set override without '=': {flag}"),
            }
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Set code to resolve `entry` with: command line first, then the code
    /// embedded in the decklist line, otherwise none (API default printing).
    pub fn effective_set<'a>(&'a self, entry: &'a DeckEntry) -> Option<&'a str> {
        self.get(&entry.name).or(entry.set_override.as_deref())
    }
}
