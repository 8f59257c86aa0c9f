use std::fmt;
use std::path::{Path, PathBuf};

/// Translation direction of a store: which language provides the keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// German headwords, English translations (store A)
    DeEn,
    /// English headwords, German translations (store B)
    EnDe,
}

impl Direction {
    /// Both directions in the order they are built and queried.
    pub const ALL: [Direction; 2] = [Direction::DeEn, Direction::EnDe];

    pub fn store_name(self) -> &'static str {
        match self {
            Direction::DeEn => "dict_de",
            Direction::EnDe => "dict_en",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::DeEn => "DE-EN",
            Direction::EnDe => "EN-DE",
        }
    }

    pub fn store_path(self, dict_dir: &Path) -> PathBuf {
        dict_dir.join(self.store_name())
    }

    /// Orders a German/English pair as (key-side phrase, translation).
    pub fn orient<'a>(self, german: &'a str, english: &'a str) -> (&'a str, &'a str) {
        match self {
            Direction::DeEn => (german, english),
            Direction::EnDe => (english, german),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
