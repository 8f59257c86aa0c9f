use std::fs;
use std::path::PathBuf;

use dictcc::{DictConfig, DictError, Dictionary, Direction, OutputFormat, Query, QueryMode};
use tempfile::TempDir;

const SOURCE: &str = "\u{feff}# dict.cc export
# German::English

Haus {n}::house
das Haus::the house
Haustür {f}::front door
Hauptbahnhof {m} [Abk.: Hbf.]::central station
Katze {f}::cat
Kater {m}::tomcat
Hund {m}::dog
(nur) [Klammern]::brackets only
kaputte Zeile ohne Trenner
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    fn write_source(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn dict_dir(&self) -> PathBuf {
        self.dir.path().join("rdictcc")
    }

    fn dictionary(&self, output_format: OutputFormat) -> Dictionary {
        Dictionary::new(DictConfig {
            dict_dir: self.dict_dir().to_string_lossy().into_owned(),
            output_format,
            ..DictConfig::default()
        })
    }

    fn imported(&self, output_format: OutputFormat) -> Dictionary {
        let source = self.write_source("dict.cc.txt", SOURCE);
        let dictionary = self.dictionary(output_format);
        dictionary.import(&source, None).unwrap();
        dictionary
    }
}

fn query(dictionary: &Dictionary, raw: &str) -> (String, u64) {
    let mut out = Vec::new();
    let matches = dictionary.query(raw, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), matches)
}

fn section<'a>(output: &'a str, direction: Direction) -> &'a str {
    let (de, en) = output.split_once("\n{EN-DE}\n").unwrap();
    match direction {
        Direction::DeEn => de.strip_prefix("{DE-EN}\n").unwrap(),
        Direction::EnDe => en,
    }
}

#[test]
fn test_import_creates_both_stores() {
    let fixture = Fixture::new();
    let source = fixture.write_source("dict.cc.txt", SOURCE);
    let summary = fixture.dictionary(OutputFormat::Normal).import(&source, None).unwrap();
    assert_eq!(summary.source_pairs, 8);
    assert_eq!(summary.skipped_lines, 1);
    assert!(Direction::DeEn.store_path(&fixture.dict_dir()).is_file());
    assert!(Direction::EnDe.store_path(&fixture.dict_dir()).is_file());
}

#[test]
fn test_exact_query() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Normal);
    let (output, matches) = query(&dictionary, "Haus");
    assert_eq!(matches, 1);
    assert_eq!(
        section(&output, Direction::DeEn),
        "Haus {n}:\n    - house\ndas Haus:\n    - the house\n"
    );
    assert_eq!(section(&output, Direction::EnDe), "");
}

#[test]
fn test_exact_query_english_side() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Compact);
    let (output, _) = query(&dictionary, "house");
    assert_eq!(section(&output, Direction::EnDe), "- house: Haus {n}\n\n- the house: das Haus\n");
}

#[test]
fn test_pattern_query_matches_all_prefixed_headwords() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Compact);
    let (output, matches) = query(&dictionary, ":r:^hau");
    assert_eq!(matches, 3);
    let de = section(&output, Direction::DeEn);
    assert!(de.contains("- Haus {n}: house"));
    assert!(de.contains("- Haustür {f}: front door"));
    assert!(de.contains("- Hauptbahnhof {m} [Abk.: Hbf.]: central station"));
    assert!(!de.contains("Katze"));
}

#[test]
fn test_explicit_mode_matches_sigil() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Normal);
    let mut sigil = Vec::new();
    dictionary.query(":r:^kat", &mut sigil).unwrap();
    let mut explicit = Vec::new();
    dictionary.query_with(&Query::with_mode(QueryMode::Pattern, "^KAT"), &mut explicit).unwrap();
    assert_eq!(sigil, explicit);
}

#[test]
fn test_fulltext_query_prints_matching_headings_only() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Normal);
    let (output, _) = query(&dictionary, ":f:cat");
    assert_eq!(section(&output, Direction::DeEn), "");
    assert_eq!(section(&output, Direction::EnDe), "cat:\n    - Katze {f}\ntomcat:\n    - Kater {m}\n");
    assert!(!output.contains("dog"));
}

#[test]
fn test_fulltext_compact_matches_translation() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Compact);
    let (output, matches) = query(&dictionary, ":f:tomcat");
    assert_eq!(matches, 2);
    assert_eq!(section(&output, Direction::DeEn), "- Kater {m}: tomcat\n");
    assert_eq!(section(&output, Direction::EnDe), "- tomcat: Kater {m}\n");
}

#[test]
fn test_phrase_without_headword_is_not_indexed() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Normal);
    let (output, _) = query(&dictionary, ":f:nur");
    assert_eq!(section(&output, Direction::DeEn), "");
    let (output, _) = query(&dictionary, "brackets");
    assert_eq!(section(&output, Direction::EnDe), "brackets only:\n    - (nur) [Klammern]\n");
}

#[test]
fn test_reimport_replaces_previous_contents() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Normal);
    assert_eq!(query(&dictionary, "katze").1, 1);

    let source = fixture.write_source("smaller.txt", "Maus {f}::mouse\n");
    dictionary.import(&source, None).unwrap();
    assert_eq!(query(&dictionary, "katze").1, 0);
    assert_eq!(query(&dictionary, "maus").1, 1);
    assert_eq!(dictionary.entry_count().unwrap(), 2);
}

#[test]
fn test_unreadable_source_keeps_existing_stores() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Normal);
    let before = dictionary.entry_count().unwrap();

    let err = dictionary.import(fixture.dir.path().join("missing.txt"), None).unwrap_err();
    assert!(matches!(err, DictError::SourceFile { .. }));
    assert_eq!(dictionary.entry_count().unwrap(), before);
    assert_eq!(query(&dictionary, "hund").1, 1);
}

#[test]
fn test_query_before_import_is_missing_store() {
    let fixture = Fixture::new();
    let err = fixture.dictionary(OutputFormat::Normal).query("haus", &mut Vec::new()).unwrap_err();
    assert!(err.is_missing_store());
}

#[test]
fn test_invalid_pattern_is_reported() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Normal);
    let err = dictionary.query(":r:[unclosed", &mut Vec::new()).unwrap_err();
    assert!(matches!(err, DictError::InvalidPattern { .. }));
}

#[test]
fn test_corrupt_store_is_format_error() {
    let fixture = Fixture::new();
    let dictionary = fixture.imported(OutputFormat::Normal);
    let path = Direction::DeEn.store_path(&fixture.dict_dir());
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
    let err = dictionary.query("haus", &mut Vec::new()).unwrap_err();
    assert!(err.is_format_error());
    assert!(path.exists());
}
