use lackey_fetch::set_writer::{deduplicate_file, SetWriter};
use lackey_fetch::transform::{FormatOptions, ManaCase};
use lackey_fetch::ScryfallCard;
use tempfile::TempDir;

fn card(name: &str, cn: &str) -> ScryfallCard {
    ScryfallCard {
        name: name.to_string(),
        collector_number: cn.to_string(),
        mana_cost: Some("{1}{g}".to_string()),
        ..Default::default()
    }
}

fn names_in(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(3)
        .map(|l| l.split('\t').next().unwrap().to_string())
        .collect()
}

#[test]
fn test_creates_file_with_header_and_sorted_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sets").join("custom.txt");

    let outcome = SetWriter::new(&path)
        .write_set("M10", &[card("Ten", "10"), card("Two", "2"), card("OneA", "1a"), card("One", "1")])
        .unwrap();

    assert!(outcome.newly_created);
    assert_eq!(outcome.cards, 4);
    assert_eq!(outcome.records, 4);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines[0].starts_with("Name\tSet\tImageFile"));
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "");
    assert_eq!(names_in(&path), vec!["One", "OneA", "Two", "Ten"]);
    assert!(lines[3].starts_with("One\tm10\tm10/1\tm10\t"));
    assert!(content.ends_with('\n'));
}

#[test]
fn test_append_writes_no_second_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.txt");
    let writer = SetWriter::new(&path);

    writer.write_set("aaa", &[card("First", "1")]).unwrap();
    let outcome = writer.write_set("bbb", &[card("Second", "1")]).unwrap();

    assert!(!outcome.newly_created);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("Name\tSet").count(), 1);
    assert_eq!(names_in(&path), vec!["First", "Second"]);
}

#[test]
fn test_format_options_are_applied() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lower.txt");
    let options = FormatOptions {
        mana_case: ManaCase::Lower,
        ..Default::default()
    };

    SetWriter::new(&path)
        .with_format(options)
        .write_set("m10", &[card("Bear", "1")])
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\t{1}{g}\t"));
}

#[test]
fn test_quotes_written_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quotes.txt");

    SetWriter::new(&path)
        .write_set("unf", &[card("\"Name Sticker\" Goblin", "1")])
        .unwrap();

    assert_eq!(names_in(&path), vec!["\"Name Sticker\" Goblin"]);
}

#[test]
fn test_write_then_deduplicate_keeps_latest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.txt");
    let writer = SetWriter::new(&path);

    let mut old = card("Bear", "1");
    old.oracle_text = Some("old text".to_string());
    let mut new = card("Bear", "1");
    new.oracle_text = Some("new text".to_string());

    writer.write_set("m10", &[old, card("Elf", "2")]).unwrap();
    writer.write_set("m10", &[new]).unwrap();

    let stats = deduplicate_file(&path).unwrap();
    assert_eq!(stats.kept, 2);
    assert_eq!(stats.removed, 1);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(!content.contains("old text"));
    assert!(content.contains("new text"));
    assert_eq!(names_in(&path), vec!["Elf", "Bear"]);
}

#[test]
fn test_deduplicate_missing_file_errors() {
    let dir = TempDir::new().unwrap();
    assert!(deduplicate_file(&dir.path().join("nope.txt")).is_err());
}
