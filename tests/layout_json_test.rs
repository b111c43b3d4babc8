//! Integration tests for layout dumps read from JSON.

use pdfstruct::layout::{LayoutSource, TableSource};
use pdfstruct::{extract_layout_json, BlockKind, Error, ExtractOptions, JsonLayoutDocument};

const DUMP: &str = r#"{
    "pages": [
        {
            "width": 612,
            "height": 792,
            "blocks": [
                {"type": 0, "lines": [
                    {"spans": [{"text": "1 Methods", "size": 16, "bbox": [72, 60, 160, 76]}]},
                    {"spans": [{"text": "1.1 Setup", "size": 14, "bbox": [72, 100, 150, 114]}]}
                ]},
                {"type": 0, "lines": [
                    {"spans": [{"text": "Samples were drawn", "size": 12, "bbox": [72, 130, 200, 142]},
                               {"text": " at random.", "size": 12, "bbox": [200, 130, 260, 142]}]},
                    {"spans": [{"text": "Each was measured twice.", "size": 12, "bbox": [72, 143, 230, 155]}]}
                ]},
                {"type": 1, "bbox": [72, 300, 300, 420]},
                {"type": 0, "lines": [
                    {"spans": [{"text": "Measured in kelvin.", "size": 9, "bbox": [72, 740, 160, 749]}]}
                ]}
            ],
            "tables": [[["Sample", "Reading"], ["A", "301"], ["B", "299"]]]
        },
        {
            "blocks": [
                {"type": 0, "lines": [
                    {"spans": [{"text": "2 Results", "size": 16, "bbox": [72, 60, 160, 76]}]},
                    {"spans": [{"text": "Readings agree.", "size": 12, "bbox": [72, 100, 180, 112]}]},
                    {"spans": [{"text": "  ", "size": 30, "bbox": [72, 150, 72, 180]}]},
                    {"spans": [{"text": "Within tolerance.", "size": 12, "bbox": [72, 200, 190, 212]}]}
                ]}
            ]
        }
    ]
}"#;

fn write_dump(dir: &tempfile::TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("layout.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_document_pages_and_tables() {
    let doc = JsonLayoutDocument::from_json(DUMP).unwrap();
    assert_eq!(doc.page_count(), 2);

    let second = doc.page_layout(2).unwrap();
    assert_eq!(second.number, 2);
    assert_eq!((second.width, second.height), (612.0, 792.0));

    assert_eq!(doc.page_tables(1).unwrap().len(), 1);
    assert!(doc.page_tables(2).unwrap().is_empty());
}

#[test]
fn test_extract_layout_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dump(&dir, DUMP);
    let result = extract_layout_json(&path, &ExtractOptions::default()).unwrap();

    let first = &result.pages[0].content;
    let kinds: Vec<&str> = first.iter().map(|b| b.type_name()).collect();
    assert_eq!(kinds, vec!["paragraph", "chart", "table", "footnote"]);

    assert_eq!(
        first[0].text(),
        Some("Samples were drawn at random. Each was measured twice.")
    );
    for block in first {
        assert_eq!(block.section(), Some("1 Methods"));
        assert_eq!(block.sub_section(), Some("1.1 Setup"));
    }
    match &first[2].kind {
        BlockKind::Table { table_data, .. } => {
            assert_eq!(table_data.len(), 3);
            assert_eq!(table_data[2], vec!["B", "299"]);
        }
        other => panic!("expected a table, got {:?}", other),
    }

    let second = &result.pages[1].content;
    let texts: Vec<&str> = second.iter().filter_map(|b| b.text()).collect();
    assert_eq!(texts, vec!["Readings agree.", "Within tolerance."]);
    for block in second {
        assert_eq!(block.section(), Some("2 Results"));
        assert_eq!(block.sub_section(), None);
    }
}

#[test]
fn test_tables_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dump(&dir, DUMP);
    let options = ExtractOptions::default().with_tables(false);
    let result = extract_layout_json(&path, &options).unwrap();
    assert!(result.blocks().all(|b| !b.is_table()));
}

#[test]
fn test_malformed_dump() {
    let err = JsonLayoutDocument::from_json(r#"{"pages": [{"width": "wide"}]}"#).unwrap_err();
    assert!(matches!(err, Error::Layout(_)));

    let err = JsonLayoutDocument::from_json("not json").unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn test_empty_dump() {
    let doc = JsonLayoutDocument::from_json(r#"{"pages": []}"#).unwrap();
    assert_eq!(doc.page_count(), 0);

    let dir = tempfile::tempdir().unwrap();
    let path = write_dump(&dir, r#"{"pages": []}"#);
    let result = extract_layout_json(&path, &ExtractOptions::default()).unwrap();
    assert!(result.is_empty());
}
