use super::*;

fn create_test_styling() -> StyleManager {
    StyleManager::new(&TerminalCapabilities::default())
}

#[test]
fn test_table_aligns_columns_to_widest_cell() {
    let styling = create_test_styling();
    let caps = TerminalCapabilities::default();
    let structured = StructuredDisplay::new(&styling, &caps);

    let lines = structured
        .table()
        .header(&["Type", "Name"])
        .row(&["Entity", "account"])
        .row(&["Workflow", "Notify owner"])
        .lines();

    assert_eq!(
        lines,
        vec![
            "Type     | Name",
            "---------+-------------",
            "Entity   | account",
            "Workflow | Notify owner",
        ]
    );
}

#[test]
fn test_table_without_header_has_no_rule() {
    let styling = create_test_styling();
    let caps = TerminalCapabilities::default();
    let structured = StructuredDisplay::new(&styling, &caps);

    let lines = structured.table().row(&["a", "b"]).row(&["cc", "d"]).lines();
    assert_eq!(lines, vec!["a  | b", "cc | d"]);
}

#[test]
fn test_empty_table_renders_nothing() {
    let styling = create_test_styling();
    let caps = TerminalCapabilities::default();
    let structured = StructuredDisplay::new(&styling, &caps);

    assert!(structured.table().lines().is_empty());
    structured.table().render();
}

#[test]
fn test_ragged_rows_are_padded() {
    let styling = create_test_styling();
    let caps = TerminalCapabilities::default();
    let structured = StructuredDisplay::new(&styling, &caps);

    let lines = structured
        .table()
        .header(&["A", "B", "C"])
        .row(&["1"])
        .lines();
    assert_eq!(lines[2], "1 |   |");
}

#[test]
fn test_long_cells_are_truncated_to_max_width() {
    let styling = create_test_styling();
    let caps = TerminalCapabilities::default();
    let structured = StructuredDisplay::new(&styling, &caps);
    let long_text = "x".repeat(100);

    let lines = structured
        .table()
        .header(&["Col1", "Col2"])
        .row(&[&long_text, "short"])
        .max_width(40)
        .lines();

    for line in &lines {
        assert!(measure_text_width(line) <= 40, "line too wide: {line}");
    }
    assert!(lines[2].contains("..."));
}

#[test]
fn test_shrink_widest_respects_minimum() {
    let mut widths = vec![10, 4];
    shrink_widest(&mut widths, 5);
    assert_eq!(widths, vec![5, 4]);

    let mut tiny = vec![3, 3];
    shrink_widest(&mut tiny, 10);
    assert_eq!(tiny, vec![3, 3]);
}

#[test]
fn test_pairs_align_keys() {
    let styling = create_test_styling();
    let lines = pair_lines(&styling, &[("A", "1"), ("Longer", "2")]);
    assert_eq!(lines, vec!["A      : 1", "Longer : 2"]);
}
