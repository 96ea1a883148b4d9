//! End-to-end editing scenarios against the public API.

use codesheet_core::edit::{object, table};
use codesheet_core::{classify_cell, document, Document, Strategy};
use serde_json::json;

fn table_node(doc: &Document, name: &str) -> codesheet_core::NodeId {
    let handle = doc.cell(name).unwrap();
    table::table_object(doc.tree(), handle.value).unwrap()
}

#[test]
fn test_plain_cell_becomes_editable_table() {
    let source = "const _CELLS = {\n    a: {v: 1},\n};\n";
    let mut doc = Document::parse(source).unwrap();

    // a = 1 -> a is a table.
    let cell = doc.cell("a").unwrap();
    table::create_table(doc.tree_mut(), cell.object).unwrap();

    // Add a column "x" and set its first row.
    let t = table_node(&doc, "a");
    table::add_column(doc.tree_mut(), t, Some("x"), None).unwrap();
    table::set_cell(doc.tree_mut(), t, "x", 0, "5").unwrap();

    let printed = doc.print();
    assert!(printed.contains("values: [5]"), "{printed}");
    assert!(printed.contains("default: null"), "{printed}");
    assert!(printed.contains("t: true"), "{printed}");

    // The printed document parses back to the same logical table.
    let reloaded = Document::parse(&printed).unwrap();
    let t = table_node(&reloaded, "a");
    let cols = table::columns(reloaded.tree(), t).unwrap();
    assert_eq!(cols.len(), 1);
    assert_eq!(cols[0].0, "x");

    // And the classifier treats the evaluated cell as an editable table.
    assert_eq!(
        classify_cell(&reloaded, "a", &json!({"x": [5]})).unwrap(),
        Strategy::TableRw
    );
}

#[test]
fn test_delete_row_empties_single_row_table() {
    let source = "const _CELLS = {\n    a: {v: 1},\n};\n";
    let mut doc = Document::parse(source).unwrap();
    let cell = doc.cell("a").unwrap();
    table::create_table(doc.tree_mut(), cell.object).unwrap();
    let t = table_node(&doc, "a");
    table::add_column(doc.tree_mut(), t, Some("x"), None).unwrap();
    table::set_cell(doc.tree_mut(), t, "x", 0, "5").unwrap();

    table::delete_row(doc.tree_mut(), t, 0).unwrap();

    let printed = doc.print();
    assert!(printed.contains("values: []"), "{printed}");
    assert!(printed.contains("default: null"), "{printed}");
}

#[test]
fn test_row_alignment_survives_mixed_row_edits() {
    let source = "const _CELLS = {\n    t1: {v: function () {return _makeTable({\n        x: {default: null, values: [1, 2, 3]},\n        y: {default: null, values: [4, 5, 6]},\n    })}, t: true},\n};\n";
    let mut doc = Document::parse(source).unwrap();
    let t = table_node(&doc, "t1");

    table::add_row(doc.tree_mut(), t, Some("x"), Some("7")).unwrap();
    table::delete_row(doc.tree_mut(), t, 1).unwrap();
    table::add_row(doc.tree_mut(), t, None, None).unwrap();
    table::add_column(doc.tree_mut(), t, None, Some(0)).unwrap();
    table::delete_row(doc.tree_mut(), t, 0).unwrap();

    let cols = table::columns(doc.tree(), t).unwrap();
    assert_eq!(cols.len(), 3);
    let lengths: Vec<usize> = cols
        .iter()
        .map(|(_, col)| {
            let values_prop = object::get_item(doc.tree(), *col, table::VALUES_KEY)
                .unwrap()
                .unwrap();
            let values = object::item_value(doc.tree(), values_prop).unwrap();
            doc.tree().children(values).len()
        })
        .collect();
    assert_eq!(lengths, vec![3, 3, 3]);
}

#[test]
fn test_editing_one_cell_leaves_the_rest_of_the_file_untouched() {
    let source = "// expense sheet\nconst _CELLS = {\n    income: {v: 1200},  // monthly\n    costs: {v: [800, 90]},\n    net: {v: function () {return income - costs[0]}},\n};\n";
    let mut doc = Document::parse(source).unwrap();

    let handle = doc.cell("income").unwrap();
    let v_prop = object::get_item(doc.tree(), handle.object, document::VALUE_KEY)
        .unwrap()
        .unwrap();
    object::replace_item_value(doc.tree_mut(), v_prop, "1300").unwrap();

    let printed = doc.print();
    assert_eq!(
        printed,
        "// expense sheet\nconst _CELLS = {\n    income: {v: 1300},  // monthly\n    costs: {v: [800, 90]},\n    net: {v: function () {return income - costs[0]}},\n};\n"
    );
    assert!(doc.modified());
}

#[test]
fn test_getter_installs_computed_view_over_table() {
    let source = "const _CELLS = {\n    t1: {v: function () {return _makeTable({})}, t: true},\n    summary: {v: 0},\n};\nconst sheet = {};\n";
    let mut doc = Document::parse(source).unwrap();

    let collection = doc.cells().unwrap();
    let getter = object::insert_getter(doc.tree_mut(), collection, "view", "t1", None).unwrap();
    let printed = doc.print();
    assert!(printed.contains("get view() { return t1; }"), "{printed}");

    object::replace_getter_return(doc.tree_mut(), getter, "t1.x").unwrap();
    let printed = doc.print();
    assert!(printed.contains("get view() { return t1.x; }"), "{printed}");
}

#[test]
fn test_parse_failure_keeps_previous_document_usable() {
    let good = "const _CELLS = {a: {v: 1}};";
    let doc = Document::parse(good).unwrap();
    assert!(Document::parse("const _CELLS = {a: {v: }};").is_err());
    // The earlier document is unaffected by the failed parse.
    assert_eq!(doc.print(), good);
    assert!(doc.cell("a").is_ok());
}
