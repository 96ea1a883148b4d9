//! Boundary types handed to the surrounding application.
//!
//! After an evaluation round the host builds one [`CellView`] per visible
//! cell and shares them with its renderer through a [`CellMap`]. The map is
//! keyed by the JSON encoding of the cell's grid location. The core never
//! runs user code: [`Evaluator`] is the contract an out-of-process executor
//! implements, and its result feeds the locate/classify cycle here.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::document::{table_flag, Document};
use crate::error::Result;
use crate::triage::{triage, Strategy};

/// Grid coordinate of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellLocation {
    pub row: usize,
    pub col: usize,
}

impl CellLocation {
    pub fn new(row: usize, col: usize) -> CellLocation {
        CellLocation { row, col }
    }

    /// Stable id used as the cell map key: the JSON `[row, col]` pair.
    pub fn id(&self) -> String {
        serde_json::json!([self.row, self.col]).to_string()
    }
}

/// What the renderer needs to draw and edit one cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CellView {
    pub name: String,
    pub location: CellLocation,
    pub strategy: Strategy,
    /// Computed value, as received from the evaluator.
    pub value: serde_json::Value,
    /// Text shown in the formula bar.
    pub formula: String,
}

/// Shared cell store; clones are cheap and readers may live on other
/// threads.
pub type CellMap = Arc<DashMap<String, CellView>>;

/// Key the views by location id.
pub fn cell_map(views: Vec<CellView>) -> CellMap {
    let map = DashMap::new();
    for view in views {
        map.insert(view.location.id(), view);
    }
    Arc::new(map)
}

/// The locate/classify cycle for one cell: read its table flag and logical
/// expression kind, then triage against the computed value. For a table
/// cell the syntactic input is the constructor call's object-literal
/// argument - the node the table editors operate on.
pub fn classify_cell(
    document: &Document,
    name: &str,
    value: &serde_json::Value,
) -> Result<Strategy> {
    let handle = document.cell(name)?;
    let tree = document.tree();
    let is_table = table_flag(tree, handle.object);
    let mut node = handle.value;
    if is_table {
        if let Ok(argument) = crate::edit::table::table_object(tree, handle.value) {
            node = argument;
        }
    }
    Ok(triage(tree.syntax_kind(node), value, is_table))
}

/// Formula-bar text for a cell: the logical expression's source.
pub fn formula_text(document: &Document, name: &str) -> Result<String> {
    let handle = document.cell(name)?;
    Ok(document
        .tree()
        .node_text(handle.value)
        .map(str::to_string)
        .unwrap_or_default())
}

/// Execution boundary. Implementations run the document's source in an
/// isolated context (separate process or thread) and return one opaque
/// results value; the core only consumes it.
pub trait Evaluator {
    /// The full document source is the payload.
    fn evaluate(&self, source: &str) -> std::result::Result<serde_json::Value, String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOC: &str = "const _CELLS = {\n    a: {v: 1},\n    list: {v: xs()},\n    t1: {v: function () {return _makeTable({})}, t: true},\n};\n";

    struct FixedEvaluator(serde_json::Value);

    impl Evaluator for FixedEvaluator {
        fn evaluate(&self, _source: &str) -> std::result::Result<serde_json::Value, String> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_classify_cell_uses_flag_and_kind() {
        let doc = Document::parse(DOC).unwrap();
        assert_eq!(
            classify_cell(&doc, "t1", &json!({})).unwrap(),
            Strategy::TableRw
        );
        assert_eq!(
            classify_cell(&doc, "list", &json!([1, 2])).unwrap(),
            Strategy::ArrayRo
        );
        assert_eq!(
            classify_cell(&doc, "a", &json!(1)).unwrap(),
            Strategy::Value
        );
        assert!(classify_cell(&doc, "missing", &json!(null)).is_err());
    }

    #[test]
    fn test_formula_text_is_logical_expression_source() {
        let doc = Document::parse(DOC).unwrap();
        assert_eq!(formula_text(&doc, "a").unwrap(), "1");
        assert_eq!(formula_text(&doc, "t1").unwrap(), "_makeTable({})");
    }

    #[test]
    fn test_cell_map_keys_by_location_id() {
        let doc = Document::parse(DOC).unwrap();
        let value = json!(1);
        let view = CellView {
            name: "a".to_string(),
            location: CellLocation::new(0, 0),
            strategy: classify_cell(&doc, "a", &value).unwrap(),
            value,
            formula: formula_text(&doc, "a").unwrap(),
        };
        let map = cell_map(vec![view]);
        let key = CellLocation::new(0, 0).id();
        assert_eq!(key, "[0,0]");
        assert_eq!(map.get(&key).unwrap().name, "a");
    }

    #[test]
    fn test_evaluator_receives_source_payload() {
        let doc = Document::parse(DOC).unwrap();
        let evaluator = FixedEvaluator(json!({"a": 1}));
        let results = evaluator.evaluate(&doc.print()).unwrap();
        assert_eq!(results["a"], json!(1));
    }
}
