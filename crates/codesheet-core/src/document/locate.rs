//! Finding the cell collection and individual cells.

use codesheet_syntax::{Lit, NodeId, NodeKind, Tree};

use crate::error::{CoreError, Result};

/// Reserved name of the document's one top-level cell binding.
pub const CELLS_BINDING: &str = "_CELLS";

/// Key of a cell record's value expression.
pub const VALUE_KEY: &str = "v";

/// Key of a cell record's optional table flag.
pub const TABLE_FLAG_KEY: &str = "t";

/// Addresses one cell of the collection.
///
/// `value` is the cell's logical expression: when the stored expression is a
/// zero-parameter function whose body is a single `return`, the handle is
/// redirected to the returned expression (wrapper/thunk cell).
#[derive(Clone, Copy, Debug)]
pub struct CellHandle {
    /// The `name: {...}` property inside the collection.
    pub property: NodeId,
    /// The cell record object literal.
    pub object: NodeId,
    /// The logical value expression.
    pub value: NodeId,
}

/// Key text of an object property key node: identifier name, string value,
/// or numeric lexeme.
pub fn property_key_text(tree: &Tree, key: NodeId) -> Option<String> {
    match tree.kind(key) {
        NodeKind::Identifier { name } => Some(name.clone()),
        NodeKind::Literal { value } => match value {
            Lit::Str { value, .. } => Some(value.clone()),
            Lit::Num(raw) => Some(raw.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Find the cell collection: the first declarator named `_CELLS`, visiting
/// declarations depth-first (function bodies included) and stopping at the
/// first match. Missing collection is fatal for the document - there is
/// nothing to edit.
pub fn cell_collection(tree: &Tree) -> Result<NodeId> {
    let NodeKind::Program { body } = tree.kind(tree.root()) else {
        return Err(CoreError::MissingCellCollection);
    };
    visit_statements(tree, body).ok_or(CoreError::MissingCellCollection)
}

fn visit_statements(tree: &Tree, statements: &[NodeId]) -> Option<NodeId> {
    for statement in statements {
        match tree.kind(*statement) {
            NodeKind::VarDecl { declarators, .. } => {
                for declarator in declarators {
                    let NodeKind::Declarator { id, init } = tree.kind(*declarator) else {
                        continue;
                    };
                    if let NodeKind::Identifier { name } = tree.kind(*id) {
                        if name == CELLS_BINDING {
                            return *init;
                        }
                    }
                }
            }
            NodeKind::FunctionDecl { body, .. } => {
                if let Some(found) = visit_statements(tree, body) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

/// Linear scan of the collection's properties for a cell named `name`.
pub fn find_cell(tree: &Tree, collection: NodeId, name: &str) -> Result<CellHandle> {
    let NodeKind::ObjectExpr { properties } = tree.kind(collection) else {
        return Err(CoreError::mismatch("object literal", tree, collection));
    };
    for property in properties {
        let NodeKind::Property { key, value, .. } = tree.kind(*property) else {
            continue;
        };
        if property_key_text(tree, *key).as_deref() != Some(name) {
            continue;
        }
        let object = *value;
        let NodeKind::ObjectExpr { properties: fields } = tree.kind(object) else {
            return Err(CoreError::mismatch("cell record object", tree, object));
        };
        let mut stored = None;
        for field in fields {
            if let NodeKind::Property { key, value, .. } = tree.kind(*field) {
                if property_key_text(tree, *key).as_deref() == Some(VALUE_KEY) {
                    stored = Some(*value);
                    break;
                }
            }
        }
        let Some(stored) = stored else {
            return Err(CoreError::KeyNotFound(VALUE_KEY.to_string()));
        };
        return Ok(CellHandle {
            property: *property,
            object,
            value: unwrap_thunk(tree, stored),
        });
    }
    Err(CoreError::CellNotFound(name.to_string()))
}

/// Redirect a zero-parameter `function () { return expr }` to `expr`.
fn unwrap_thunk(tree: &Tree, value: NodeId) -> NodeId {
    let NodeKind::FunctionExpr { params, body, .. } = tree.kind(value) else {
        return value;
    };
    if !params.is_empty() {
        return value;
    }
    if let [statement] = body.as_slice() {
        if let NodeKind::Return {
            argument: Some(argument),
        } = tree.kind(*statement)
        {
            return *argument;
        }
    }
    value
}

/// Whether a cell record's `t` flag is set to `true`.
pub fn table_flag(tree: &Tree, cell_object: NodeId) -> bool {
    let NodeKind::ObjectExpr { properties } = tree.kind(cell_object) else {
        return false;
    };
    for property in properties {
        if let NodeKind::Property { key, value, .. } = tree.kind(*property) {
            if property_key_text(tree, *key).as_deref() == Some(TABLE_FLAG_KEY) {
                return matches!(
                    tree.kind(*value),
                    NodeKind::Literal {
                        value: Lit::Bool(true)
                    }
                );
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesheet_syntax::SyntaxKind;

    const DOC: &str = "const _CELLS = {\n    a: {v: 1},\n    'two words': {v: [1, 2]},\n    calc: {v: function () {return 1 + 2}},\n    t1: {v: function () {return _makeTable({})}, t: true},\n};\n";

    #[test]
    fn test_locates_collection_first_match() {
        let tree = Tree::parse("const other = 1;\nconst _CELLS = {a: {v: 1}};\nconst _CELLS = {b: {v: 2}};").unwrap();
        let collection = cell_collection(&tree).unwrap();
        let cell = find_cell(&tree, collection, "a");
        assert!(cell.is_ok());
        assert!(matches!(
            find_cell(&tree, collection, "b"),
            Err(CoreError::CellNotFound(_))
        ));
    }

    #[test]
    fn test_missing_collection_is_fatal() {
        let tree = Tree::parse("const cells = {a: {v: 1}};").unwrap();
        assert!(matches!(
            cell_collection(&tree),
            Err(CoreError::MissingCellCollection)
        ));
    }

    #[test]
    fn test_finds_collection_inside_function_body() {
        let tree =
            Tree::parse("function setup() {\n    const _CELLS = {a: {v: 1}};\n}").unwrap();
        assert!(cell_collection(&tree).is_ok());
    }

    #[test]
    fn test_find_cell_by_identifier_and_string_key() {
        let tree = Tree::parse(DOC).unwrap();
        let collection = cell_collection(&tree).unwrap();
        let a = find_cell(&tree, collection, "a").unwrap();
        assert_eq!(tree.syntax_kind(a.value), SyntaxKind::Literal);
        let quoted = find_cell(&tree, collection, "two words").unwrap();
        assert_eq!(tree.syntax_kind(quoted.value), SyntaxKind::ArrayExpr);
    }

    #[test]
    fn test_thunk_cell_value_is_unwrapped() {
        let tree = Tree::parse(DOC).unwrap();
        let collection = cell_collection(&tree).unwrap();
        let calc = find_cell(&tree, collection, "calc").unwrap();
        assert_eq!(tree.syntax_kind(calc.value), SyntaxKind::BinaryExpr);
        let table = find_cell(&tree, collection, "t1").unwrap();
        assert_eq!(tree.syntax_kind(table.value), SyntaxKind::CallExpr);
    }

    #[test]
    fn test_table_flag() {
        let tree = Tree::parse(DOC).unwrap();
        let collection = cell_collection(&tree).unwrap();
        let table = find_cell(&tree, collection, "t1").unwrap();
        assert!(table_flag(&tree, table.object));
        let plain = find_cell(&tree, collection, "a").unwrap();
        assert!(!table_flag(&tree, plain.object));
    }
}
