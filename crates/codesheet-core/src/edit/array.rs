//! Structural editing of array literals.
//!
//! Edit payloads are expression source text, parsed into real subtrees
//! before splicing. Every operation validates the container shape and
//! returns a typed error instead of silently skipping.

use codesheet_syntax::{NodeId, NodeKind, Tree};

use crate::error::{CoreError, Result};

pub(crate) fn elements(tree: &Tree, arr: NodeId) -> Result<Vec<NodeId>> {
    match tree.kind(arr) {
        NodeKind::ArrayExpr { elements } => Ok(elements.clone()),
        _ => Err(CoreError::mismatch("array literal", tree, arr)),
    }
}

/// Splice an element in at `index`. An empty array appends regardless of
/// the index; a too-large index clamps to the end (splice semantics).
pub fn insert_element(tree: &mut Tree, arr: NodeId, index: usize, text: &str) -> Result<NodeId> {
    elements(tree, arr)?;
    let value = tree.parse_expression(text)?;
    tree.array_insert(arr, index, value);
    Ok(value)
}

pub fn append_element(tree: &mut Tree, arr: NodeId, text: &str) -> Result<NodeId> {
    let len = elements(tree, arr)?.len();
    insert_element(tree, arr, len, text)
}

pub fn replace_element(tree: &mut Tree, arr: NodeId, index: usize, text: &str) -> Result<NodeId> {
    let elements = elements(tree, arr)?;
    let Some(old) = elements.get(index).copied() else {
        return Err(CoreError::IndexOutOfBounds {
            index,
            len: elements.len(),
        });
    };
    let value = tree.parse_expression(text)?;
    tree.replace(old, value);
    Ok(value)
}

/// Remove the element at `index` and close the gap - list semantics, never
/// a hole.
pub fn remove_element(tree: &mut Tree, arr: NodeId, index: usize) -> Result<()> {
    let len = elements(tree, arr)?.len();
    if index >= len {
        return Err(CoreError::IndexOutOfBounds { index, len });
    }
    tree.array_remove(arr, index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesheet_syntax::PrintOptions;

    fn array_doc(src: &str) -> (Tree, NodeId) {
        let tree = Tree::parse(src).unwrap();
        let decl = tree.children(tree.root())[0];
        let declarator = tree.children(decl)[0];
        let arr = tree.children(declarator)[1];
        (tree, arr)
    }

    fn printed(tree: &Tree) -> String {
        tree.print(&PrintOptions::default())
    }

    #[test]
    fn test_insert_into_empty_appends_regardless_of_index() {
        let (mut tree, arr) = array_doc("const xs = [];");
        insert_element(&mut tree, arr, 5, "1").unwrap();
        assert_eq!(printed(&tree), "const xs = [1];");
    }

    #[test]
    fn test_insert_splices() {
        let (mut tree, arr) = array_doc("const xs = [1, 3];");
        insert_element(&mut tree, arr, 1, "2").unwrap();
        assert_eq!(printed(&tree), "const xs = [1, 2, 3];");
    }

    #[test]
    fn test_append_and_replace() {
        let (mut tree, arr) = array_doc("const xs = [1];");
        append_element(&mut tree, arr, "2").unwrap();
        replace_element(&mut tree, arr, 0, "9").unwrap();
        assert_eq!(printed(&tree), "const xs = [9, 2];");
    }

    #[test]
    fn test_replace_preserves_surrounding_formatting() {
        let (mut tree, arr) = array_doc("const xs = [ 1,  2,   3 ];  // spaced\n");
        replace_element(&mut tree, arr, 1, "20").unwrap();
        assert_eq!(printed(&tree), "const xs = [ 1,  20,   3 ];  // spaced\n");
    }

    #[test]
    fn test_remove_closes_gap() {
        let (mut tree, arr) = array_doc("const xs = [1, 2, 3];");
        remove_element(&mut tree, arr, 1).unwrap();
        assert_eq!(printed(&tree), "const xs = [1, 3];");
    }

    #[test]
    fn test_remove_out_of_bounds() {
        let (mut tree, arr) = array_doc("const xs = [1];");
        assert!(matches!(
            remove_element(&mut tree, arr, 3),
            Err(CoreError::IndexOutOfBounds { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_operations_reject_non_arrays() {
        let (mut tree, obj) = array_doc("const xs = {a: 1};");
        assert!(matches!(
            append_element(&mut tree, obj, "2"),
            Err(CoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_payload_is_a_parse_error() {
        let (mut tree, arr) = array_doc("const xs = [];");
        assert!(matches!(
            append_element(&mut tree, arr, "1 +"),
            Err(CoreError::Syntax(_))
        ));
    }
}
