//! Structural editing of object literals.
//!
//! Keys are unique: inserts and renames that would duplicate an existing
//! key are rejected, and removal takes the first match. Getter properties
//! (`get key() { return expr; }`) install computed views over other cells;
//! only their returned expression is ever rewritten.

use codesheet_syntax::{is_identifier_text, NodeId, NodeKind, PropertyKind, Tree};

use crate::document::property_key_text;
use crate::error::{CoreError, Result};

pub(crate) fn properties(tree: &Tree, obj: NodeId) -> Result<Vec<NodeId>> {
    match tree.kind(obj) {
        NodeKind::ObjectExpr { properties } => Ok(properties.clone()),
        _ => Err(CoreError::mismatch("object literal", tree, obj)),
    }
}

/// First property whose key text equals `key`. Linear scan, O(n) in the
/// property count.
pub fn get_item(tree: &Tree, obj: NodeId, key: &str) -> Result<Option<NodeId>> {
    Ok(get_item_index(tree, obj, key)?.map(|i| properties(tree, obj).unwrap_or_default()[i]))
}

pub fn get_item_index(tree: &Tree, obj: NodeId, key: &str) -> Result<Option<usize>> {
    for (i, property) in properties(tree, obj)?.into_iter().enumerate() {
        if let NodeKind::Property { key: key_node, .. } = tree.kind(property) {
            if property_key_text(tree, *key_node).as_deref() == Some(key) {
                return Ok(Some(i));
            }
        }
    }
    Ok(None)
}

/// Value node of a `key: value` property.
pub fn item_value(tree: &Tree, property: NodeId) -> Result<NodeId> {
    match tree.kind(property) {
        NodeKind::Property { value, .. } => Ok(*value),
        _ => Err(CoreError::mismatch("property", tree, property)),
    }
}

fn has_key(tree: &Tree, obj: NodeId, key: &str) -> Result<bool> {
    Ok(get_item_index(tree, obj, key)?.is_some())
}

/// Identifier key when the text allows it, string literal otherwise.
fn make_key_node(tree: &mut Tree, key: &str) -> NodeId {
    if is_identifier_text(key) {
        tree.new_identifier(key)
    } else {
        tree.new_string(key)
    }
}

/// Rename a property. Rejects a key already present on the same object.
pub fn replace_item_key(tree: &mut Tree, property: NodeId, new_key: &str) -> Result<()> {
    let NodeKind::Property { key, .. } = tree.kind(property) else {
        return Err(CoreError::mismatch("property", tree, property));
    };
    let old_key = *key;
    if let Some(obj) = tree.parent(property) {
        if matches!(tree.kind(obj), NodeKind::ObjectExpr { .. }) {
            let idx = get_item_index(tree, obj, new_key)?;
            if idx.is_some_and(|i| properties(tree, obj).unwrap_or_default()[i] != property) {
                return Err(CoreError::DuplicateKey(new_key.to_string()));
            }
        }
    }
    let new_node = make_key_node(tree, new_key);
    tree.replace(old_key, new_node);
    Ok(())
}

/// Replace a property's value with a parsed expression payload.
pub fn replace_item_value(tree: &mut Tree, property: NodeId, text: &str) -> Result<NodeId> {
    let old_value = item_value(tree, property)?;
    let new_value = tree.parse_expression(text)?;
    tree.replace(old_value, new_value);
    Ok(new_value)
}

/// Insert `key: value`. Appends when `index` is omitted or the object is
/// empty, splices otherwise. Duplicate keys are rejected.
pub fn insert_item(
    tree: &mut Tree,
    obj: NodeId,
    key: &str,
    value_text: &str,
    index: Option<usize>,
) -> Result<NodeId> {
    if has_key(tree, obj, key)? {
        return Err(CoreError::DuplicateKey(key.to_string()));
    }
    let value = tree.parse_expression(value_text)?;
    let key_node = make_key_node(tree, key);
    let property = tree.new_property(PropertyKind::Init, key_node, value);
    let len = properties(tree, obj)?.len();
    tree.object_insert(obj, index.unwrap_or(len), property);
    tracing::debug!(key, "inserted object property");
    Ok(property)
}

/// Insert an accessor property whose body returns `body_text`.
pub fn insert_getter(
    tree: &mut Tree,
    obj: NodeId,
    key: &str,
    body_text: &str,
    index: Option<usize>,
) -> Result<NodeId> {
    if has_key(tree, obj, key)? {
        return Err(CoreError::DuplicateKey(key.to_string()));
    }
    let returned = tree.parse_expression(body_text)?;
    let ret = tree.new_return(Some(returned));
    let function = tree.new_function_expr(Vec::new(), vec![ret]);
    let key_node = make_key_node(tree, key);
    let property = tree.new_property(PropertyKind::Get, key_node, function);
    let len = properties(tree, obj)?.len();
    tree.object_insert(obj, index.unwrap_or(len), property);
    tracing::debug!(key, "inserted getter property");
    Ok(property)
}

/// The expression returned by an accessor property.
pub fn getter_return(tree: &Tree, property: NodeId) -> Result<NodeId> {
    let NodeKind::Property {
        kind: PropertyKind::Get,
        value,
        ..
    } = tree.kind(property)
    else {
        return Err(CoreError::mismatch("getter property", tree, property));
    };
    let NodeKind::FunctionExpr { body, .. } = tree.kind(*value) else {
        return Err(CoreError::mismatch("accessor function", tree, *value));
    };
    if let [statement] = body.as_slice() {
        if let NodeKind::Return {
            argument: Some(argument),
        } = tree.kind(*statement)
        {
            return Ok(*argument);
        }
    }
    Err(CoreError::mismatch("accessor return", tree, *value))
}

/// Rewrite only the accessor's returned expression.
pub fn replace_getter_return(tree: &mut Tree, property: NodeId, text: &str) -> Result<NodeId> {
    let old = getter_return(tree, property)?;
    let new = tree.parse_expression(text)?;
    tree.replace(old, new);
    Ok(new)
}

/// Remove the first property matching `key`.
pub fn remove_item(tree: &mut Tree, obj: NodeId, key: &str) -> Result<NodeId> {
    let Some(index) = get_item_index(tree, obj, key)? else {
        return Err(CoreError::KeyNotFound(key.to_string()));
    };
    Ok(tree.object_remove(obj, index))
}

/// Replace any subtree with a `null` placeholder, keeping the slot present.
pub fn clear(tree: &mut Tree, node: NodeId) -> NodeId {
    let placeholder = tree.new_null();
    tree.replace(node, placeholder);
    placeholder
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesheet_syntax::PrintOptions;

    fn object_doc(src: &str) -> (Tree, NodeId) {
        let tree = Tree::parse(src).unwrap();
        let decl = tree.children(tree.root())[0];
        let declarator = tree.children(decl)[0];
        let obj = tree.children(declarator)[1];
        (tree, obj)
    }

    fn printed(tree: &Tree) -> String {
        tree.print(&PrintOptions::default())
    }

    #[test]
    fn test_get_item_first_match() {
        let (tree, obj) = object_doc("const o = {a: 1, b: 2, a: 3};");
        let first = get_item(&tree, obj, "a").unwrap().unwrap();
        assert_eq!(get_item_index(&tree, obj, "a").unwrap(), Some(0));
        let value = item_value(&tree, first).unwrap();
        assert_eq!(tree.dump(value), "(lit 1)");
        assert_eq!(get_item(&tree, obj, "missing").unwrap(), None);
    }

    #[test]
    fn test_get_item_matches_string_keys() {
        let (tree, obj) = object_doc("const o = {'two words': 1};");
        assert!(get_item(&tree, obj, "two words").unwrap().is_some());
    }

    #[test]
    fn test_insert_appends_and_splices() {
        let (mut tree, obj) = object_doc("const o = {a: 1, c: 3};");
        insert_item(&mut tree, obj, "d", "4", None).unwrap();
        insert_item(&mut tree, obj, "b", "2", Some(1)).unwrap();
        assert_eq!(
            printed(&tree),
            "const o = {\n    a: 1,\n    b: 2,\n    c: 3,\n    d: 4,\n};"
        );
    }

    #[test]
    fn test_insert_duplicate_key_rejected() {
        let (mut tree, obj) = object_doc("const o = {a: 1};");
        assert!(matches!(
            insert_item(&mut tree, obj, "a", "2", None),
            Err(CoreError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_insert_quoted_key_when_not_identifier() {
        let (mut tree, obj) = object_doc("const o = {};");
        insert_item(&mut tree, obj, "two words", "1", None).unwrap();
        assert_eq!(printed(&tree), "const o = {\"two words\": 1};");
    }

    #[test]
    fn test_replace_key_and_value() {
        let (mut tree, obj) = object_doc("const o = {a: 1, b: 2};");
        let a = get_item(&tree, obj, "a").unwrap().unwrap();
        replace_item_key(&mut tree, a, "z").unwrap();
        replace_item_value(&mut tree, a, "10").unwrap();
        assert_eq!(printed(&tree), "const o = {z: 10, b: 2};");
    }

    #[test]
    fn test_replace_key_duplicate_rejected_but_self_ok() {
        let (mut tree, obj) = object_doc("const o = {a: 1, b: 2};");
        let a = get_item(&tree, obj, "a").unwrap().unwrap();
        assert!(matches!(
            replace_item_key(&mut tree, a, "b"),
            Err(CoreError::DuplicateKey(_))
        ));
        replace_item_key(&mut tree, a, "a").unwrap();
        assert_eq!(printed(&tree), "const o = {a: 1, b: 2};");
    }

    #[test]
    fn test_insert_remove_inverse_is_structurally_identity() {
        let (mut tree, obj) = object_doc("const o = {a: 1, b: 2};");
        let before = tree.dump(obj);
        insert_item(&mut tree, obj, "c", "3", None).unwrap();
        remove_item(&mut tree, obj, "c").unwrap();
        assert_eq!(tree.dump(obj), before);
    }

    #[test]
    fn test_remove_takes_first_match_only() {
        let (mut tree, obj) = object_doc("const o = {a: 1, b: 2, a: 3};");
        remove_item(&mut tree, obj, "a").unwrap();
        assert_eq!(printed(&tree), "const o = {\n    b: 2,\n    a: 3,\n};");
        assert!(matches!(
            remove_item(&mut tree, obj, "missing"),
            Err(CoreError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_getter_roundtrip_and_return_rewrite() {
        let (mut tree, obj) = object_doc("const o = {a: 1};");
        let getter = insert_getter(&mut tree, obj, "total", "a + 1", None).unwrap();
        assert_eq!(tree.dump(getter_return(&tree, getter).unwrap()), "(binary expression (id a) (lit 1))");
        replace_getter_return(&mut tree, getter, "a * 2").unwrap();
        assert_eq!(
            printed(&tree),
            "const o = {\n    a: 1,\n    get total() { return a * 2; },\n};"
        );
    }

    #[test]
    fn test_clear_replaces_subtree_with_null() {
        let (mut tree, obj) = object_doc("const o = {a: [1, 2]};");
        let a = get_item(&tree, obj, "a").unwrap().unwrap();
        let value = item_value(&tree, a).unwrap();
        clear(&mut tree, value);
        assert_eq!(printed(&tree), "const o = {a: null};");
    }

    #[test]
    fn test_operations_reject_non_objects() {
        let (mut tree, arr) = object_doc("const o = [1];");
        assert!(matches!(
            insert_item(&mut tree, arr, "a", "1", None),
            Err(CoreError::TypeMismatch { .. })
        ));
    }
}
