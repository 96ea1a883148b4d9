//! Table model editing, built on the generic structural editors.
//!
//! A table cell's logical value is `_makeTable({...})`; the constructor
//! argument's properties are columns. A property is a column iff its value
//! is an object literal with both a `values` array and a `default`
//! expression - anything else is invisible to table operations. Every
//! row-mutating operation touches all recognized columns so their `values`
//! sequences keep equal length.

use std::collections::HashSet;

use codesheet_syntax::{is_identifier_text, NodeId, NodeKind, PropertyKind, Tree};
use rand::Rng;

use crate::document::TABLE_FLAG_KEY;
use crate::document::VALUE_KEY;
use crate::edit::object;
use crate::error::{CoreError, Result};

/// Key of a column's row sequence.
pub const VALUES_KEY: &str = "values";

/// Key of a column's fallback expression.
pub const DEFAULT_KEY: &str = "default";

/// Placeholder expression for padded row slots.
pub const PLACEHOLDER: &str = "undefined";

/// Stored expression of a fresh table cell.
const TABLE_TEMPLATE: &str = "function () {return _makeTable({})}";

/// Generated headings start at this length and grow on sustained collision.
const HEADING_LEN: usize = 8;
const HEADING_TRIES_PER_LEN: u32 = 32;

/// Turn a plain cell into a table: rewrite its `v` to a constructor thunk
/// and set its `t` flag, inserting the flag property if absent.
pub fn create_table(tree: &mut Tree, cell_object: NodeId) -> Result<()> {
    let Some(value_prop) = object::get_item(tree, cell_object, VALUE_KEY)? else {
        return Err(CoreError::KeyNotFound(VALUE_KEY.to_string()));
    };
    object::replace_item_value(tree, value_prop, TABLE_TEMPLATE)?;
    match object::get_item(tree, cell_object, TABLE_FLAG_KEY)? {
        Some(flag_prop) => {
            object::replace_item_value(tree, flag_prop, "true")?;
        }
        None => {
            object::insert_item(tree, cell_object, TABLE_FLAG_KEY, "true", None)?;
        }
    }
    tracing::debug!("converted cell to table");
    Ok(())
}

/// Unwrap a table cell's logical value (the constructor call) to the object
/// literal holding its columns.
pub fn table_object(tree: &Tree, value: NodeId) -> Result<NodeId> {
    let NodeKind::CallExpr { arguments, .. } = tree.kind(value) else {
        return Err(CoreError::mismatch("table constructor call", tree, value));
    };
    let Some(argument) = arguments.first() else {
        return Err(CoreError::TypeMismatch {
            expected: "table constructor argument",
            found: "empty argument list",
        });
    };
    if !matches!(tree.kind(*argument), NodeKind::ObjectExpr { .. }) {
        return Err(CoreError::mismatch("object literal", tree, *argument));
    }
    Ok(*argument)
}

/// Recognized columns in declaration order.
pub fn columns(tree: &Tree, table: NodeId) -> Result<Vec<(String, NodeId)>> {
    let mut out = Vec::new();
    for property in object::properties(tree, table)? {
        let NodeKind::Property { key, value, .. } = tree.kind(property) else {
            continue;
        };
        if !matches!(tree.kind(*value), NodeKind::ObjectExpr { .. }) {
            continue;
        }
        let has_values = object::get_item(tree, *value, VALUES_KEY)?.is_some();
        let has_default = object::get_item(tree, *value, DEFAULT_KEY)?.is_some();
        if !(has_values && has_default) {
            continue;
        }
        if let Some(heading) = crate::document::property_key_text(tree, *key) {
            out.push((heading, *value));
        }
    }
    Ok(out)
}

/// Grow an array literal to at least `new_size` elements, padding with
/// placeholders. Never shrinks.
pub fn resize_values(tree: &mut Tree, arr: NodeId, new_size: usize) -> Result<()> {
    let mut len = super::array::elements(tree, arr)?.len();
    while len < new_size {
        let placeholder = tree.new_identifier(PLACEHOLDER);
        tree.array_insert(arr, len, placeholder);
        len += 1;
    }
    Ok(())
}

/// A column's `values` node, required to be an array literal.
fn column_values_array(tree: &Tree, column: NodeId, heading: &str) -> Result<NodeId> {
    let Some(values_prop) = object::get_item(tree, column, VALUES_KEY)? else {
        return Err(CoreError::ColumnNotFound(heading.to_string()));
    };
    let values = object::item_value(tree, values_prop)?;
    if !matches!(tree.kind(values), NodeKind::ArrayExpr { .. }) {
        return Err(CoreError::mismatch("array literal", tree, values));
    }
    Ok(values)
}

/// Set one value cell, growing the column's rows to reach `row` first.
pub fn set_cell(
    tree: &mut Tree,
    table: NodeId,
    heading: &str,
    row: usize,
    value_text: &str,
) -> Result<NodeId> {
    let column = columns(tree, table)?
        .into_iter()
        .find_map(|(h, col)| (h == heading).then_some(col))
        .ok_or_else(|| CoreError::ColumnNotFound(heading.to_string()))?;
    let values = column_values_array(tree, column, heading)?;
    resize_values(tree, values, row + 1)?;
    super::array::replace_element(tree, values, row, value_text)
}

/// Add a column pre-filled to the table's current maximum row count.
/// Returns the heading, generated when not supplied.
pub fn add_column(
    tree: &mut Tree,
    table: NodeId,
    heading: Option<&str>,
    index: Option<usize>,
) -> Result<String> {
    let existing = columns(tree, table)?;
    let mut headings: HashSet<String> = HashSet::new();
    let mut max_len = 0;
    for (h, column) in &existing {
        headings.insert(h.clone());
        if let Some(values_prop) = object::get_item(tree, *column, VALUES_KEY)? {
            let values = object::item_value(tree, values_prop)?;
            if let NodeKind::ArrayExpr { elements } = tree.kind(values) {
                max_len = max_len.max(elements.len());
            }
        }
    }

    let heading = match heading {
        Some(text) => {
            if headings.contains(text) {
                return Err(CoreError::DuplicateKey(text.to_string()));
            }
            text.to_string()
        }
        None => generate_heading(&headings),
    };

    let default_key = tree.new_identifier(DEFAULT_KEY);
    let default_value = tree.new_null();
    let default_prop = tree.new_property(PropertyKind::Init, default_key, default_value);

    let mut slots = Vec::with_capacity(max_len);
    for _ in 0..max_len {
        slots.push(tree.new_identifier(PLACEHOLDER));
    }
    let values_key = tree.new_identifier(VALUES_KEY);
    let values_value = tree.new_array(slots);
    let values_prop = tree.new_property(PropertyKind::Init, values_key, values_value);

    let column_object = tree.new_object(vec![default_prop, values_prop]);
    let key_node = if is_identifier_text(&heading) {
        tree.new_identifier(&heading)
    } else {
        tree.new_string(&heading)
    };
    let property = tree.new_property(PropertyKind::Init, key_node, column_object);
    let len = object::properties(tree, table)?.len();
    tree.object_insert(table, index.unwrap_or(len), property);
    tracing::debug!(heading, rows = max_len, "added column");
    Ok(heading)
}

/// Random base-36 heading, unique among `existing`. Bounded retry: after a
/// fixed number of collisions the candidate length grows, so the loop
/// terminates even on a pathological heading set.
fn generate_heading(existing: &HashSet<String>) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let mut len = HEADING_LEN;
    let mut tries = 0;
    loop {
        let candidate: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        if !existing.contains(&candidate) {
            return candidate;
        }
        tries += 1;
        if tries % HEADING_TRIES_PER_LEN == 0 {
            len += 1;
        }
    }
}

/// Remove every property whose key equals `heading` - duplicated or
/// non-column properties included.
pub fn delete_column(tree: &mut Tree, table: NodeId, heading: &str) -> Result<usize> {
    let props = object::properties(tree, table)?;
    let mut matching = Vec::new();
    for (i, property) in props.iter().enumerate() {
        if let NodeKind::Property { key, .. } = tree.kind(*property) {
            if crate::document::property_key_text(tree, *key).as_deref() == Some(heading) {
                matching.push(i);
            }
        }
    }
    if matching.is_empty() {
        return Err(CoreError::ColumnNotFound(heading.to_string()));
    }
    for index in matching.iter().rev() {
        tree.object_remove(table, *index);
    }
    Ok(matching.len())
}

/// Append one row: the supplied value to the affected column, placeholders
/// everywhere else. This is what keeps all columns the same length.
pub fn add_row(
    tree: &mut Tree,
    table: NodeId,
    affected_heading: Option<&str>,
    value_text: Option<&str>,
) -> Result<()> {
    for (heading, column) in columns(tree, table)? {
        let Some(values_prop) = object::get_item(tree, column, VALUES_KEY)? else {
            continue;
        };
        let values = object::item_value(tree, values_prop)?;
        let NodeKind::ArrayExpr { elements } = tree.kind(values) else {
            continue;
        };
        let len = elements.len();
        let affected = affected_heading == Some(heading.as_str());
        match (affected, value_text) {
            (true, Some(text)) => {
                super::array::insert_element(tree, values, len, text)?;
            }
            _ => {
                let placeholder = tree.new_identifier(PLACEHOLDER);
                tree.array_insert(values, len, placeholder);
            }
        }
    }
    Ok(())
}

/// Remove row `row` from every recognized column, preserving the order of
/// the remaining rows.
pub fn delete_row(tree: &mut Tree, table: NodeId, row: usize) -> Result<()> {
    let cols = columns(tree, table)?;
    let mut max_len = 0;
    let mut arrays = Vec::new();
    for (_, column) in &cols {
        let Some(values_prop) = object::get_item(tree, *column, VALUES_KEY)? else {
            continue;
        };
        let values = object::item_value(tree, values_prop)?;
        if let NodeKind::ArrayExpr { elements } = tree.kind(values) {
            max_len = max_len.max(elements.len());
            arrays.push((values, elements.len()));
        }
    }
    if row >= max_len {
        return Err(CoreError::IndexOutOfBounds {
            index: row,
            len: max_len,
        });
    }
    for (values, len) in arrays {
        if row < len {
            tree.array_remove(values, row);
        }
    }
    Ok(())
}
