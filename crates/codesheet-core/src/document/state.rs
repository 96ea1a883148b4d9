use codesheet_syntax::{NodeId, PrintOptions, Tree};

use super::locate;
use crate::error::Result;

/// A parsed codesheet document.
///
/// The tree is the single source of truth between `parse` and `print`; all
/// reads and mutations go through it. Persistence and evaluation belong to
/// the surrounding application, which owns when to call the two entry
/// points.
#[derive(Debug)]
pub struct Document {
    tree: Tree,
    /// Whether the tree has been handed out for mutation since load/save.
    modified: bool,
}

impl Document {
    /// Parse document source text. Fails with a positioned error on invalid
    /// input; the caller keeps its previous document state in that case.
    pub fn parse(source: &str) -> Result<Document> {
        let tree = Tree::parse(source)?;
        Ok(Document {
            tree,
            modified: false,
        })
    }

    /// Print with default options (LF line terminator for synthesized
    /// breaks).
    pub fn print(&self) -> String {
        self.print_with(&PrintOptions::default())
    }

    pub fn print_with(&self, options: &PrintOptions) -> String {
        self.tree.print(options)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable tree access for the structural editors. Marks the document
    /// modified.
    pub fn tree_mut(&mut self) -> &mut Tree {
        self.modified = true;
        &mut self.tree
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    /// Called by the host after it has persisted the printed text.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Handle to the document's cell collection object literal.
    pub fn cells(&self) -> Result<NodeId> {
        locate::cell_collection(&self.tree)
    }

    /// Handle to one named cell within the collection.
    pub fn cell(&self, name: &str) -> Result<locate::CellHandle> {
        let collection = self.cells()?;
        locate::find_cell(&self.tree, collection, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_document_unmodified() {
        let doc = Document::parse("const _CELLS = {a: {v: 1}};").unwrap();
        assert!(!doc.modified());
    }

    #[test]
    fn test_tree_mut_marks_modified_and_mark_saved_clears() {
        let mut doc = Document::parse("const _CELLS = {a: {v: 1}};").unwrap();
        let _ = doc.tree_mut();
        assert!(doc.modified());
        doc.mark_saved();
        assert!(!doc.modified());
    }

    #[test]
    fn test_parse_error_propagates_position() {
        let err = Document::parse("const _CELLS = {a: {v: }};").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 1"), "{msg}");
    }
}
