//! Document hierarchy: an arena tree of structural units.
//!
//! Units are stored flat, with parent/children as indices, so distance
//! queries need no pointer chasing and the tree has no ownership cycles.
//! Trees are built per document, populated during parsing and discarded when
//! the document is done; nothing here is shared across documents.

use serde::{Deserialize, Serialize};

use crate::token::Sentence;

/// Index of a unit within its [`DocumentTree`] arena.
pub type UnitId = usize;

/// The kind of a structural unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Document,
    Section,
    Paragraph,
    Table,
    Row,
    Cell,
    Figure,
    Caption,
    Footnote,
    Heading,
    Sentence,
}

/// Structural distance between two units, totally ordered:
/// `Same < Sentence < Paragraph < Section < Document`.
///
/// Derived ordering follows declaration order, so comparisons and field
/// `max_range` bounds come for free.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Range {
    Same,
    Sentence,
    Paragraph,
    Section,
    Document,
}

struct UnitNode {
    kind: UnitKind,
    parent: Option<UnitId>,
    children: Vec<UnitId>,
    sentence: Option<Sentence>,
}

/// The per-document containment tree.
pub struct DocumentTree {
    nodes: Vec<UnitNode>,
}

impl DocumentTree {
    /// A new tree containing only the document root.
    pub fn new() -> Self {
        DocumentTree {
            nodes: vec![UnitNode {
                kind: UnitKind::Document,
                parent: None,
                children: Vec::new(),
                sentence: None,
            }],
        }
    }

    pub fn root(&self) -> UnitId {
        0
    }

    /// Append a structural unit under `parent`, returning its id.
    ///
    /// Children added in reading order keep the arena in document order,
    /// which the merging engine relies on for deterministic tie-breaks.
    pub fn add_unit(&mut self, kind: UnitKind, parent: UnitId) -> UnitId {
        let id = self.nodes.len();
        self.nodes.push(UnitNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            sentence: None,
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Attach a sentence as a new leaf unit under `parent`.
    pub fn add_sentence(&mut self, parent: UnitId, sentence: Sentence) -> UnitId {
        let id = self.add_unit(UnitKind::Sentence, parent);
        self.nodes[id].sentence = Some(sentence);
        id
    }

    pub fn kind(&self, unit: UnitId) -> UnitKind {
        self.nodes[unit].kind
    }

    pub fn parent(&self, unit: UnitId) -> Option<UnitId> {
        self.nodes[unit].parent
    }

    pub fn children(&self, unit: UnitId) -> &[UnitId] {
        &self.nodes[unit].children
    }

    pub fn sentence(&self, unit: UnitId) -> Option<&Sentence> {
        self.nodes[unit].sentence.as_ref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }

    /// All sentence-bearing units in document order (depth-first preorder).
    pub fn sentences(&self) -> Vec<(UnitId, &Sentence)> {
        let mut found = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(unit) = stack.pop() {
            if let Some(sentence) = self.sentence(unit) {
                found.push((unit, sentence));
            }
            // Push children reversed so the leftmost is visited first.
            for &child in self.nodes[unit].children.iter().rev() {
                stack.push(child);
            }
        }
        found
    }

    /// Structural distance classification between two units.
    ///
    /// The class is determined by the boundary crossed directly below the
    /// nearest common ancestor: sibling sentences in one paragraph are
    /// [`Range::Sentence`] apart, units in different paragraphs of one
    /// section are [`Range::Paragraph`] apart, and so on. Ancestor/descendant
    /// pairs count as the descendant side's boundary alone.
    pub fn range(&self, a: UnitId, b: UnitId) -> Range {
        if a == b {
            return Range::Same;
        }
        let path_a = self.ancestry(a);
        let path_b = self.ancestry(b);
        // Find the nearest common ancestor by walking both root-anchored
        // paths while they agree.
        let mut common = 0;
        while common < path_a.len()
            && common < path_b.len()
            && path_a[common] == path_b[common]
        {
            common += 1;
        }
        debug_assert!(common > 0, "all units share the document root");
        let below_a = path_a.get(common).map(|&unit| self.boundary_class(unit));
        let below_b = path_b.get(common).map(|&unit| self.boundary_class(unit));
        match (below_a, below_b) {
            (Some(a), Some(b)) => a.max(b),
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => Range::Same,
        }
    }

    /// Root-anchored ancestor path, ending at the unit itself.
    fn ancestry(&self, unit: UnitId) -> Vec<UnitId> {
        let mut path = vec![unit];
        let mut cursor = unit;
        while let Some(parent) = self.nodes[cursor].parent {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }

    /// The distance class contributed by crossing into this unit from a
    /// sibling.
    fn boundary_class(&self, unit: UnitId) -> Range {
        match self.nodes[unit].kind {
            UnitKind::Sentence | UnitKind::Cell | UnitKind::Row => Range::Sentence,
            UnitKind::Paragraph
            | UnitKind::Heading
            | UnitKind::Caption
            | UnitKind::Footnote
            | UnitKind::Table
            | UnitKind::Figure => Range::Paragraph,
            UnitKind::Section => Range::Section,
            UnitKind::Document => Range::Document,
        }
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        DocumentTree::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sentence;

    fn two_paragraph_doc() -> (DocumentTree, UnitId, UnitId, UnitId) {
        let mut tree = DocumentTree::new();
        let section = tree.add_unit(UnitKind::Section, tree.root());
        let para_a = tree.add_unit(UnitKind::Paragraph, section);
        let s1 = tree.add_sentence(para_a, sentence("first sentence"));
        let s2 = tree.add_sentence(para_a, sentence("second sentence"));
        let para_b = tree.add_unit(UnitKind::Paragraph, section);
        let s3 = tree.add_sentence(para_b, sentence("third sentence"));
        (tree, s1, s2, s3)
    }

    #[test]
    fn range_is_same_for_identical_units() {
        let (tree, s1, _, _) = two_paragraph_doc();
        assert_eq!(tree.range(s1, s1), Range::Same);
    }

    #[test]
    fn siblings_in_one_paragraph_are_sentence_range() {
        let (tree, s1, s2, _) = two_paragraph_doc();
        assert_eq!(tree.range(s1, s2), Range::Sentence);
        assert_eq!(tree.range(s2, s1), Range::Sentence);
    }

    #[test]
    fn different_paragraphs_are_paragraph_range() {
        let (tree, s1, _, s3) = two_paragraph_doc();
        assert_eq!(tree.range(s1, s3), Range::Paragraph);
    }

    #[test]
    fn different_sections_are_section_range() {
        let mut tree = DocumentTree::new();
        let sec_a = tree.add_unit(UnitKind::Section, tree.root());
        let para_a = tree.add_unit(UnitKind::Paragraph, sec_a);
        let s1 = tree.add_sentence(para_a, sentence("one"));
        let sec_b = tree.add_unit(UnitKind::Section, tree.root());
        let para_b = tree.add_unit(UnitKind::Paragraph, sec_b);
        let s2 = tree.add_sentence(para_b, sentence("two"));
        assert_eq!(tree.range(s1, s2), Range::Section);
    }

    #[test]
    fn table_cells_in_one_row_are_sentence_range() {
        let mut tree = DocumentTree::new();
        let table = tree.add_unit(UnitKind::Table, tree.root());
        let row = tree.add_unit(UnitKind::Row, table);
        let cell_a = tree.add_unit(UnitKind::Cell, row);
        let s1 = tree.add_sentence(cell_a, sentence("mp 100"));
        let cell_b = tree.add_unit(UnitKind::Cell, row);
        let s2 = tree.add_sentence(cell_b, sentence("H2O"));
        assert_eq!(tree.range(s1, s2), Range::Sentence);
    }

    #[test]
    fn range_order_matches_structural_distance() {
        assert!(Range::Same < Range::Sentence);
        assert!(Range::Sentence < Range::Paragraph);
        assert!(Range::Paragraph < Range::Section);
        assert!(Range::Section < Range::Document);
    }

    #[test]
    fn sentences_are_in_document_order() {
        let (tree, s1, s2, s3) = two_paragraph_doc();
        let order: Vec<UnitId> = tree.sentences().iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![s1, s2, s3]);
    }
}
