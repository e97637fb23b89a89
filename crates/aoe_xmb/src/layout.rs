//! Sizing pass
//!
//! Every node is placed before anything is written, so the write pass can fill each node without
//! ever going back to patch a length field.

use tracing::trace;

use crate::document::{Document, Element, NodeId};
use crate::error::{Error, Result};
use crate::types::utf16_size;

/// Bytes of a node that do not depend on its content: tag, length, text length, name id, line
/// number, attribute count and child count
const NODE_FIXED_SIZE: usize = 2 + 4 + 4 + 4 + 4 + 4 + 4;

/// Placement of one element in the tree payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLayout {
    /// The element this layout belongs to
    pub node: NodeId,

    /// Parent element, `None` for the root
    pub parent: Option<NodeId>,

    /// Position of the node tag, relative to the start of the tree payload
    pub offset: usize,

    /// Size of the node and all of its descendants
    pub length: usize,

    /// Size of the node's own fields, its children start right after them
    pub header_len: usize,

    /// Number of element children
    pub child_count: usize,
}

impl NodeLayout {
    /// The value stored in the node's length field
    pub fn length_field(&self) -> usize {
        self.length - crate::types::LENGTH_PREFIX
    }
}

/// Layout of every element of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLayout {
    /// One layout per element, in pre-order, which is also increasing offset order
    pub nodes: Vec<NodeLayout>,

    /// Size of the whole tree payload
    pub total: usize,
}

impl TreeLayout {
    /// Size and place every element of `document`.
    pub fn compute(document: &Document) -> Self {
        let (nodes, total) = size_tree(document);
        trace!(nodes = nodes.len(), total, "computed layout");
        Self { nodes, total }
    }

    /// Check that the own fields of every node, taken in order, tile the payload.
    ///
    /// This holds exactly when sibling subtrees are disjoint and every subtree contains its
    /// descendants, which is what lets nodes be written independently.
    pub fn validate(&self) -> Result<()> {
        let mut cursor = 0;
        for layout in &self.nodes {
            if layout.offset != cursor || layout.header_len > layout.length {
                return Err(Error::InvalidLayout {
                    node: layout.node,
                    expected: cursor,
                    actual: layout.offset,
                });
            }
            cursor += layout.header_len;
        }

        match self.total.checked_sub(cursor) {
            Some(0) => Ok(()),
            Some(rest) => Err(Error::UnclaimedBytes(rest)),
            None => Err(Error::InvalidLayout {
                node: 0,
                expected: self.total,
                actual: cursor,
            }),
        }
    }
}

/// Size of the fields of `element` itself, excluding its children
pub fn own_size(element: &Element) -> usize {
    let text = element.text.as_ref().map_or(0, |t| t.len() * 2);
    let attributes = element
        .attributes
        .iter()
        .map(|a| 4 + utf16_size(a.value.len()))
        .sum::<usize>();

    NODE_FIXED_SIZE + text + attributes
}

/// Lay out every element of `document`.
///
/// Returns the layouts in pre-order along with the size of the tree. Nothing recurses, so the depth
/// of the document is only bounded by memory.
fn size_tree(document: &Document) -> (Vec<NodeLayout>, usize) {
    let order = document.pre_order().collect::<Vec<_>>();

    // Position of every element in `order`
    let mut slots = vec![0; document.len()];
    for (slot, &node) in order.iter().enumerate() {
        slots[node] = slot;
    }

    let mut nodes = order
        .iter()
        .map(|&node| {
            let element = &document[node];
            let header_len = own_size(element);
            NodeLayout {
                node,
                parent: element.parent,
                offset: 0,
                length: header_len,
                header_len,
                child_count: element.children.len(),
            }
        })
        .collect::<Vec<_>>();

    // Descendants come after their ancestors, so walking backwards completes every subtree before
    // it is added to its parent
    for slot in (0..nodes.len()).rev() {
        if let Some(parent) = nodes[slot].parent {
            let length = nodes[slot].length;
            nodes[slots[parent]].length += length;
        }
    }

    for slot in 0..nodes.len() {
        let mut cursor = nodes[slot].offset + nodes[slot].header_len;
        for &child in &document[nodes[slot].node].children {
            let child = &mut nodes[slots[child]];
            child.offset = cursor;
            cursor += child.length;
        }
    }

    let total = nodes.first().map_or(0, |root| root.length);
    (nodes, total)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::document::Document;
    use crate::error::{Error, Result};
    use crate::layout::{own_size, NodeLayout, TreeLayout};

    #[test]
    fn layout_single_node() {
        let mut doc = Document::new("Unit");
        doc.push_attribute(doc.root(), "id", "7");

        let layout = TreeLayout::compute(&doc);

        assert_eq!(layout.total, 36);
        assert_eq!(
            layout.nodes,
            vec![NodeLayout {
                node: 0,
                parent: None,
                offset: 0,
                length: 36,
                header_len: 36,
                child_count: 0,
            }]
        );
        assert_eq!(layout.nodes[0].length_field(), 30);
    }

    #[test]
    fn layout_nested() -> Result<()> {
        let doc = Document::parse("<A><B>hi</B><C><D/></C></A>")?;
        let layout = TreeLayout::compute(&doc);

        let placed = layout
            .nodes
            .iter()
            .map(|n| (n.node, n.offset, n.length))
            .collect::<Vec<_>>();

        // B carries two UTF-16 characters of text
        assert_eq!(
            placed,
            vec![(0, 0, 108), (1, 26, 30), (2, 56, 52), (3, 82, 26)]
        );
        assert_eq!(layout.total, 108);
        assert_eq!(layout.nodes[0].child_count, 2);
        assert_eq!(layout.nodes[3].parent, Some(2));
        layout.validate()?;

        Ok(())
    }

    #[test]
    fn layout_follows_pre_order_not_ids() {
        let mut doc = Document::new("A");
        let b = doc.append_child(doc.root(), "B");
        let c = doc.append_child(doc.root(), "C");
        let d = doc.append_child(b, "D");

        let layout = TreeLayout::compute(&doc);

        let placed = layout
            .nodes
            .iter()
            .map(|n| (n.node, n.offset, n.length))
            .collect::<Vec<_>>();
        assert_eq!(
            placed,
            vec![(0, 0, 104), (b, 26, 52), (d, 52, 26), (c, 78, 26)]
        );
        assert_eq!(layout.total, 104);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn own_size_counts_utf16() {
        let mut doc = Document::new("Name");
        doc.set_text(doc.root(), "𝄞");
        doc.push_attribute(doc.root(), "lang", "é");

        // Fixed fields, a surrogate pair of text, and one attribute of one character
        assert_eq!(own_size(&doc[0]), 26 + 4 + (4 + 4 + 2));
    }

    #[test]
    fn validate_rejects_overlap() {
        let mut doc = Document::new("A");
        doc.append_child(doc.root(), "B");
        doc.append_child(doc.root(), "C");

        let mut layout = TreeLayout::compute(&doc);
        layout.nodes[2].offset = layout.nodes[1].offset;

        assert!(matches!(
            layout.validate(),
            Err(Error::InvalidLayout { node: 2, .. })
        ));
    }

    #[test]
    fn validate_rejects_gap() {
        let doc = Document::new("A");

        let mut layout = TreeLayout::compute(&doc);
        layout.total += 4;

        assert!(matches!(layout.validate(), Err(Error::UnclaimedBytes(4))));
    }
}
