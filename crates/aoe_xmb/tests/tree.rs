use aoe_xmb::{encode, Document, NameTables, TreeLayout, XmbHeader};
use binrw::BinRead;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::io::Cursor;

fn read_u32(bytes: &[u8], pos: usize) -> usize {
    u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]]) as usize
}

/// Skip a name table, returning the names and the position after it
fn read_table(bytes: &[u8], mut pos: usize) -> (Vec<String>, usize) {
    let count = read_u32(bytes, pos);
    pos += 4;

    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        let len = read_u32(bytes, pos);
        pos += 4;
        let units = bytes[pos..pos + len * 2]
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect::<Vec<_>>();
        names.push(String::from_utf16_lossy(&units));
        pos += len * 2;
    }

    (names, pos)
}

/// Walk the node at `pos` and all of its children, checking every length field on the way.
///
/// Returns the position after the subtree and the number of nodes in it.
fn walk(bytes: &[u8], pos: usize) -> (usize, usize) {
    assert_eq!(&bytes[pos..pos + 2], b"XN", "node tag at {pos}");
    let length = read_u32(bytes, pos + 2);

    let mut cursor = pos + 6;
    let text = read_u32(bytes, cursor);
    cursor += 4 + text * 2;
    // Name id and line number
    cursor += 8;

    let attributes = read_u32(bytes, cursor);
    cursor += 4;
    for _ in 0..attributes {
        let value = read_u32(bytes, cursor + 4);
        cursor += 8 + value * 2;
    }

    let children = read_u32(bytes, cursor);
    cursor += 4;

    let mut count = 1;
    for _ in 0..children {
        let (end, nodes) = walk(bytes, cursor);
        cursor = end;
        count += nodes;
    }

    assert_eq!(cursor - pos - 6, length, "length field of node at {pos}");
    (cursor, count)
}

#[test]
fn encode_scenario_unit() -> aoe_xmb::error::Result<()> {
    let doc = Document::parse(r#"<Unit id="7"/>"#)?;
    let bytes = encode(&doc)?;

    let header = XmbHeader::read(&mut Cursor::new(&bytes))?;
    assert_eq!(header.length as usize, bytes.len() - 6);

    let (elements, pos) = read_table(&bytes, XmbHeader::SIZE);
    let (attributes, pos) = read_table(&bytes, pos);
    assert_eq!(elements, vec!["Unit"]);
    assert_eq!(attributes, vec!["id"]);

    // Name id 0, attribute count 1, attribute id 0
    assert_eq!(read_u32(&bytes, pos + 10), 0);
    assert_eq!(read_u32(&bytes, pos + 18), 1);
    assert_eq!(read_u32(&bytes, pos + 22), 0);
    // Child count
    assert_eq!(read_u32(&bytes, bytes.len() - 4), 0);

    assert_eq!(walk(&bytes, pos), (bytes.len(), 1));

    Ok(())
}

#[test]
fn encode_game_like_document() -> aoe_xmb::error::Result<()> {
    let doc = Document::parse(
        r#"<?xml version="1.0" encoding="utf-8"?>
        <!-- generated -->
        <civs>
            <civ>
                <name>British</name>
                <displaynameid>20100</displaynameid>
                <agetech age="Age1">
                    <tech>Colonize</tech>
                </agetech>
                <homecityflagtexture>ui\homecity\british_flag</homecityflagtexture>
            </civ>
            <civ>
                <name>Français &amp; Co</name>
                <agetech age="Age1" status="active"/>
            </civ>
        </civs>
        "#,
    )?;
    let bytes = encode(&doc)?;

    let (elements, pos) = read_table(&bytes, XmbHeader::SIZE);
    let (attributes, pos) = read_table(&bytes, pos);
    assert_eq!(
        elements,
        vec!["civs", "civ", "name", "displaynameid", "agetech", "tech", "homecityflagtexture"]
    );
    assert_eq!(attributes, vec!["age", "status"]);

    assert_eq!(walk(&bytes, pos), (bytes.len(), doc.len()));

    Ok(())
}

#[test]
fn encode_is_deterministic() -> aoe_xmb::error::Result<()> {
    let mut doc = Document::new("Root");
    for i in 0..64 {
        let child = doc.append_child(doc.root(), format!("Child{}", i % 5));
        doc.push_attribute(child, "index", &i.to_string());
        doc.set_text(child, &"x".repeat(i));
    }

    let first = encode(&doc)?;
    for _ in 0..8 {
        assert_eq!(encode(&doc)?, first);
    }

    Ok(())
}

#[test]
fn encode_deeply_nested_document() -> aoe_xmb::error::Result<()> {
    const DEPTH: usize = 100_000;
    let xml = format!("{}{}", "<a>".repeat(DEPTH), "</a>".repeat(DEPTH));

    let doc = Document::parse(&xml)?;
    assert_eq!(doc.len(), DEPTH);

    let layout = TreeLayout::compute(&doc);
    layout.validate()?;
    assert_eq!(layout.total, 26 * DEPTH);
    for (depth, node) in layout.nodes.iter().enumerate() {
        assert_eq!(node.offset, 26 * depth);
        assert_eq!(node.length, 26 * (DEPTH - depth));
    }

    let bytes = encode(&doc)?;
    // Header, one element name and an empty attribute table
    let base = 16 + (4 + 4 + 2) + 4;
    assert_eq!(bytes.len(), base + 26 * DEPTH);
    assert_eq!(read_u32(&bytes, base + 2), 26 * DEPTH - 6);
    // The innermost element has no children
    assert_eq!(read_u32(&bytes, bytes.len() - 4), 0);

    Ok(())
}

#[derive(Debug, Clone)]
struct NodeShape {
    parent: usize,
    name: usize,
    attributes: Vec<(usize, String)>,
    text: Option<String>,
}

fn node_shape() -> impl Strategy<Value = NodeShape> {
    (
        any::<usize>(),
        0usize..6,
        prop::collection::vec((0usize..4, "\\PC{0,12}"), 0..4),
        prop::option::of("\\PC{1,16}"),
    )
        .prop_map(|(parent, name, attributes, text)| NodeShape {
            parent,
            name,
            attributes,
            text,
        })
}

fn build(shapes: &[NodeShape]) -> Document {
    const NAMES: [&str; 6] = ["Unit", "Cost", "Tech", "Effect", "Ünïcode", "𝄞"];
    const ATTRIBUTES: [&str; 4] = ["id", "type", "amount", "név"];

    let mut doc = Document::new("Root");
    for shape in shapes {
        let parent = shape.parent % doc.len();
        let node = doc.append_child(parent, NAMES[shape.name]);
        for (name, value) in &shape.attributes {
            doc.push_attribute(node, ATTRIBUTES[*name], value);
        }
        if let Some(text) = &shape.text {
            doc.set_text(node, text);
        }
    }
    doc
}

proptest! {
    #[test]
    fn layout_tiles_payload(shapes in prop::collection::vec(node_shape(), 0..64)) {
        let doc = build(&shapes);
        let layout = TreeLayout::compute(&doc);

        prop_assert!(layout.validate().is_ok());
        prop_assert_eq!(layout.nodes.len(), doc.len());
        prop_assert_eq!(layout.nodes[0].length, layout.total);

        for node in &layout.nodes {
            let children = layout
                .nodes
                .iter()
                .filter(|n| n.parent == Some(node.node))
                .collect::<Vec<_>>();
            prop_assert_eq!(children.len(), node.child_count);

            // Children follow the node's own fields back to back and fill the rest of its range
            let mut cursor = node.offset + node.header_len;
            for child in children {
                prop_assert_eq!(child.offset, cursor);
                cursor += child.length;
            }
            prop_assert_eq!(cursor, node.offset + node.length);
        }
    }

    #[test]
    fn length_fields_match_subtrees(shapes in prop::collection::vec(node_shape(), 0..64)) {
        let doc = build(&shapes);
        let bytes = encode(&doc).expect("encode");

        let header = XmbHeader::read(&mut Cursor::new(&bytes)).expect("header");
        prop_assert_eq!(header.length as usize, bytes.len() - 6);

        let names = NameTables::collect(&doc);
        let pos = XmbHeader::SIZE + names.encoded_len();
        prop_assert_eq!(walk(&bytes, pos), (bytes.len(), doc.len()));
    }

    #[test]
    fn interned_ids_are_dense(shapes in prop::collection::vec(node_shape(), 0..64)) {
        let doc = build(&shapes);
        let names = NameTables::collect(&doc);

        for (id, name) in names.elements.iter().enumerate() {
            prop_assert_eq!(names.elements.id(name), Some(id as u32));
        }
        prop_assert_eq!(names.elements.id("Root"), Some(0));
        for id in doc.pre_order() {
            prop_assert!(names.elements.id(&doc[id].name).is_some());
        }
    }
}
