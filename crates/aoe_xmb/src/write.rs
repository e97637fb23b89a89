//! Types for writing XMB files
//!

use binrw::BinWrite;
use byteorder::{LittleEndian, WriteBytesExt};
use rayon::prelude::*;
use std::io::{Cursor, Write};
use tracing::{debug, instrument};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::intern::NameTables;
use crate::layout::{own_size, NodeLayout, TreeLayout};
use crate::types::{write_utf16, XmbHeader, LENGTH_PREFIX, NODE_TAG};

/// Encode `document` into a complete XMB file.
///
/// ```
/// # fn doit() -> aoe_xmb::error::Result<()>
/// # {
/// use aoe_xmb::Document;
///
/// let document = Document::parse(r#"<Unit id="7"/>"#)?;
/// let xmb = aoe_xmb::encode(&document)?;
///
/// assert_eq!(&xmb[..2], b"X1");
/// assert_eq!(xmb.len(), 80);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[instrument(skip_all, fields(elements = document.len()), err)]
pub fn encode(document: &Document) -> Result<Vec<u8>> {
    let names = NameTables::collect(document);
    let layout = TreeLayout::compute(document);

    let base = XmbHeader::SIZE + names.encoded_len();
    let total = base + layout.total;
    let length = u32::try_from(total - LENGTH_PREFIX).map_err(|_| Error::TooLarge(total))?;

    let mut output = Vec::with_capacity(total);
    {
        let mut cursor = Cursor::new(&mut output);
        XmbHeader::new(length).write(&mut cursor)?;
        names.write(&mut cursor)?;
    }
    output.resize(total, 0);

    write_tree(&mut output[base..], &layout, document, &names)?;
    debug!(
        element_names = names.elements.len(),
        attribute_names = names.attributes.len(),
        size = total,
        "encoded document"
    );

    Ok(output)
}

/// Write every node of `document` into `payload`, which must be exactly `layout.total` bytes.
///
/// Each node only receives the slice holding its own fields, so nodes are written in parallel
/// without sharing anything mutable.
pub fn write_tree(
    payload: &mut [u8],
    layout: &TreeLayout,
    document: &Document,
    names: &NameTables,
) -> Result<()> {
    if payload.len() != layout.total {
        return Err(Error::InvalidLayout {
            node: document.root(),
            expected: layout.total,
            actual: payload.len(),
        });
    }

    split_regions(payload, &layout.nodes)?
        .into_par_iter()
        .try_for_each(|(node, region)| write_node(region, node, document, names))
}

/// Cut `payload` into the own region of every node.
///
/// Fails unless the regions follow each other without gaps or overlaps and cover the whole payload.
fn split_regions<'a, 'n>(
    payload: &'a mut [u8],
    nodes: &'n [NodeLayout],
) -> Result<Vec<(&'n NodeLayout, &'a mut [u8])>> {
    let mut regions = Vec::with_capacity(nodes.len());
    let mut rest = payload;
    let mut cursor = 0;

    for node in nodes {
        if node.offset != cursor || node.header_len > rest.len() {
            return Err(Error::InvalidLayout {
                node: node.node,
                expected: cursor,
                actual: node.offset,
            });
        }

        let (region, tail) = std::mem::take(&mut rest).split_at_mut(node.header_len);
        regions.push((node, region));
        rest = tail;
        cursor += node.header_len;
    }

    if !rest.is_empty() {
        return Err(Error::UnclaimedBytes(rest.len()));
    }

    Ok(regions)
}

/// Write the own fields of one node into `region`.
fn write_node(
    region: &mut [u8],
    layout: &NodeLayout,
    document: &Document,
    names: &NameTables,
) -> Result<()> {
    let element = document
        .get(layout.node)
        .ok_or(Error::UnknownNode(layout.node))?;

    let expected = own_size(element);
    if region.len() != expected {
        return Err(Error::InvalidLayout {
            node: layout.node,
            expected,
            actual: region.len(),
        });
    }

    let name_id = names
        .elements
        .id(&element.name)
        .ok_or_else(|| Error::UnknownName(element.name.clone()))?;

    let mut writer = Cursor::new(region);
    writer.write_all(&NODE_TAG)?;
    writer.write_u32::<LittleEndian>(layout.length_field() as u32)?;
    match &element.text {
        Some(text) => write_utf16(&mut writer, text.as_slice())?,
        None => writer.write_u32::<LittleEndian>(0)?,
    }
    writer.write_u32::<LittleEndian>(name_id)?;
    // Line number
    writer.write_u32::<LittleEndian>(0)?;

    writer.write_u32::<LittleEndian>(element.attributes.len() as u32)?;
    for attribute in &element.attributes {
        let attribute_id = names
            .attributes
            .id(&attribute.name)
            .ok_or_else(|| Error::UnknownName(attribute.name.clone()))?;
        writer.write_u32::<LittleEndian>(attribute_id)?;
        write_utf16(&mut writer, attribute.value.as_slice())?;
    }

    writer.write_u32::<LittleEndian>(layout.child_count as u32)?;

    Ok(())
}
