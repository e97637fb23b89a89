//! Element and attribute name tables

use byteorder::{LittleEndian, WriteBytesExt};
use derive_more::derive::Deref;
use indexmap::IndexSet;
use std::io::{self, Write};

use crate::document::Document;
use crate::types::{utf16_size, write_utf16};

/// Names in order of first appearance, the position of a name is its id
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct StringTable(IndexSet<String>);

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `name`, assigning the next free id the first time a name is seen.
    pub fn intern(&mut self, name: &str) -> u32 {
        match self.0.get_index_of(name) {
            Some(id) => id as u32,
            None => self.0.insert_full(name.to_string()).0 as u32,
        }
    }

    /// The id of an already interned name
    pub fn id(&self, name: &str) -> Option<u32> {
        self.0.get_index_of(name).map(|id| id as u32)
    }

    /// Serialized size of the table
    pub fn encoded_len(&self) -> usize {
        4 + self
            .0
            .iter()
            .map(|name| utf16_size(name.encode_utf16().count()))
            .sum::<usize>()
    }

    /// Write the name count followed by every name
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.0.len() as u32)?;
        for name in &self.0 {
            write_utf16(writer, &name.encode_utf16().collect::<Vec<_>>())?;
        }
        Ok(())
    }
}

/// The two name tables of an XMB file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTables {
    pub elements: StringTable,
    pub attributes: StringTable,
}

impl NameTables {
    /// Intern every element and attribute name of `document`, walking it in pre-order.
    pub fn collect(document: &Document) -> Self {
        let mut tables = Self::default();
        for id in document.pre_order() {
            let element = &document[id];
            tables.elements.intern(&element.name);
            for attribute in &element.attributes {
                tables.attributes.intern(&attribute.name);
            }
        }
        tables
    }

    pub fn encoded_len(&self) -> usize {
        self.elements.encoded_len() + self.attributes.encoded_len()
    }

    /// Write the element table followed by the attribute table
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.elements.write(writer)?;
        self.attributes.write(writer)
    }
}
