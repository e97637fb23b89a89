//! This library handles creating **XMB** files used by *Age of Empires III*.
//!
//! # XMB Tree Format Documentation
//!
//! XMB is a binary encoding of an XML document. Element and attribute names are stored once in two
//! name tables and every node refers to them by index. Each node records the length of its whole
//! subtree, so a reader can skip over children it does not care about.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 2 bytes: 0x3158 ("X1")                                     |
//! | 0x0002         | Length                 | 4 bytes: Size of the file minus 6                          |
//! | 0x0006         | Root magic             | 2 bytes: 0x5258 ("XR")                                     |
//! | 0x0008         | Root version           | 4 bytes: Fixed value 0x00000004                            |
//! | 0x000C         | Tree version           | 4 bytes: Fixed value 0x00000008                            |
//! | 0x0010         | Element names          | Name table                                                 |
//! | ...            | Attribute names        | Name table                                                 |
//! | ...            | Root node              | Node, followed by all of its descendants                   |
//!
//! ### Name Table
//!
//! A 4-byte name count followed by every name as a 4-byte UTF-16 character count and the UTF-16LE
//! characters. Names are numbered from zero in order of first appearance, walking the document in
//! pre-order. Elements and attributes are numbered independently.
//!
//! ### Node
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Tag                    | 2 bytes: 0x4E58 ("XN")                                     |
//! | 0x0002         | Length                 | 4 bytes: Size of the node and its descendants minus 6      |
//! | 0x0006         | Text Length            | 4 bytes: UTF-16 character count of the leading text        |
//! | 0x000A         | Text                   | (Text Length * 2) bytes: UTF-16LE text                     |
//! | ...            | Name ID                | 4 bytes: Index into the element name table                 |
//! | ...            | Line Number            | 4 bytes: Always zero                                       |
//! | ...            | Attribute Count        | 4 bytes: Number of attributes                              |
//! | ...            | Attributes             | Per attribute: 4-byte name ID, 4-byte UTF-16 character     |
//! |                |                        | count, UTF-16LE value                                      |
//! | ...            | Child Count            | 4 bytes: Number of element children                        |
//! | ...            | Children               | Child nodes, in document order                             |
//!
//! Only text that is the first child of an element is kept. Comments, CDATA and processing
//! instructions are dropped.
//!
//! ## Encoding
//!
//! Encoding runs in three passes. Names are interned ([`intern`]), every node is sized and placed
//! ([`layout`]), then every node is written into its own disjoint slice of the output in parallel
//! ([`write`]). Since lengths are known before anything is written, nothing is patched afterwards.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.xmb`, appended to the source name (`units.xml.xmb`)
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Text**: UTF-16LE
//!

pub mod document;
pub mod error;
pub mod intern;
pub mod layout;
pub mod types;
pub mod write;

pub use document::{Attribute, Document, Element, NodeId};
pub use intern::{NameTables, StringTable};
pub use layout::{NodeLayout, TreeLayout};
pub use types::XmbHeader;
pub use write::{encode, write_tree};
