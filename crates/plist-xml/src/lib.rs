//! Order-preserving XML codec for property-list documents.
//!
//! The reader is hand-written rather than layered on a generic XML
//! deserializer for one reason: dictionary pair order must survive exactly
//! as encountered in the document, which generic map-based decoding does
//! not guarantee. The writer emits the canonical header, doctype and
//! `<plist version="1.0">` wrapper; reading what it wrote yields an equal
//! item.

mod error;
mod reader;
mod writer;

pub use error::InvalidDocument;
pub use reader::read;
pub use writer::{write, write_document_bytes};
