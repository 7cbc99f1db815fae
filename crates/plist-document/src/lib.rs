//! Editable document model for property lists.
//!
//! A [`Tree`] owns one canonical root [`plist_value::Item`] plus a proxy
//! node arena mirroring its collection structure for a retained-mode tree
//! widget. A [`Document`] layers undo/redo on top: every mutation goes
//! through one funnel primitive that records its own inverse as an
//! [`Edit`] value on an explicit LIFO stack.

/// Self-describing edit commands and node structural operations.
pub mod edit;

/// The undo-aware mutation layer and its composite edits.
pub mod document;

/// The canonical item tree and its proxy node arena.
pub mod tree;


pub use document::Document;
pub use edit::{Edit, NodeOperation};
pub use tree::{NodeId, Tree};
