use thiserror::Error;

/// The input is not a well-formed property-list XML document.
///
/// Deliberately one coarse error: the reader either produces a complete
/// item tree or this, never a partial result. The reason text is for
/// display only; the documented fallback is to retry the document through
/// an alternate deserializer.
#[derive(Debug, Clone, Error)]
#[error("invalid property list document: {reason}")]
pub struct InvalidDocument {
    reason: String,
}

impl InvalidDocument {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        InvalidDocument { reason: reason.into() }
    }
}
