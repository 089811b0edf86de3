use thiserror::Error;

/// Errors from parsing configuration values. Completion and segmentation never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown link mode `{0}` (expected `protocol` or `text-only`)")]
    UnknownLinkMode(String),
    #[error("unknown render mode `{0}` (expected `streaming` or `static`)")]
    UnknownRenderMode(String),
}
