//! Streaming markdown helpers: complete a truncated prefix so it renders cleanly, then split it
//! into blocks that can be rendered and memoized one by one.
//!
//! ```
//! use mdmend::{Options, complete, segment};
//!
//! let text = complete("**bold** and *ital", &Options::default());
//! assert_eq!(text, "**bold** and *ital*");
//! assert_eq!(segment(&text), vec!["**bold** and *ital*"]);
//! ```

pub mod complete;
pub mod count;
pub mod error;
pub mod handler;
pub mod options;
pub mod pipeline;
pub mod probe;
pub mod scan;
pub mod segment;
pub mod syntax;
pub mod types;

#[cfg(feature = "pulldown")]
pub mod adapters;

pub use complete::{Builtin, Completer, INCOMPLETE_LINK_URL, complete};
pub use error::Error;
pub use handler::{DEFAULT_PRIORITY, FnHandler, Handler, Step};
pub use options::{LinkMode, Options};
pub use pipeline::{Pipeline, PreparedBlock, RenderMode};
pub use probe::{IncompleteCheck, has_incomplete_code_fence, has_table, is_incomplete};
pub use segment::{Lexer, LineLexer, segment, segment_with};
pub use types::{BlockKind, Token};
