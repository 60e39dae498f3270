//! In-place edits of nested JSON documents.
//!
//! Two primitives back the sheet operations:
//! - [`merge`]: recursive merge where objects combine and everything else
//!   replaces
//! - [`resolve`]: dotted-path lookup returning a mutable `(parent, key)` slot

mod merge;
mod path;

pub use merge::merge;
pub use path::{resolve, PathHandle};
