//! Inline run resolver.
//!
//! [`resolver`] turns raw strings into [`Rune`](crate::document::Rune)
//! sequences (emphasis, links, anchors, forced breaks, rainbow colors);
//! [`script`] re-splits resolved atoms at Latin/Cyrillic boundaries right
//! before serialization.
pub mod rainbow;
pub mod resolver;
pub mod script;

pub use rainbow::HueCursor;
pub use resolver::{resolve, resolve_document};
pub use script::{split_script, split_scripts};
