/// Structural parser for the report markup dialect.
///
/// Source text is classified line by line ([`line`]), assembled into a
/// [`Document`](crate::document::Document) tree ([`parser`]), and finally
/// scanned for constructs that span whole text blocks ([`detect`]): external
/// document directives and pipe tables.
///
/// # Example
///
/// ```rust
/// use md2gost::markup;
/// use md2gost::document::Node;
///
/// # fn main() -> Result<(), md2gost::Error> {
/// let parsed = markup::parse("# Intro\nSome text")?;
/// let nodes = &parsed.document.sections[0].nodes;
/// assert_eq!(nodes[0], Node::title("Intro", 1));
/// # Ok(())
/// # }
/// ```
pub mod detect;
pub mod line;
pub mod parser;

pub use line::{ClassifyError, Line, Marker, classify};
pub use parser::{Parsed, parse, parse_file};
