/// Word (.docx) document output.
///
/// [`writer`] holds the mutable document model and part serializers;
/// [`format`] the small value types they share.
pub mod format;
pub mod writer;

pub use format::{ImageFormat, LineSpacing, ParagraphAlignment};
pub use writer::MutableDocument;
