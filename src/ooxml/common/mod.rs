//! Parts shared by every OOXML package.
pub mod properties;

pub use properties::DocumentProperties;
