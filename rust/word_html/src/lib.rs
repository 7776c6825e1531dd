pub mod css;
pub mod document;
pub mod docx;
pub mod dom;
pub mod error;
pub mod normalize;
pub mod profile;
pub mod sanitize;
pub mod spacing;
pub mod template;

pub use css::{CssRewriter, PatternRewriter};
pub use docx::{docx_bytes, write_docx, DocxOptions, Orientation, PageMargins};
pub use error::{Error, Result};
pub use normalize::{normalize, sanitize_fragment, NormalizeReport, Normalizer};
pub use profile::{Profile, ProfileConfig};
pub use template::{Section, Template};
