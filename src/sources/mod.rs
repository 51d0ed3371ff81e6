//! Document sources.
//!
//! A source lists course documents and extracts whatever text it can from
//! them. The only shipped implementation reads a local folder; remote
//! drives plug in behind the same trait.

mod local;
mod traits;

pub use local::{extract_fragments, LocalFolderSource};
pub use traits::{ContentType, Document, DocumentSource};
