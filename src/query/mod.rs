/// Structured filtering over stored records.
///
/// [`FilterSet`] is shared by the direct `GET /strings/` parameters and the
/// natural-language [`translator`].
pub mod filters;
pub mod translator;

pub use filters::{apply, FilterSet};
pub use translator::{translate, Interpretation};
