// LaTeX generation: escaping, per-section fragments, and document assembly.
// Everything here is pure string building; no I/O.

pub mod document;
pub mod escape;
pub mod sections;

pub use document::{assemble, PageGeometry, DEFAULT_PAGE_HEIGHT_IN};
pub use escape::{escape, escape_value};
pub use sections::{render_all, Fragment, SectionKind};
