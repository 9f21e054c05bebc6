// Export: snapshot geometry → per-page placements for the multi-page document.
// Drawing the pages is the export sink's job; this module only does the arithmetic.

pub mod handlers;
pub mod paginator;
pub mod snapshot;
