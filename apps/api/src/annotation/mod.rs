// Prompt annotation: placeholder ordering, inline highlights, numbered legend.
// Pure and synchronous — no I/O anywhere under this module except the handlers.

pub mod annotator;
pub mod handlers;
pub mod legend;
pub mod palette;
