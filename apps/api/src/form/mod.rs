// Resume form model: repeatable sections with a protected first entry,
// and the preview document regenerated from form state.

pub mod handlers;
pub mod render;
pub mod repeater;
pub mod resume;
