// Public library interface for marketmap-rs
// The CLI and the debug-layout tool both build on these modules

pub mod app;
pub mod layout;
pub mod market;
pub mod render;
pub mod ui;
