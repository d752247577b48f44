pub mod navigation;
pub mod tooltip;
