pub mod components;
pub mod host;
pub mod newtab;
pub mod popup;
