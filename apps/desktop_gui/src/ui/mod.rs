//! UI layer for the desktop GUI: app shell, result card and boundary map.

pub mod app;
pub mod map;
pub mod result_card;

pub use app::LookupApp;
