//! Command line surface

pub mod health;
pub mod render;
pub mod setup;
pub mod ui;

pub use render::TableRenderer;
