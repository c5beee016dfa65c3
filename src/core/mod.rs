//! Core business logic abstractions

pub mod alert;
pub mod backend;
pub mod budget;
pub mod config;
pub mod error;
pub mod log;
pub mod models;
pub mod refresh;
pub mod render;
pub mod validation;

// Re-export main types for cleaner imports
pub use backend::FinanceBackend;
pub use error::{AppError, FetchError, ValidationError};
pub use refresh::{LoadState, RefreshOrchestrator, RefreshPath};
pub use render::{Renderer, Section};
