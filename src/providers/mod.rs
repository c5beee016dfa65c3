pub mod client;
pub mod rest;
pub mod util;

pub use client::{ApiClient, RequestOptions};
pub use rest::RestBackend;
