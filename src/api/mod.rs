//! HTTP surface: routing and request handling

pub mod event_handler;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;
pub mod summarize_handler;

// Re-export the main handler for convenience
pub use handler::{function_handler, route};
