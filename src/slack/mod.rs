//! All Slack-specific functionality

pub mod client;
pub mod formatter;
pub mod platform;

// Re-export main types for convenience
pub use client::SlackClient;
pub use formatter::format_messages;
pub use platform::{ChatPlatform, FileInfo};
