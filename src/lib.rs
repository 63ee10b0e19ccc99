//! Rule-based inbox clustering.
//!
//! [`cluster`] holds the categorizer: a fixed template table scored against
//! each message by keyword and sender-pattern matches. The rest of the crate
//! fetches mail over IMAP, keeps one sync's results in memory, archives whole
//! clusters, and draws the desktop UI.

pub mod app;
pub mod bridge;
pub mod cluster;
pub mod config;
pub mod error;
pub mod imap;
pub mod message;
pub mod state;
pub mod store;
pub mod sync;
pub mod ui;
