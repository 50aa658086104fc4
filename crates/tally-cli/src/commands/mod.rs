//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `auth` - Session commands (login, signup, logout, whoami)
//! - `core` - Init and shared utilities (load_config, open_store, open_session)
//! - `expenses` - Expense commands (add, edit, delete, list, categories)
//! - `export` - CSV/JSON export
//! - `reports` - Dashboard and report commands

pub mod auth;
pub mod core;
pub mod expenses;
pub mod export;
pub mod reports;

// Re-export command functions for main.rs
pub use auth::*;
pub use self::core::*;
pub use expenses::*;
pub use export::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
