//! HTTP request handlers
//!
//! This module contains all the HTTP endpoint handlers organized by functionality.

pub mod actions;
pub mod health;
pub mod resources;
pub mod trace;

// Re-export handlers for convenience
pub use actions::*;
pub use health::*;
pub use resources::*;
pub use trace::*;
