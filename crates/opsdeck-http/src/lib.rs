//! # Opsdeck HTTP Runtime
//!
//! Serves an [`OpsDispatcher`](opsdeck_tools::OpsDispatcher) over HTTP with
//! axum: action invocation, resource reads, a health summary and the
//! communication trace views. Every request and response passing through the
//! router is recorded in the shared trace store.

pub mod runtime;

pub use runtime::*;
