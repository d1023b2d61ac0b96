//! # Opsdeck Core
//!
//! Core traits and types shared by every opsdeck crate: the action and
//! resource contracts that outer surfaces (CLI, HTTP, chat-tool dispatchers)
//! call into, the bounded buffer behind every in-process log, identifier
//! normalization, and cooperative cancellation.

pub mod action;
pub mod cancel;
pub mod collections;
pub mod error;
pub mod identifiers;
pub mod resource;
pub mod text;

pub use action::{Action, ActionArgs, ActionCall, ActionDescriptor, ActionOutcome, FailureReason};
pub use cancel::{CancellationHandle, CancellationSignal};
pub use collections::BoundedBuffer;
pub use error::{CoreError, CoreResult};
pub use identifiers::NormalizedKey;
pub use resource::{Resource, ResourceContent, ResourceDescriptor, ResourceParams, UriTemplate};
pub use text::{truncate, truncate_with_marker};
