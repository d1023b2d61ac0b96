//! Case-insensitive lookup keys.
//!
//! Service ids, runbook topics and plan names are all matched after trimming
//! and lower-casing. `NormalizedKey` makes that normalization a type so that
//! a raw caller string can never be used as a map key by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed, lower-cased, non-empty lookup key.
///
/// # Examples
///
/// ```rust
/// use opsdeck_core::identifiers::NormalizedKey;
///
/// let key = NormalizedKey::parse("  NuGet ").unwrap();
/// assert_eq!(key.as_str(), "nuget");
/// assert!(NormalizedKey::parse("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Normalize a caller-supplied identifier. Blank input yields `None`.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for NormalizedKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
