//! Read-only resources addressed by URI templates.
//!
//! A resource is a named, read-only text view over some component
//! (`ops/overview`, `ops/service/{id}`, `trace/logs`). Reads never mutate
//! state and never fail: an unknown id produces descriptive text.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Default MIME type for resource text.
pub const MARKDOWN_MIME: &str = "text/markdown";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A `/`-separated URI pattern where whole segments may be `{param}`
/// placeholders.
///
/// ```rust
/// use opsdeck_core::resource::UriTemplate;
///
/// let template = UriTemplate::parse("ops/service/{id}").unwrap();
/// let params = template.matches("ops/service/web").unwrap();
/// assert_eq!(params.get("id"), Some("web"));
/// assert!(template.matches("ops/service").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    pub fn parse(template: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = template.trim_matches('/');
        if trimmed.is_empty() {
            return Err(invalid("template is empty"));
        }

        let mut segments = Vec::new();
        for part in trimmed.split('/') {
            if part.is_empty() {
                return Err(invalid("empty segment"));
            }
            match (part.strip_prefix('{'), part.ends_with('}')) {
                (Some(rest), true) => {
                    let name = &rest[..rest.len() - 1];
                    if name.is_empty() || name.contains(['{', '}']) {
                        return Err(invalid("malformed parameter"));
                    }
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(existing) if existing == name))
                    {
                        return Err(invalid("duplicate parameter"));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                _ if part.contains(['{', '}']) => return Err(invalid("unclosed parameter")),
                _ => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the template contains no placeholders.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Match a concrete URI, extracting placeholder values.
    ///
    /// Literal segments compare case-sensitively; leading and trailing
    /// slashes on `uri` are ignored.
    pub fn matches(&self, uri: &str) -> Option<ResourceParams> {
        let parts: Vec<&str> = uri.trim().trim_matches('/').split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = ResourceParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    params.values.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Placeholder values extracted from a matched URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceParams {
    values: HashMap<String, String>,
}

impl ResourceParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Placeholder value, empty if the template had no such parameter.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

/// The payload returned for a resource read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
    /// `false` when no registered template matched `uri`.
    pub found: bool,
}

impl ResourceContent {
    pub fn not_found(uri: &str, available: &[String]) -> Self {
        Self {
            uri: uri.to_string(),
            mime_type: "text/plain".to_string(),
            text: format!(
                "Resource '{}' not found. Available: {}",
                uri,
                available.join(", ")
            ),
            found: false,
        }
    }
}

/// Discovery metadata for a registered resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri_template: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub mime_type: String,
}

/// A read-only view exposed under a URI template.
pub trait Resource: Send + Sync {
    /// Short machine name, e.g. `ops-overview`.
    fn name(&self) -> &str;

    fn title(&self) -> &str {
        self.name()
    }

    fn description(&self) -> &str {
        ""
    }

    fn template(&self) -> &UriTemplate;

    fn mime_type(&self) -> &str {
        MARKDOWN_MIME
    }

    /// Render the resource for a matched URI.
    fn read(&self, params: &ResourceParams) -> String;

    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            uri_template: self.template().to_string(),
            name: self.name().to_string(),
            title: self.title().to_string(),
            description: self.description().to_string(),
            mime_type: self.mime_type().to_string(),
        }
    }
}
