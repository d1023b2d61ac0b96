//! Trace store views.

use opsdeck_core::{CoreResult, Resource, ResourceParams, UriTemplate};
use opsdeck_observability::BoundedTraceStore;
use std::sync::Arc;

pub struct TraceLogsResource {
    trace: Arc<BoundedTraceStore>,
    template: UriTemplate,
}

impl TraceLogsResource {
    pub fn new(trace: Arc<BoundedTraceStore>) -> CoreResult<Self> {
        Ok(Self {
            trace,
            template: UriTemplate::parse("trace/logs")?,
        })
    }
}

impl Resource for TraceLogsResource {
    fn name(&self) -> &str {
        "trace.logs"
    }

    fn title(&self) -> &str {
        "Communication Trace Log"
    }

    fn description(&self) -> &str {
        "Captured traffic: HTTP requests, action calls and resource reads."
    }

    fn template(&self) -> &UriTemplate {
        &self.template
    }

    fn mime_type(&self) -> &str {
        "text/plain"
    }

    fn read(&self, _params: &ResourceParams) -> String {
        self.trace.dump()
    }
}

pub struct TraceLogsMarkdownResource {
    trace: Arc<BoundedTraceStore>,
    template: UriTemplate,
}

impl TraceLogsMarkdownResource {
    pub fn new(trace: Arc<BoundedTraceStore>) -> CoreResult<Self> {
        Ok(Self {
            trace,
            template: UriTemplate::parse("trace/logs/markdown")?,
        })
    }
}

impl Resource for TraceLogsMarkdownResource {
    fn name(&self) -> &str {
        "trace.logs.markdown"
    }

    fn title(&self) -> &str {
        "Communication Trace (Markdown)"
    }

    fn description(&self) -> &str {
        "Captured traffic as a markdown table."
    }

    fn template(&self) -> &UriTemplate {
        &self.template
    }

    fn read(&self, _params: &ResourceParams) -> String {
        self.trace.dump_markdown()
    }
}
