//! Human-readable renderings of the trace store.
//!
//! Both views work on a snapshot taken with [`BoundedTraceStore::entries`],
//! so rendering never holds the store's lock.

use crate::trace::{BoundedTraceStore, TraceDirection, TraceEntry};
use opsdeck_core::text::truncate_with_marker;
use std::fmt::Write;

const BOX_WIDTH: usize = 80;
const BOX_MESSAGE_CHARS: usize = 40;
const BOX_DETAIL_CHARS: usize = 70;
const BOX_DETAIL_LINES: usize = 3;
const TABLE_MESSAGE_CHARS: usize = 50;

/// Placeholder shown when nothing has been captured.
pub const EMPTY_TRACE: &str = "(no traces captured yet)";

fn box_arrow(direction: TraceDirection) -> &'static str {
    match direction {
        TraceDirection::Incoming => "──►",
        TraceDirection::Outgoing => "◄──",
        TraceDirection::Internal => "◆◆◆",
    }
}

fn table_arrow(direction: TraceDirection) -> &'static str {
    match direction {
        TraceDirection::Incoming => "→ IN",
        TraceDirection::Outgoing => "← OUT",
        TraceDirection::Internal => "● INT",
    }
}

/// Collapse line breaks so a message stays on its own row.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Render entries as a boxed, fixed-width console view.
pub fn render_box(entries: &[TraceEntry]) -> String {
    let rule = "═".repeat(BOX_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "╔{}╗", rule);
    let _ = writeln!(out, "║{:^width$}║", "OPSDECK COMMUNICATION TRACE", width = BOX_WIDTH);
    let _ = writeln!(out, "╠{}╣", rule);

    for entry in entries {
        let message = truncate_with_marker(&single_line(&entry.message), BOX_MESSAGE_CHARS, "...");
        let _ = writeln!(
            out,
            "║ [{:04}] {} {} [{:<4}] {:<40}",
            entry.sequence,
            entry.timestamp.format("%H:%M:%S%.3f"),
            box_arrow(entry.direction),
            entry.category,
            message
        );

        if let Some(details) = &entry.details {
            for line in details
                .split('\n')
                .filter(|l| !l.trim().is_empty())
                .take(BOX_DETAIL_LINES)
            {
                let line = truncate_with_marker(line.trim_end(), BOX_DETAIL_CHARS, "...");
                let _ = writeln!(out, "║        {}", line);
            }
        }
    }

    if entries.is_empty() {
        let _ = writeln!(out, "║ {:<width$}║", EMPTY_TRACE, width = BOX_WIDTH - 1);
    }

    let _ = writeln!(out, "╚{}╝", rule);
    out
}

/// Render entries as a markdown table.
pub fn render_markdown(entries: &[TraceEntry]) -> String {
    let mut out = String::new();
    out.push_str("# Communication Trace\n\n");
    out.push_str("| # | Time | Direction | Category | Message |\n");
    out.push_str("|---|------|-----------|----------|---------|\n");

    for entry in entries {
        let message = truncate_with_marker(&single_line(&entry.message), TABLE_MESSAGE_CHARS, "...")
            .replace('|', "\\|");
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            entry.sequence,
            entry.timestamp.format("%H:%M:%S"),
            table_arrow(entry.direction),
            entry.category,
            message
        );
    }

    if entries.is_empty() {
        let _ = writeln!(out, "| - | - | - | - | {} |", EMPTY_TRACE);
    }
    out
}

impl BoundedTraceStore {
    /// Boxed console view of the current entries.
    pub fn dump(&self) -> String {
        render_box(&self.entries())
    }

    /// Markdown table of the current entries.
    pub fn dump_markdown(&self) -> String {
        render_markdown(&self.entries())
    }
}
