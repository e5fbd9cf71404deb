//! Rendering of ranked search results into the terminal report.
//!
//! Pure data-to-string transformation: ordering comes from the store and
//! is preserved as-is, and nothing here touches the network or the
//! filesystem. The emitted line shapes (📄/📁/🗓️/🎯/📝) are a contract
//! consumed by the desktop tray shell, which re-parses this report.

use crate::models::SearchHit;
use crate::snippet::{ceil_char_boundary, floor_char_boundary, query_terms, select_snippet};

/// Width of the relevance bar in display units.
pub const BAR_WIDTH: usize = 20;

const HIGHLIGHT_ON: &str = "\x1b[1m";
const COLOR_RESET: &str = "\x1b[0m";

/// Display emphasis for a certainty score. Presentation only: tiers never
/// affect ordering or filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceTier {
    High,
    Medium,
    Low,
}

impl RelevanceTier {
    pub fn from_certainty(certainty: f64) -> Self {
        if certainty >= 0.70 {
            RelevanceTier::High
        } else if certainty >= 0.40 {
            RelevanceTier::Medium
        } else {
            RelevanceTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RelevanceTier::High => "high",
            RelevanceTier::Medium => "medium",
            RelevanceTier::Low => "low",
        }
    }

    fn color(self) -> &'static str {
        match self {
            RelevanceTier::High => "\x1b[32m",
            RelevanceTier::Medium => "\x1b[33m",
            RelevanceTier::Low => "\x1b[2m",
        }
    }
}

/// Renders the certainty as a fixed-width bar. The filled count is
/// `round(certainty * 20)`, clamped to the bar width for rendering so an
/// out-of-range score from the store cannot underflow the empty segment;
/// the printed percentage stays unclamped.
pub fn relevance_bar(certainty: f64) -> String {
    let filled = (certainty * BAR_WIDTH as f64)
        .round()
        .clamp(0.0, BAR_WIDTH as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Formats ranked hits into the user-facing report.
pub fn format_results(hits: &[SearchHit], query: &str) -> String {
    let mut report = format!("\n==== Search Results for \"{query}\" ====\n\n");

    if hits.is_empty() {
        report.push_str("No matching documents found.\n");
        return report;
    }

    let terms = query_terms(query);

    for (index, hit) in hits.iter().enumerate() {
        let tier = RelevanceTier::from_certainty(hit.certainty);
        let snippet = select_snippet(&hit.document.content, query);

        report.push_str(&format!("{} 📄 {}\n", index + 1, hit.document.filename));
        report.push_str(&format!("📁 Path: {}\n", hit.document.path));
        report.push_str(&format!(
            "🗓️  Created: {}\n",
            hit.document.created_at.to_rfc3339()
        ));
        report.push_str(&format!(
            "🎯 Relevance: {}{:.2}% [{}] {}{}\n",
            tier.color(),
            hit.certainty * 100.0,
            relevance_bar(hit.certainty),
            tier.label(),
            COLOR_RESET,
        ));
        report.push_str("📝 Content:\n");
        report.push_str(&highlight_terms(&snippet, &terms));
        report.push_str("\n\n");
    }

    report
}

/// Marks every case-insensitive occurrence of each term in bold,
/// independently per term. Later terms scan the already-marked text, so
/// overlapping highlights can nest; they are not deduplicated.
pub fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let mut marked = snippet.to_string();
    for term in terms {
        marked = highlight_occurrences(&marked, term);
    }
    marked
}

fn highlight_occurrences(text: &str, term: &str) -> String {
    if term.is_empty() {
        return text.to_string();
    }

    let lowered = text.to_lowercase();
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0usize;

    while let Some(offset) = lowered.get(cursor..).and_then(|tail| tail.find(term)) {
        let start = floor_char_boundary(text, cursor + offset);
        let end = ceil_char_boundary(text, cursor + offset + term.len());

        output.push_str(&text[floor_char_boundary(text, cursor)..start]);
        output.push_str(HIGHLIGHT_ON);
        output.push_str(&text[start..end]);
        output.push_str(COLOR_RESET);

        cursor = cursor + offset + term.len();
    }

    output.push_str(&text[floor_char_boundary(text, cursor)..]);
    output
}
