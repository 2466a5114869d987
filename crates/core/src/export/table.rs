//! Plain-text table rendering.

use super::layout::layout;
use crate::reports::ReportDto;

/// Renders the report as a monospaced text table, one line per layout line.
#[must_use]
pub fn render_table(report: &ReportDto) -> String {
    let mut out = String::new();
    for line in layout(report) {
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}
