//! Plain-text and HTML renderings of a report for email bodies.

use std::fmt::Write as _;

use stocksignal_core::{Report, ReportRow};

const HEADINGS: [&str; 6] = [
    "Mã",
    "Khuyến nghị",
    "Giá đóng cửa trước",
    "Giá hiện tại",
    "% thay đổi",
    "Lý do",
];

const EMPTY_REPORT: &str = "Chưa có khuyến nghị nào trong kỳ này.";

#[must_use]
pub fn report_subject(report: &Report) -> String {
    format!("Báo cáo khuyến nghị cổ phiếu ({} mã)", report.len())
}

fn cells(row: &ReportRow) -> [String; 6] {
    [
        row.ticker.clone(),
        row.recommendation.to_string(),
        row.prior_close.map(|p| p.to_string()).unwrap_or_default(),
        row.current_price.map(|p| p.to_string()).unwrap_or_default(),
        row.change_percent.to_string(),
        row.justification.clone(),
    ]
}

/// Pipe-separated text table, one line per row.
#[must_use]
pub fn render_plain(report: &Report) -> String {
    if report.is_empty() {
        return format!("{EMPTY_REPORT}\n");
    }
    let mut out = HEADINGS.join(" | ");
    out.push('\n');
    for row in report.rows() {
        out.push_str(&cells(row).join(" | "));
        out.push('\n');
    }
    out
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[must_use]
pub fn render_html(report: &Report) -> String {
    if report.is_empty() {
        return format!("<p>{EMPTY_REPORT}</p>");
    }
    let mut out = String::from("<table border=\"1\" cellpadding=\"4\" cellspacing=\"0\">\n<thead><tr>");
    for heading in HEADINGS {
        let _ = write!(out, "<th>{}</th>", escape_html(heading));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in report.rows() {
        out.push_str("<tr>");
        for cell in cells(row) {
            let _ = write!(out, "<td>{}</td>", escape_html(&cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>");
    out
}
