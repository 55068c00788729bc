// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTML and plain-text rendering of [`Report`]s.

use std::fmt::Write;

use crate::document::{Report, ReportRow};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; font-size: 13px; margin: 20px; }
.intro { margin-bottom: 15px; }
.date-info { color: #666; margin-bottom: 15px; }
table { min-width: 600px; max-width: 900px; border-collapse: collapse; margin: 10px 0; }
th { text-align: left; padding: 4px 8px; border-bottom: 1px solid #000; font-weight: normal; }
td { padding: 4px 8px; border-bottom: 1px solid #ddd; }
.issue { color: #d32f2f; }
.highlight { background-color: #fff3e0; }
.total-row { margin-top: 15px; font-weight: bold; }";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

fn push_row(html: &mut String, row: &ReportRow, show_issue: bool) {
	if row.highlighted {
		html.push_str("<tr class=\"highlight\">");
	} else {
		html.push_str("<tr>");
	}
	let _ = write!(
		html,
		"<td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
		row.user_id,
		html_escape(&row.first_name),
		html_escape(&row.last_name),
		html_escape(&row.email),
	);
	if show_issue {
		let _ = write!(
			html,
			"<td class=\"issue\">{}</td>",
			html_escape(row.issue.as_deref().unwrap_or_default())
		);
	}
	html.push_str("</tr>\n");
}

pub fn render_html(report: &Report) -> String {
	let mut html = String::with_capacity(1024 + report.rows.len() * 160);

	let _ = write!(
		html,
		"<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n",
		html_escape(&report.subject)
	);
	let _ = writeln!(html, "<div class=\"intro\"><p>{}</p></div>", html_escape(&report.intro));
	let _ = writeln!(
		html,
		"<div class=\"date-info\">{}</div>",
		html_escape(&report.date_line)
	);

	html.push_str("<table>\n<thead><tr><th>User ID</th><th>First Name</th><th>Last Name</th><th>Email Address</th>");
	if report.show_issue_column {
		html.push_str("<th>Issue</th>");
	}
	html.push_str("</tr></thead>\n<tbody>\n");
	for row in &report.rows {
		push_row(&mut html, row, report.show_issue_column);
	}
	html.push_str("</tbody>\n</table>\n");

	if !report.summary.is_empty() {
		html.push_str("<div class=\"total-row\">Summary:</div>\n");
		for line in &report.summary {
			let _ = writeln!(html, "<div>{}</div>", html_escape(line));
		}
	}
	let _ = writeln!(
		html,
		"<div class=\"total-row\">{}</div>",
		html_escape(&report.total_line)
	);
	html.push_str("</body>\n</html>\n");

	html
}

pub fn render_text(report: &Report) -> String {
	let mut text = String::new();

	let _ = writeln!(text, "{}", report.intro);
	let _ = writeln!(text, "{}", report.date_line);
	text.push('\n');

	for row in &report.rows {
		let _ = write!(
			text,
			"{}\t{} {}\t{}",
			row.user_id, row.first_name, row.last_name, row.email
		);
		if report.show_issue_column {
			if let Some(issue) = &row.issue {
				let _ = write!(text, "\t{issue}");
			}
		}
		text.push('\n');
	}

	text.push('\n');
	if !report.summary.is_empty() {
		text.push_str("Summary:\n");
		for line in &report.summary {
			let _ = writeln!(text, "{line}");
		}
	}
	let _ = writeln!(text, "{}", report.total_line);

	text
}
