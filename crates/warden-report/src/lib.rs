// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit report documents: construction, HTML/plain-text rendering, and
//! delivery through a [`ReportSink`].

pub mod document;
pub mod error;
pub mod render;
pub mod sink;

pub use document::{prefixed_subject, Report, ReportKind, ReportRow};
pub use error::ReportError;
pub use render::{html_escape, render_html, render_text};
pub use sink::{LogReportSink, MailReportSink, ReportSink};
