// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracing layer that copies events into a [`LogBuffer`].

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::buffer::LogBuffer;
use crate::entry::LogLevel;

#[derive(Clone)]
pub struct CaptureLayer {
	buffer: LogBuffer,
}

impl CaptureLayer {
	pub fn new(buffer: LogBuffer) -> Self {
		Self { buffer }
	}

	pub fn buffer(&self) -> &LogBuffer {
		&self.buffer
	}
}

impl<S> Layer<S> for CaptureLayer
where
	S: Subscriber + for<'a> LookupSpan<'a>,
{
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let metadata = event.metadata();
		let level = LogLevel::from_tracing(metadata.level());
		let target = metadata.target().to_string();

		let mut visitor = FieldVisitor::default();
		event.record(&mut visitor);

		self.buffer.push(
			level,
			target,
			visitor.message.unwrap_or_default(),
			visitor.fields,
		);
	}
}

#[derive(Default)]
struct FieldVisitor {
	message: Option<String>,
	fields: Vec<(String, String)>,
}

impl FieldVisitor {
	fn record(&mut self, field: &Field, value: String) {
		if field.name() == "message" {
			self.message = Some(value);
		} else {
			self.fields.push((field.name().to_string(), value));
		}
	}
}

impl Visit for FieldVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		self.record(field, format!("{value:?}"));
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		self.record(field, value.to_string());
	}

	fn record_i64(&mut self, field: &Field, value: i64) {
		self.record(field, value.to_string());
	}

	fn record_u64(&mut self, field: &Field, value: u64) {
		self.record(field, value.to_string());
	}

	fn record_bool(&mut self, field: &Field, value: bool) {
		self.record(field, value.to_string());
	}

	fn record_f64(&mut self, field: &Field, value: f64) {
		self.record(field, value.to_string());
	}

	fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
		self.record(field, value.to_string());
	}
}
