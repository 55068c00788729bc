// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Thread-safe ring buffer for log entries.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::entry::{LogEntry, LogLevel};

pub const DEFAULT_CAPACITY: usize = 10_000;

/// Bounded buffer of captured log entries. When full, the oldest entry is
/// evicted and counted as dropped.
#[derive(Clone)]
pub struct LogBuffer {
	inner: Arc<LogBufferInner>,
}

struct LogBufferInner {
	entries: RwLock<VecDeque<LogEntry>>,
	capacity: usize,
	next_id: Mutex<u64>,
	dropped: Mutex<u64>,
}

impl LogBuffer {
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			inner: Arc::new(LogBufferInner {
				entries: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
				capacity,
				next_id: Mutex::new(1),
				dropped: Mutex::new(0),
			}),
		}
	}

	pub fn with_default_capacity() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}

	pub fn push(
		&self,
		level: LogLevel,
		target: String,
		message: String,
		fields: Vec<(String, String)>,
	) {
		let id = {
			let mut next_id = self.inner.next_id.lock();
			let id = *next_id;
			*next_id += 1;
			id
		};

		let entry = LogEntry::new(id, level, target, message, fields);

		let mut entries = self.inner.entries.write();
		if entries.len() >= self.inner.capacity {
			entries.pop_front();
			*self.inner.dropped.lock() += 1;
		}
		entries.push_back(entry);
	}

	/// Remove and return every buffered entry, oldest first.
	pub fn drain(&self) -> Vec<LogEntry> {
		self.inner.entries.write().drain(..).collect()
	}

	pub fn len(&self) -> usize {
		self.inner.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.entries.read().is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.inner.capacity
	}

	/// Entries evicted because the buffer was full.
	pub fn dropped(&self) -> u64 {
		*self.inner.dropped.lock()
	}
}

impl Default for LogBuffer {
	fn default() -> Self {
		Self::with_default_capacity()
	}
}
