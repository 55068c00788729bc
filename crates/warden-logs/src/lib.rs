// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process capture of tracing events so an audit run's log can be
//! persisted after the run.
//!
//! ```ignore
//! use warden_logs::{CaptureLayer, LogBuffer};
//! use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
//!
//! let log_buffer = LogBuffer::new(10_000);
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(CaptureLayer::new(log_buffer.clone()))
//!     .init();
//!
//! // ... run ...
//! let entries = log_buffer.drain();
//! ```

mod buffer;
mod entry;
mod layer;

pub use buffer::{LogBuffer, DEFAULT_CAPACITY};
pub use entry::{LogEntry, LogLevel};
pub use layer::CaptureLayer;
