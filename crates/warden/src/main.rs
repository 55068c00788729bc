// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Warden: scheduled directory hygiene audit.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warden_audit::{Job, JobContext, JobError, TriggerSource};

mod app;
mod version;

/// Warden - audits directory accounts and applies hygiene remediations.
#[derive(Parser, Debug)]
#[command(name = "warden", about = "Directory hygiene audit", version)]
struct Args {
	/// Config file (defaults to /etc/warden/warden.toml)
	#[arg(long, env = "WARDEN_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => warden_config::load_config_with_file(path)?,
		None => warden_config::load_config()?,
	};

	// Buffer must exist before tracing init so startup events are captured.
	let log_buffer = warden_logs::LogBuffer::new(config.logging.buffer_capacity);
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.with(warden_logs::CaptureLayer::new(log_buffer.clone()))
		.init();

	tracing::info!(
		version = env!("CARGO_PKG_VERSION"),
		database = %config.database.url,
		job_id = %config.schedule.job_id,
		"starting warden"
	);

	let pool = warden_db::create_pool(&config.database.url).await?;
	warden_db::run_migrations(&pool).await?;
	if warden_db::seed_run_state(
		&pool,
		&config.schedule.job_id,
		config.schedule.default_interval_hours,
	)
	.await?
	{
		tracing::info!(job_id = %config.schedule.job_id, "seeded run state");
	}

	let job = app::build_job(&config, pool.clone())?;
	tracing::info!(job = job.name(), description = job.description(), "job ready");
	let ctx = JobContext::new(TriggerSource::Schedule);

	let token = ctx.cancellation_token.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			tracing::warn!("interrupt received; cancelling run");
			token.cancel();
		}
	});

	let result = job.run(&ctx).await;
	match &result {
		Ok(output) => {
			let metadata = output
				.metadata
				.as_ref()
				.map(serde_json::Value::to_string)
				.unwrap_or_default();
			tracing::info!(job = job.name(), run_id = %ctx.run_id, %metadata, "{}", output.message);
		}
		Err(JobError::Cancelled) => tracing::warn!(run_id = %ctx.run_id, "run cancelled"),
		Err(JobError::Failed { message, retryable }) => {
			tracing::error!(run_id = %ctx.run_id, retryable, error = %message, "run failed")
		}
	}

	if config.logging.persist {
		match app::persist_logs(&log_buffer, pool.clone()).await {
			Ok(count) => tracing::debug!(count, "persisted application log"),
			Err(e) => tracing::warn!(error = %e, "failed to persist application log"),
		}
	}

	pool.close().await;
	result.map(|_| ()).map_err(Into::into)
}
