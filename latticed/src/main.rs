// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

mod adapters;
mod app;
mod config;
mod logging;

fn log_config_report(report: &config::ConfigReport) {
    match (&report.config_path, report.config_path_source) {
        (Some(path), Some(source)) => {
            tracing::info!(
                "config path: {} (source={}, present={})",
                path.display(),
                source.as_str(),
                report.config_file_present
            );
        }
        (Some(path), None) => {
            tracing::info!(
                "config path: {} (present={})",
                path.display(),
                report.config_file_present
            );
        }
        (None, _) => {
            tracing::info!("config path: (none)");
        }
    }
    tracing::info!(
        "config upload_dir: {} (source={})",
        report.upload_dir.value.display(),
        report.upload_dir.source.as_str()
    );
    tracing::info!(
        "config scheduler_path: {} (source={})",
        report.scheduler_path.value.display(),
        report.scheduler_path.source.as_str()
    );
    tracing::info!(
        "config port: {} (source={})",
        report.port.value,
        report.port.source.as_str()
    );
    tracing::info!(
        "config verbose: {} (source={})",
        report.verbose.value,
        report.verbose.source.as_str()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = adapters::cli::parse_opts();
    let opts = parsed.opts;
    let config::LoadResult { config, report } = config::load_with_report(
        opts.config,
        config::Overrides {
            upload_dir: opts.upload_dir,
            scheduler_path: opts.scheduler_path,
            port: opts.port,
            verbose: parsed.verbose_override,
        },
    )?;
    logging::init(config.verbose);
    log_config_report(&report);
    config::ensure_upload_dir(&config.upload_dir)?;

    let scheduler = Arc::new(adapters::process::ProcessScheduler::new(
        &config.scheduler_path,
    ));
    let staging = Arc::new(adapters::fs::LocalStaging::new(&config.upload_dir));
    let clock = Arc::new(adapters::time::SystemClock::new());
    let usecases = app::usecases::UseCases::new(scheduler, staging, clock);

    let state = Arc::new(adapters::http::AppState { usecases });
    let router = adapters::http::router(state, &config.upload_dir);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    tracing::info!("console listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
