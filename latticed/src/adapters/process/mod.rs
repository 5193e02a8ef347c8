// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use crate::app::errors::{AppError, AppErrorKind, AppResult, codes};
use crate::app::ports::SchedulerPort;
use crate::app::services::records;
use crate::app::types::JobRecord;

const OP_ADD: &str = "a";
const OP_LIST: &str = "l";
const OP_CANCEL: &str = "u";
/// Reason code the engine expects on a user-initiated cancellation.
const CANCEL_REASON_CODE: &str = "3";

/// Scheduler client backed by the external scheduler executable. Each call
/// spawns the process with one positional operation code, waits for it to
/// exit, and captures its output. No timeout is imposed; the engine owns
/// its own pacing.
#[derive(Clone)]
pub struct ProcessScheduler {
    program: PathBuf,
}

impl ProcessScheduler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> AppResult<std::process::Output> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|err| {
                AppError::with_message(
                    AppErrorKind::Internal,
                    codes::SCHEDULER_ERROR,
                    format!(
                        "failed to invoke scheduler {}: {err}",
                        self.program.display()
                    ),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            let exit_code = output.status.code().unwrap_or(-1);
            return Err(AppError::with_message(
                AppErrorKind::Aborted,
                codes::SCHEDULER_ERROR,
                if detail.is_empty() {
                    format!("scheduler exited with code {exit_code}")
                } else {
                    format!("scheduler exited with code {exit_code}: {detail}")
                },
            ));
        }

        Ok(output)
    }
}

#[async_trait]
impl SchedulerPort for ProcessScheduler {
    #[tracing::instrument(name = "scheduler", level = "debug", skip(self), fields(op = "add"))]
    async fn add_job(&self, owner: &str, job: &str) -> AppResult<()> {
        self.run(&[OP_ADD, owner, job]).await.map(|_| ())
    }

    #[tracing::instrument(name = "scheduler", level = "debug", skip(self), fields(op = "list"))]
    async fn list_jobs(&self, owner: &str) -> AppResult<Vec<JobRecord>> {
        let output = self.run(&[OP_LIST, owner]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        records::parse_list_output(&stdout).map_err(|err| {
            AppError::with_message(
                AppErrorKind::Aborted,
                codes::SCHEDULER_ERROR,
                format!("scheduler returned a malformed job listing: {err}"),
            )
        })
    }

    #[tracing::instrument(name = "scheduler", level = "debug", skip(self), fields(op = "cancel"))]
    async fn cancel_job(&self, owner: &str, job: &str) -> AppResult<()> {
        self.run(&[OP_CANCEL, owner, job, CANCEL_REASON_CODE])
            .await
            .map(|_| ())
    }
}
