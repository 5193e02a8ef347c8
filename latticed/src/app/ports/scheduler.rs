// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::errors::AppResult;
use crate::app::types::JobRecord;

/// Client boundary to the external scheduling engine. The engine owns all
/// job state transitions, retention, and cross-job concurrency control; the
/// console only asks it to add, enumerate, or cancel jobs.
#[async_trait]
pub trait SchedulerPort: Send + Sync {
    async fn add_job(&self, owner: &str, job: &str) -> AppResult<()>;

    /// One record per job owned by `owner`, in the order the engine emits
    /// them. An empty listing is not an error.
    async fn list_jobs(&self, owner: &str) -> AppResult<Vec<JobRecord>>;

    async fn cancel_job(&self, owner: &str, job: &str) -> AppResult<()>;
}
