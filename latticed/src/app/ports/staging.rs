// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::errors::AppResult;
use crate::app::types::{AnalysisParams, StagedArtifact, UploadRequest};

/// Storage boundary for uploaded inputs. Staging an upload persists the
/// artifact and the analysis parameter file under the job's derived
/// storage directory.
#[async_trait]
pub trait StagingPort: Send + Sync {
    async fn stage(
        &self,
        owner: &str,
        job: &str,
        upload: &UploadRequest,
        params: &AnalysisParams,
    ) -> AppResult<StagedArtifact>;
}
