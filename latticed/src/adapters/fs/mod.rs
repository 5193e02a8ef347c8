// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::PathBuf;

use async_trait::async_trait;

use crate::app::errors::{AppError, AppErrorKind, AppResult, codes};
use crate::app::ports::StagingPort;
use crate::app::services::staging;
use crate::app::types::{AnalysisParams, StagedArtifact, UploadRequest};

/// Stages uploads on the local filesystem under a configured root. No
/// locking: two submissions deriving the same key race on the directory,
/// and last writer wins.
#[derive(Clone)]
pub struct LocalStaging {
    root: PathBuf,
}

impl LocalStaging {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl StagingPort for LocalStaging {
    #[tracing::instrument(name = "staging", level = "debug", skip(self, upload, params))]
    async fn stage(
        &self,
        owner: &str,
        job: &str,
        upload: &UploadRequest,
        params: &AnalysisParams,
    ) -> AppResult<StagedArtifact> {
        let file_name = staging::validate_upload(upload).map_err(|err| {
            AppError::with_message(AppErrorKind::InvalidArgument, codes::UPLOAD_ERROR, err.to_string())
        })?;

        let dir = self
            .root
            .join(staging::output_dir_name(staging::storage_key(owner, job)));
        tokio::fs::create_dir_all(&dir).await.map_err(|err| {
            AppError::with_message(
                AppErrorKind::Internal,
                codes::UPLOAD_ERROR,
                format!("failed to create staging directory {}: {err}", dir.display()),
            )
        })?;

        let stored_path = dir.join(&file_name);
        tokio::fs::write(&stored_path, &upload.bytes)
            .await
            .map_err(|err| {
                AppError::with_message(
                    AppErrorKind::Internal,
                    codes::UPLOAD_ERROR,
                    format!("failed to write {}: {err}", stored_path.display()),
                )
            })?;

        let arguments_path = dir.join(staging::ARGUMENTS_FILE_NAME);
        tokio::fs::write(&arguments_path, staging::arguments_file_body(params))
            .await
            .map_err(|err| {
                AppError::with_message(
                    AppErrorKind::Internal,
                    codes::UPLOAD_ERROR,
                    format!("failed to write {}: {err}", arguments_path.display()),
                )
            })?;

        Ok(StagedArtifact {
            file_name,
            stored_path,
            byte_size: upload.bytes.len() as u64,
        })
    }
}
