// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::types::{AnalysisParams, UploadRequest};

/// Raw form submission, before any interpretation. `None` means the field
/// was absent from the request entirely; an empty string means it was
/// posted blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub usr_name: Option<String>,
    pub job_name: Option<String>,
    pub search_only: Option<String>,
    pub cancel_job: Option<String>,
    pub file: Option<UploadRequest>,
    pub cf_algo: Option<String>,
    pub min_vertices: Option<String>,
    pub bin_width: Option<String>,
    pub output_format: Option<String>,
}

/// What the caller asked the console to do. Exactly one variant per
/// submission; anything that matches no guard is an `IntentError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    FreshLoad,
    SearchOnly {
        owner: String,
    },
    SubmitJob {
        owner: String,
        job: String,
        upload: UploadRequest,
        params: AnalysisParams,
    },
    CancelJob {
        owner: String,
        job: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    #[error("submission matches no console action")]
    NoMatch,
    #[error("invalid value for {field}: {value:?}")]
    BadField { field: &'static str, value: String },
}

fn parse_flag(field: &'static str, raw: Option<&str>) -> Result<Option<bool>, IntentError> {
    match raw {
        None => Ok(None),
        Some("0") => Ok(Some(false)),
        Some("1") => Ok(Some(true)),
        Some(other) => Err(IntentError::BadField {
            field,
            value: other.to_string(),
        }),
    }
}

fn parse_params(submission: &Submission) -> Result<AnalysisParams, IntentError> {
    let mut params = AnalysisParams::default();
    if let Some(raw) = submission.cf_algo.as_deref() {
        params.algorithm = raw.parse().map_err(|()| IntentError::BadField {
            field: "cf_algo",
            value: raw.to_string(),
        })?;
    }
    if let Some(raw) = submission.min_vertices.as_deref() {
        params.min_vertices = raw.parse().map_err(|_| IntentError::BadField {
            field: "min_vertices",
            value: raw.to_string(),
        })?;
    }
    if let Some(raw) = submission.bin_width.as_deref() {
        params.bin_width = raw.parse().map_err(|_| IntentError::BadField {
            field: "bin_width",
            value: raw.to_string(),
        })?;
    }
    if let Some(raw) = submission.output_format.as_deref() {
        params.output_format = raw.parse().map_err(|()| IntentError::BadField {
            field: "output_format",
            value: raw.to_string(),
        })?;
    }
    Ok(params)
}

/// Classify a submission into its intent. Guards are checked in a fixed
/// order and are disjoint: a fresh page load carries no fields at all, a
/// search carries `search_only=1`, a job submission carries `search_only=0`
/// plus a complete (owner, job, file) triple, and a cancellation carries
/// `cancel_job=1`.
pub fn classify(submission: Submission) -> Result<Intent, IntentError> {
    let search_only = parse_flag("search_only", submission.search_only.as_deref())?;
    let cancel = parse_flag("cancel_job", submission.cancel_job.as_deref())?.unwrap_or(false);

    if submission.usr_name.is_none()
        && submission.job_name.is_none()
        && search_only.is_none()
        && !cancel
    {
        return Ok(Intent::FreshLoad);
    }

    if search_only == Some(true) && !cancel {
        return Ok(Intent::SearchOnly {
            owner: submission.usr_name.clone().unwrap_or_default(),
        });
    }

    if search_only == Some(false) && !cancel {
        let owner = submission.usr_name.clone().unwrap_or_default();
        let job = submission.job_name.clone().unwrap_or_default();
        if !owner.is_empty() && !job.is_empty() {
            if let Some(upload) = submission.file.clone() {
                let params = parse_params(&submission)?;
                return Ok(Intent::SubmitJob {
                    owner,
                    job,
                    upload,
                    params,
                });
            }
        }
        return Err(IntentError::NoMatch);
    }

    if cancel {
        return Ok(Intent::CancelJob {
            owner: submission.usr_name.unwrap_or_default(),
            job: submission.job_name.unwrap_or_default(),
        });
    }

    Err(IntentError::NoMatch)
}
