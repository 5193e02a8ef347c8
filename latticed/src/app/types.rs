// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::PathBuf;
use std::str::FromStr;

use bytes::Bytes;

/// Job state as reported by the external scheduler. On the wire each state
/// is a small integer index; anything outside the known range decodes to
/// `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Error,
    Stopped,
    Finished,
    Unknown,
}

impl JobStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => JobStatus::Queued,
            1 => JobStatus::Running,
            2 => JobStatus::Error,
            3 => JobStatus::Stopped,
            4 => JobStatus::Finished,
            _ => JobStatus::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "Queued",
            JobStatus::Running => "Running",
            JobStatus::Error => "Error",
            JobStatus::Stopped => "Stopped",
            JobStatus::Finished => "Finished",
            JobStatus::Unknown => "Unknown",
        }
    }
}

/// One job as reported by a scheduler `list` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub submitted_at: String,
    pub owner: String,
    pub name: String,
    pub status: JobStatus,
}

/// Raw uploaded file as received from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Staged artifact on disk; written once per submission, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub file_name: String,
    pub stored_path: PathBuf,
    pub byte_size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfAlgorithm {
    Louvain,
    LeadingEigenvector,
}

impl CfAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            CfAlgorithm::Louvain => "louvain",
            CfAlgorithm::LeadingEigenvector => "leading_eigenvector",
        }
    }
}

impl FromStr for CfAlgorithm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "louvain" => Ok(CfAlgorithm::Louvain),
            "leading_eigenvector" => Ok(CfAlgorithm::LeadingEigenvector),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    EdgelistTsv,
    Json,
}

impl OutputFormat {
    /// Flag string the analysis process greps for in its argument file.
    pub fn as_flag(self) -> &'static str {
        match self {
            OutputFormat::EdgelistTsv => "output-type-edgelist-tsv",
            OutputFormat::Json => "output-type-json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edgelist" => Ok(OutputFormat::EdgelistTsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(()),
        }
    }
}

/// Parameters handed to the analysis process through `arguments.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    pub algorithm: CfAlgorithm,
    pub min_vertices: u32,
    pub bin_width: u32,
    pub output_format: OutputFormat,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            algorithm: CfAlgorithm::Louvain,
            min_vertices: 3,
            bin_width: 50,
            output_format: OutputFormat::EdgelistTsv,
        }
    }
}

/// Action rendered in the result column of a job row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Download { href: String },
    Cancel { owner: String, job: String },
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub record: JobRecord,
    pub action: RowAction,
}

/// Everything the console page needs to render one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolePage {
    pub owner: String,
    pub rows: Vec<JobRowView>,
    pub notice: Option<String>,
}
