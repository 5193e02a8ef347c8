// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use xxhash_rust::xxh32::xxh32;

use crate::app::types::{AnalysisParams, UploadRequest};

/// Salt mixed between owner and job name before hashing.
const KEY_SALT: &str = "salt";

pub const MIN_UPLOAD_BYTES: u64 = 100;
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
pub const UPLOAD_EXTENSION: &str = ".tsv";
pub const ARGUMENTS_FILE_NAME: &str = "arguments.txt";

/// Storage key for a (owner, job) pair. Deterministic, so the result
/// location of a job can be re-derived at render time without a lookup
/// table. The key is a 32-bit non-cryptographic hash: distinct pairs
/// colliding is improbable but not impossible.
pub fn storage_key(owner: &str, job: &str) -> u32 {
    let mut material = String::with_capacity(owner.len() + KEY_SALT.len() + job.len());
    material.push_str(owner);
    material.push_str(KEY_SALT);
    material.push_str(job);
    xxh32(material.as_bytes(), 0)
}

pub fn output_dir_name(key: u32) -> String {
    format!("output_{key}")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadValidationError {
    #[error("upload has no usable file name")]
    EmptyFileName,
    #[error("unsupported upload extension for {0:?}, expected {UPLOAD_EXTENSION}")]
    BadExtension(String),
    #[error("upload of {0} bytes is below the {MIN_UPLOAD_BYTES} byte minimum")]
    TooSmall(u64),
    #[error("upload of {0} bytes exceeds the {MAX_UPLOAD_BYTES} byte maximum")]
    TooLarge(u64),
}

/// Reduce a client-supplied file name to its final path component so an
/// upload can never escape its staging directory.
pub fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim()
        .to_string()
}

/// Server-side admission check for an upload. Returns the sanitized file
/// name the artifact will be stored under.
pub fn validate_upload(upload: &UploadRequest) -> Result<String, UploadValidationError> {
    let file_name = sanitize_file_name(&upload.file_name);
    if file_name.is_empty() || file_name == "." || file_name == ".." {
        return Err(UploadValidationError::EmptyFileName);
    }
    if !file_name.to_ascii_lowercase().ends_with(UPLOAD_EXTENSION) {
        return Err(UploadValidationError::BadExtension(file_name));
    }
    let size = upload.bytes.len() as u64;
    if size < MIN_UPLOAD_BYTES {
        return Err(UploadValidationError::TooSmall(size));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadValidationError::TooLarge(size));
    }
    Ok(file_name)
}

/// Body of the `arguments.txt` the analysis process reads from its working
/// directory: algorithm, minimum subgraph vertex count, key-regulator bin
/// width, output format flag, one per line.
pub fn arguments_file_body(params: &AnalysisParams) -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        params.algorithm.as_str(),
        params.min_vertices,
        params.bin_width,
        params.output_format.as_flag(),
    )
}
