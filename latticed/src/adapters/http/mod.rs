// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod page;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    extract::{ConnectInfo, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use rand::Rng;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::app::errors::{AppError, AppErrorKind, AppResult, codes};
use crate::app::intent::Submission;
use crate::app::services::staging::MAX_UPLOAD_BYTES;
use crate::app::types::{ConsolePage, UploadRequest};
use crate::app::usecases::UseCases;

/// Headroom over the artifact bound for the other multipart fields and
/// framing.
const BODY_LIMIT_BYTES: usize = (MAX_UPLOAD_BYTES as usize) + 64 * 1024;

pub struct AppState {
    pub usecases: UseCases,
}

/// Console router: one page handling both the fresh load and the form
/// post, plus static serving of staged inputs and results.
pub fn router(state: Arc<AppState>, upload_dir: &Path) -> Router {
    Router::new()
        .route("/", get(console).post(submit))
        .nest_service("/upload", ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn console(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Response {
    // A bare page load carries no form fields at all.
    let nonce = rand::rng().random();
    let result = state
        .usecases
        .handle_submission(Submission::default(), Some(peer.ip()), nonce)
        .await;
    respond(result)
}

async fn submit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    multipart: Multipart,
) -> Response {
    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(err) => return error_response(&err),
    };
    let nonce = rand::rng().random();
    let result = state
        .usecases
        .handle_submission(submission, Some(peer.ip()), nonce)
        .await;
    respond(result)
}

/// Drain the multipart body into a raw `Submission`. Unknown fields are
/// ignored; a file part with neither a name nor content (an untouched file
/// input) counts as absent.
async fn read_submission(mut multipart: Multipart) -> AppResult<Submission> {
    let mut submission = Submission::default();
    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "sif_file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(read_error)?;
                if !file_name.is_empty() || !bytes.is_empty() {
                    submission.file = Some(UploadRequest { file_name, bytes });
                }
            }
            "usr_name" => submission.usr_name = Some(field.text().await.map_err(read_error)?),
            "job_name" => submission.job_name = Some(field.text().await.map_err(read_error)?),
            "search_only" => {
                submission.search_only = Some(field.text().await.map_err(read_error)?)
            }
            "cancel_job" => submission.cancel_job = Some(field.text().await.map_err(read_error)?),
            "cf_algo" => submission.cf_algo = Some(field.text().await.map_err(read_error)?),
            "min_vertices" => {
                submission.min_vertices = Some(field.text().await.map_err(read_error)?)
            }
            "bin_width" => submission.bin_width = Some(field.text().await.map_err(read_error)?),
            "output_format" => {
                submission.output_format = Some(field.text().await.map_err(read_error)?)
            }
            _ => {
                // Drain and drop anything the form does not define.
                let _ = field.bytes().await.map_err(read_error)?;
            }
        }
    }
    Ok(submission)
}

fn read_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::with_message(
        AppErrorKind::InvalidArgument,
        codes::INVALID_ARGUMENT,
        format!("failed to read form body: {err}"),
    )
}

fn respond(result: AppResult<ConsolePage>) -> Response {
    match result {
        Ok(console_page) => Html(page::render_console(&console_page)).into_response(),
        Err(err) => error_response(&err),
    }
}

fn status_for(err: &AppError) -> StatusCode {
    match err.kind() {
        AppErrorKind::InvalidArgument => StatusCode::UNPROCESSABLE_ENTITY,
        AppErrorKind::Aborted => StatusCode::BAD_GATEWAY,
        AppErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &AppError) -> Response {
    tracing::warn!(code = err.code(), "request failed: {err}");
    (status_for(err), Html(page::render_error(err.message()))).into_response()
}
