//! Video upload and job status handlers.

use std::path::Path;

use axum::extract::{Multipart, Path as UrlPath, State};
use axum::Json;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;
use validator::Validate;

use podium_media::SessionWorkspace;
use podium_models::{Criterion, JobId, JobState};

use crate::error::{ApiError, ApiResult};
use crate::metrics::names;
use crate::state::AppState;

/// Response for an accepted upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: JobId,
}

/// Accept a multipart video upload and start an analysis job.
///
/// Expects a `videoFile` field; an optional `criteria` field carries the
/// rubric as a JSON array. Returns the job id immediately — analysis runs
/// in the background and is observed via `GET /status/:job_id`.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut workspace: Option<SessionWorkspace> = None;
    let mut video_path = None;
    let mut criteria: Option<Vec<Criterion>> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("videoFile") => {
                let filename = sanitize_upload_filename(field.file_name());
                let ws =
                    SessionWorkspace::create(&state.config.upload_dir, &state.config.frame_dir)
                        .await?;
                let path = ws.video_path(&filename);

                let mut file = tokio::fs::File::create(&path).await?;
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Upload read failed: {e}")))?
                {
                    file.write_all(&chunk).await?;
                }
                file.flush().await?;

                // An abandoned workspace is removed when it drops.
                workspace = Some(ws);
                video_path = Some(path);
            }
            Some("criteria") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Criteria read failed: {e}")))?;
                criteria = Some(parse_criteria(&text)?);
            }
            _ => {}
        }
    }

    let (workspace, video_path) = match (workspace, video_path) {
        (Some(workspace), Some(path)) => (workspace, path),
        _ => return Err(ApiError::bad_request("Missing videoFile field")),
    };

    let job_id = JobId::new();
    info!(
        job_id = %job_id,
        session = workspace.session_id(),
        "Accepted video upload {}",
        video_path.display()
    );
    metrics::counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);

    // The handle is dropped on purpose: the task is detached and observed
    // only through the job store.
    let _handle = state
        .pipeline
        .start(job_id.clone(), video_path, workspace, criteria)
        .await?;

    Ok(Json(UploadResponse { job_id }))
}

/// Poll a job's status.
///
/// Terminal statuses are returned exactly once: the first query to observe
/// `Complete` or `Error` takes the payload with it, and any later query
/// returns 404.
pub async fn job_status(
    State(state): State<AppState>,
    UrlPath(job_id): UrlPath<String>,
) -> ApiResult<Json<JobState>> {
    let id = JobId::from_string(job_id);
    match state.store.poll(&id).await? {
        Some(job_state) => Ok(Json(job_state)),
        None => Err(ApiError::not_found("Unknown job id")),
    }
}

/// Parse and validate an uploaded criteria payload.
fn parse_criteria(text: &str) -> ApiResult<Vec<Criterion>> {
    let criteria: Vec<Criterion> = serde_json::from_str(text)
        .map_err(|e| ApiError::validation(format!("Invalid criteria JSON: {e}")))?;
    for criterion in &criteria {
        criterion
            .validate()
            .map_err(|e| ApiError::validation(format!("Invalid criterion: {e}")))?;
    }
    Ok(criteria)
}

/// Keep only the final path component of a client-supplied filename.
fn sanitize_upload_filename(name: Option<&str>) -> String {
    name.and_then(|n| Path::new(n).file_name())
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("uploaded_video")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_upload_filename() {
        assert_eq!(sanitize_upload_filename(Some("talk.mp4")), "talk.mp4");
        assert_eq!(
            sanitize_upload_filename(Some("../../etc/passwd")),
            "passwd"
        );
        assert_eq!(sanitize_upload_filename(None), "uploaded_video");
        assert_eq!(sanitize_upload_filename(Some("")), "uploaded_video");
    }

    #[test]
    fn test_parse_criteria_validates_entries() {
        let ok = r#"[{"name": "Pace", "score": 30.0, "description": "steady pace"}]"#;
        assert_eq!(parse_criteria(ok).unwrap().len(), 1);

        let empty_name = r#"[{"name": "", "score": 30.0, "description": "x"}]"#;
        assert!(matches!(
            parse_criteria(empty_name),
            Err(ApiError::Validation(_))
        ));

        assert!(matches!(
            parse_criteria("not json"),
            Err(ApiError::Validation(_))
        ));
    }
}
