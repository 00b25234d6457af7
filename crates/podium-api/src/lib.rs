//! Axum HTTP API server.
//!
//! Endpoints:
//! - `POST /upload` — multipart video (+ optional rubric), returns a job id
//! - `GET /status/:job_id` — poll job status; terminal statuses read once
//! - `POST|GET /criteria/:name` — save/load named rubric criteria
//! - `GET /health`, `GET /ready`, `GET /metrics`

pub mod config;
pub mod criteria;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use criteria::CriteriaStore;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
