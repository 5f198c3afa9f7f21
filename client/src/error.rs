use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("no token in login response")]
    MissingToken,
    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("job {job_id} failed")]
    JobFailed {
        job_id: String,
        output: Option<String>,
    },
    #[error("job {job_id} still {last_status} after {polls} polls")]
    PollLimit {
        job_id: String,
        last_status: String,
        polls: u32,
    },
    #[error("job id {0:?} is not a single path segment")]
    InvalidJobId(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
