pub mod client;
pub mod error;
pub mod models;
pub mod probe;
pub mod workspace;

pub use client::{BatchClient, Exchange, PollSettings};
pub use error::ClientError;
pub use models::{ImageUploadResponse, JobStatus, JobStatusResponse, LoginRequest, LoginResponse};
pub use probe::{run_auth_probe, ProbeOutcome, ProbeReport};
