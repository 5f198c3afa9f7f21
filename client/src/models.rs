use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of a successful `/auth/login`. The server may omit the token.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Created,
    Running,
    Completed,
    Failed,
    Unknown(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl FromStr for JobStatus {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.to_ascii_lowercase().as_str() {
            "created" => JobStatus::Created,
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Unknown(value.to_string()),
        })
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Created => write!(f, "created"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

impl Serialize for JobStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(JobStatus::from)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    #[serde(default)]
    pub job_id: Option<String>,
    pub status: JobStatus,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_status_parses_any_case() {
        let parsed: JobStatusResponse =
            serde_json::from_str(r#"{"jobId":"j1","status":"Completed","output":"ok"}"#).unwrap();
        assert_eq!(parsed.status, JobStatus::Completed);
        assert_eq!(parsed.job_id.as_deref(), Some("j1"));

        let running: JobStatus = "RUNNING".parse().unwrap();
        assert_eq!(running, JobStatus::Running);
    }

    #[test]
    fn unknown_status_is_not_terminal() {
        let status: JobStatus = "queued".parse().unwrap();
        assert_eq!(status, JobStatus::Unknown("queued".to_string()));
        assert!(!status.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Created.is_terminal());
    }

    #[test]
    fn login_response_tolerates_missing_token() {
        let parsed: LoginResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.token.is_none());
    }
}
