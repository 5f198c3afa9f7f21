use std::{path::Path, time::Duration};

use http::StatusCode;
use log::{debug, info, warn};
use reqwest::{
    multipart::{Form, Part},
    RequestBuilder,
};
use serde::de::DeserializeOwned;

use crate::{
    error::ClientError,
    models::{ImageUploadResponse, JobStatus, JobStatusResponse, LoginRequest, LoginResponse},
};

const IMAGE_CONTENT_TYPE: &str = "image/png";
const IMAGE_FIELD_NAME: &str = "file";

/// Status code and raw body of one call, kept so callers can print
/// exactly what the server answered.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: StatusCode,
    pub body: String,
}

impl Exchange {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    fn into_error(self) -> ClientError {
        ClientError::UnexpectedStatus {
            status: self.status,
            body: self.body,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        PollSettings {
            interval: Duration::from_secs(2),
            max_polls: 150,
        }
    }
}

#[derive(Clone)]
pub struct BatchClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BatchClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(BatchClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn exchange(request: RequestBuilder) -> Result<Exchange, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("response {status}: {} bytes", body.len());
        Ok(Exchange { status, body })
    }

    pub async fn post_login(&self, login_request: &LoginRequest) -> Result<Exchange, ClientError> {
        info!("logging in as {}", login_request.username);
        Self::exchange(self.http.post(self.url("/auth/login")).json(login_request)).await
    }

    /// Logs in and keeps the bearer token for the following calls.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<String, ClientError> {
        let login_request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let exchange = self.post_login(&login_request).await?;
        if !exchange.is_ok() {
            return Err(exchange.into_error());
        }

        let login_response: LoginResponse = exchange.json()?;
        let token = match login_response.token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(ClientError::MissingToken),
        };
        self.token = Some(token.clone());
        Ok(token)
    }

    pub async fn get_repositories(&self) -> Result<Exchange, ClientError> {
        Self::exchange(self.authorized(self.http.get(self.url("/repositories")))).await
    }

    pub async fn upload_image(
        &self,
        job_id: &str,
        image_path: &Path,
    ) -> Result<ImageUploadResponse, ClientError> {
        let image_bytes = tokio::fs::read(image_path).await?;
        let file_name = image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.png".to_string());
        info!(
            "uploading {file_name} ({} bytes) to job {job_id}",
            image_bytes.len()
        );

        let part = Part::bytes(image_bytes)
            .file_name(file_name)
            .mime_str(IMAGE_CONTENT_TYPE)?;
        let form = Form::new().part(IMAGE_FIELD_NAME, part);
        let request = self
            .http
            .post(self.url(&format!("/jobs/{job_id}/images")))
            .multipart(form);

        let exchange = Self::exchange(self.authorized(request)).await?;
        if !exchange.status.is_success() {
            return Err(exchange.into_error());
        }
        if exchange.body.trim().is_empty() {
            return Ok(ImageUploadResponse::default());
        }
        match exchange.json() {
            Ok(uploaded) => Ok(uploaded),
            Err(err) => {
                warn!("upload response was not the expected JSON: {err}");
                Ok(ImageUploadResponse::default())
            }
        }
    }

    pub async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ClientError> {
        let request = self.http.get(self.url(&format!("/jobs/{job_id}")));
        let exchange = Self::exchange(self.authorized(request)).await?;
        if !exchange.is_ok() {
            return Err(exchange.into_error());
        }
        exchange.json()
    }

    /// Polls the job until it reaches a terminal status. A `failed` job is
    /// returned as [`ClientError::JobFailed`].
    pub async fn wait_for_job(
        &self,
        job_id: &str,
        settings: PollSettings,
    ) -> Result<JobStatusResponse, ClientError> {
        let mut last_status = JobStatus::Unknown("unpolled".to_string());
        for poll in 1..=settings.max_polls {
            let job = self.job_status(job_id).await?;
            debug!("job {job_id} poll {poll}: {}", job.status);
            match job.status {
                JobStatus::Completed => return Ok(job),
                JobStatus::Failed => {
                    return Err(ClientError::JobFailed {
                        job_id: job_id.to_string(),
                        output: job.output,
                    })
                }
                status => last_status = status,
            }
            if poll < settings.max_polls {
                tokio::time::sleep(settings.interval).await;
            }
        }
        Err(ClientError::PollLimit {
            job_id: job_id.to_string(),
            last_status: last_status.to_string(),
            polls: settings.max_polls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = BatchClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/auth/login"), "http://localhost:5000/auth/login");
    }

    #[test]
    fn exchange_only_ok_on_200() {
        let created = Exchange {
            status: StatusCode::CREATED,
            body: String::new(),
        };
        assert!(!created.is_ok());
        let ok = Exchange {
            status: StatusCode::OK,
            body: r#"{"token":"abc"}"#.to_string(),
        };
        assert!(ok.is_ok());
        let parsed: LoginResponse = ok.json().unwrap();
        assert_eq!(parsed.token.as_deref(), Some("abc"));
    }
}
