//! One-shot authentication smoke check: log in, then make a single
//! authenticated call against `/repositories`.

use log::{error, info};

use crate::{
    client::{BatchClient, Exchange},
    error::ClientError,
    models::{LoginRequest, LoginResponse},
};

pub const TOKEN_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    LoginFailed,
    NoToken,
    /// The authenticated call never got an HTTP answer.
    Unreachable,
    Rejected,
    Authenticated,
}

impl ProbeOutcome {
    pub fn passed(self) -> bool {
        self == ProbeOutcome::Authenticated
    }
}

#[derive(Debug)]
pub struct ProbeReport {
    pub login: Exchange,
    pub token_preview: Option<String>,
    pub repositories: Option<Exchange>,
    pub repositories_error: Option<ClientError>,
    pub outcome: ProbeOutcome,
}

pub async fn run_auth_probe(
    base_url: &str,
    credentials: &LoginRequest,
) -> Result<ProbeReport, ClientError> {
    let client = BatchClient::new(base_url)?;

    let login = client.post_login(credentials).await?;
    if !login.is_ok() {
        error!("login rejected with status {}", login.status);
        return Ok(ProbeReport {
            login,
            token_preview: None,
            repositories: None,
            repositories_error: None,
            outcome: ProbeOutcome::LoginFailed,
        });
    }

    // A 200 with an unreadable body is treated the same as a missing token.
    let token = login
        .json::<LoginResponse>()
        .ok()
        .and_then(|response| response.token)
        .filter(|token| !token.is_empty());
    let Some(token) = token else {
        error!("login succeeded but no token was returned");
        return Ok(ProbeReport {
            login,
            token_preview: None,
            repositories: None,
            repositories_error: None,
            outcome: ProbeOutcome::NoToken,
        });
    };

    let token_preview: String = token.chars().take(TOKEN_PREVIEW_CHARS).collect();
    let client = client.with_token(token);
    let repositories = match client.get_repositories().await {
        Ok(repositories) => repositories,
        Err(err) => {
            error!("authenticated call failed: {err}");
            return Ok(ProbeReport {
                login,
                token_preview: Some(token_preview),
                repositories: None,
                repositories_error: Some(err),
                outcome: ProbeOutcome::Unreachable,
            });
        }
    };
    let outcome = if repositories.is_ok() {
        info!("authenticated call accepted");
        ProbeOutcome::Authenticated
    } else {
        error!("authenticated call rejected with status {}", repositories.status);
        ProbeOutcome::Rejected
    };

    Ok(ProbeReport {
        login,
        token_preview: Some(token_preview),
        repositories: Some(repositories),
        repositories_error: None,
        outcome,
    })
}
