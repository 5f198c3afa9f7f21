use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("invalid pattern {pattern:?}: {source}")]
    Regex {
        pattern: &'static str,
        #[source]
        source: regex::Error,
    },
}
