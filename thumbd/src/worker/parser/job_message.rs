use crate::types::job::JobDescription;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("payload is neither JSON nor base64-encoded JSON: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("base64 payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Parse a queue message body into a job. A plain JSON object is accepted
/// as-is; anything else gets one chance as base64-encoded JSON before the
/// payload is declared malformed.
pub fn parse(body: &str) -> Result<JobDescription, ParseError> {
    match serde_json::from_str(body) {
        Ok(job) => Ok(job),
        Err(json_err) => {
            let Ok(decoded) = STANDARD.decode(body.trim()) else {
                return Err(ParseError::InvalidPayload(json_err));
            };
            let decoded = String::from_utf8(decoded)?;
            serde_json::from_str(&decoded).map_err(ParseError::InvalidPayload)
        }
    }
}
