use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("server is not signed in to Google: {0}")]
    NotConfigured(&'static str),

    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    #[error("request to Google failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Google API responded with {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read credentials file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build mail: {0}")]
    Mail(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Turns a non-2xx Google response into [`Error::Api`], keeping the message Google sent.
pub(crate) async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(api_error(status, &body))
}

fn api_error(status: reqwest::StatusCode, body: &str) -> Error {
    Error::Api {
        status: status.as_u16(),
        message: api_message(body),
    }
}

// Sheets nests the message under `error.message`, the token endpoint uses
// `error_description`.
fn api_message(body: &str) -> String {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return body.trim().to_string(),
    };

    let message = parsed
        .pointer("/error/message")
        .or_else(|| parsed.get("error_description"))
        .or_else(|| parsed.get("error"))
        .and_then(|value| value.as_str());

    match message {
        Some(message) => message.to_string(),
        None => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{api_error, api_message, Error};
    use reqwest::StatusCode;

    #[test]
    fn reads_sheets_error_message() {
        let body = r#"{"error":{"code":403,"message":"The caller does not have permission","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(api_message(body), "The caller does not have permission");
    }

    #[test]
    fn reads_token_endpoint_error() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid JWT Signature."}"#;
        assert_eq!(api_message(body), "Invalid JWT Signature.");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(api_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn failed_response_becomes_api_error() {
        let body = r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#;
        let err = api_error(StatusCode::NOT_FOUND, body);

        assert!(matches!(
            &err,
            Error::Api { status: 404, message } if message == "Requested entity was not found."
        ));
        assert_eq!(
            err.to_string(),
            "Google API responded with 404: Requested entity was not found."
        );
    }
}
