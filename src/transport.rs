//! HTTP port used by the toggles, and its reqwest-backed implementation.
use crate::config::Config;
use crate::errors::TransportError;
use crate::models::StatusResponse;
use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

pub type Form = Vec<(&'static str, String)>;

#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs a form-encoded body to `path` and decodes the `{status}` answer.
    async fn post_form(&self, path: &str, form: Form) -> Result<StatusResponse, TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers(config))
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

fn default_headers(config: &Config) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));

    let mut cookies = Vec::new();
    if let Some(token) = &config.csrf_token {
        match HeaderValue::from_str(token) {
            Ok(value) => {
                headers.insert("x-csrftoken", value);
                cookies.push(format!("csrftoken={token}"));
            }
            Err(_) => warn!("ignoring CSRF token that is not a valid header value"),
        }
    }
    if let Some(session) = &config.session_id {
        cookies.push(format!("sessionid={session}"));
    }
    if !cookies.is_empty() {
        match HeaderValue::from_str(&cookies.join("; ")) {
            Ok(value) => {
                headers.insert(COOKIE, value);
            }
            Err(_) => warn!("ignoring cookies that are not a valid header value"),
        }
    }
    headers
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_form(&self, path: &str, form: Form) -> Result<StatusResponse, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST start");

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| TransportError::Request {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_slice(&body).map_err(|err| TransportError::Decode {
            path: path.to_string(),
            message: err.to_string(),
        })
    }
}
