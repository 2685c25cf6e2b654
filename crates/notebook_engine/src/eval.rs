use std::time::Duration;

use futures_util::StreamExt;
use notebook_logging::{notebook_debug, notebook_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use url::{form_urlencoded, Url};

use crate::decode::decode_body;
use crate::{EntryId, EvalError, EvalReply, FailureKind};

pub const EVAL_PATH: &str = "/eval";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone)]
pub struct EvalSettings {
    pub endpoint: Url,
    pub connect_timeout: Duration,
    /// Deadline for the whole request, body included.
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl EvalSettings {
    /// Settings targeting `/eval` on the given server.
    pub fn for_server(base: &str) -> Result<Self, EvalError> {
        let base = Url::parse(base)
            .map_err(|err| EvalError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(EvalError::new(
                FailureKind::InvalidEndpoint,
                format!("{base} cannot be a base url"),
            ));
        }
        let endpoint = base
            .join(EVAL_PATH)
            .map_err(|err| EvalError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        Ok(Self {
            endpoint,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        })
    }
}

/// Something that can evaluate a snippet.
#[async_trait::async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, entry_id: EntryId, source: &str) -> Result<EvalReply, EvalError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestEvaluator {
    settings: EvalSettings,
    client: reqwest::Client,
}

impl ReqwestEvaluator {
    pub fn new(settings: EvalSettings) -> Result<Self, EvalError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EvalError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }
}

/// `source=<text>` with form encoding.
pub(crate) fn form_body(source: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("source", source)
        .finish()
}

#[async_trait::async_trait]
impl Evaluator for ReqwestEvaluator {
    async fn evaluate(&self, entry_id: EntryId, source: &str) -> Result<EvalReply, EvalError> {
        notebook_debug!(
            "POST {} entry_id={} source_len={}",
            self.settings.endpoint,
            entry_id,
            source.len()
        );

        let response = self
            .client
            .post(self.settings.endpoint.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form_body(source))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(EvalError::new(FailureKind::ServerError, status.to_string()));
        }
        if status != StatusCode::OK {
            notebook_warn!("Entry {} got unexpected status {}", entry_id, status);
            return Err(EvalError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(EvalError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(EvalError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_body(&bytes, content_type.as_deref());

        Ok(EvalReply {
            body: decoded.text,
            content_type,
            encoding_label: decoded.encoding_label,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> EvalError {
    if err.is_timeout() {
        return EvalError::new(FailureKind::Timeout, err.to_string());
    }
    EvalError::new(FailureKind::Network, err.to_string())
}
