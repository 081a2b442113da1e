//! Remote invocation: the single network call per session.
//!
//! One HTTPS POST with a `multipart/form-data` body, one response — no
//! retry, no chunking, no resumable transfer. The service either returns the
//! processed artifact as a binary body or reports failure; [`classify`] maps
//! every outcome onto [`RemoteError`] the same way for every tool:
//!
//! * 2xx with a binary body → [`BinaryArtifact`]
//! * any status with a JSON error body → the body's `error`/`message` field
//! * other error statuses → the plain-text body, else `HTTP error <status>`
//! * transport failure → a generic connectivity message
//!
//! The service sits behind a trait so tests can drive the whole session
//! against an in-process double without a network.

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::error::RemoteError;
use crate::pipeline::request::RequestPayload;

/// The processed result as returned by the service, bytes untouched.
///
/// No in-memory encoding is assumed anywhere between here and the local
/// file — the bytes written to disk are exactly the bytes received.
#[derive(Debug, Clone)]
pub struct BinaryArtifact {
    pub bytes: Vec<u8>,
    /// Filename hint from `Content-Disposition`, when the service sends one.
    pub suggested_name: Option<String>,
    pub content_type: Option<String>,
}

/// Signals an in-flight invocation to give up.
///
/// Created in a pair with [`CancelHandle`]; the session driver polls the
/// token while the request is outstanding. Dropping the handle without
/// cancelling leaves the token permanently un-cancelled.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// The caller-side trigger for [`CancelToken`].
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when cancellation fires; pends forever otherwise.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle dropped without cancelling: never resolves.
                std::future::pending::<()>().await;
            }
        }
    }

    /// A token that can never fire, for callers without a cancel surface.
    pub fn never() -> Self {
        static NEVER: once_cell::sync::Lazy<watch::Receiver<bool>> =
            once_cell::sync::Lazy::new(|| {
                let (tx, rx) = watch::channel(false);
                // Keep the sender alive for the process lifetime so the
                // channel never closes.
                std::mem::forget(tx);
                rx
            });
        Self { rx: NEVER.clone() }
    }
}

/// Create a linked handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// The remote conversion service, as the orchestrator sees it.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Execute one request/response exchange. Exactly one call per session.
    async fn execute(
        &self,
        payload: &RequestPayload,
        cancel: &CancelToken,
    ) -> Result<BinaryArtifact, RemoteError>;
}

/// Production implementation over HTTPS.
pub struct HttpRemoteClient {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpRemoteClient {
    pub fn new(config: ServiceConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RemoteError::Connectivity {
                detail: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Materialise the multipart form, reading each file at send time.
    /// Parts are appended strictly in payload order — selection order is the
    /// output order for merge-style tools.
    async fn build_form(
        &self,
        payload: &RequestPayload,
    ) -> Result<reqwest::multipart::Form, RemoteError> {
        let mut form = reqwest::multipart::Form::new();
        for part in &payload.parts {
            let bytes = tokio::fs::read(&part.location).await.map_err(|e| {
                RemoteError::PayloadUnreadable {
                    name: part.file_name.clone(),
                    detail: e.to_string(),
                }
            })?;
            let media_type = if part.media_type.is_empty() {
                "application/octet-stream"
            } else {
                part.media_type.as_str()
            };
            let file_part = reqwest::multipart::Part::bytes(bytes)
                .file_name(part.file_name.clone())
                .mime_str(media_type)
                .map_err(|e| RemoteError::PayloadUnreadable {
                    name: part.file_name.clone(),
                    detail: format!("invalid media type '{media_type}': {e}"),
                })?;
            form = form.part(part.field.clone(), file_part);
        }
        for (key, value) in &payload.fields {
            form = form.text(key.clone(), value.clone());
        }
        Ok(form)
    }
}

#[async_trait]
impl RemoteService for HttpRemoteClient {
    async fn execute(
        &self,
        payload: &RequestPayload,
        cancel: &CancelToken,
    ) -> Result<BinaryArtifact, RemoteError> {
        let url = self.config.endpoint_url(&payload.endpoint);
        info!(
            "POST {} ({} file part(s), {} field(s))",
            url,
            payload.parts.len(),
            payload.fields.len()
        );

        let form = self.build_form(payload).await?;
        let request = self.client.post(&url).multipart(form).send();

        let response = tokio::select! {
            res = request => res.map_err(map_transport_error)?,
            _ = cancel.cancelled() => {
                warn!("request to {} cancelled by caller", url);
                return Err(RemoteError::Cancelled);
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let suggested_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_disposition_filename);

        let body = tokio::select! {
            res = response.bytes() => res.map_err(map_transport_error)?.to_vec(),
            _ = cancel.cancelled() => return Err(RemoteError::Cancelled),
        };

        debug!("response {} ({} bytes)", status, body.len());
        classify(status, content_type, suggested_name, body)
    }
}

fn map_transport_error(e: reqwest::Error) -> RemoteError {
    RemoteError::Connectivity {
        detail: e.to_string(),
    }
}

/// Map a completed HTTP exchange onto artifact-or-error, uniformly for every
/// tool.
pub fn classify(
    status: u16,
    content_type: Option<String>,
    suggested_name: Option<String>,
    body: Vec<u8>,
) -> Result<BinaryArtifact, RemoteError> {
    let is_json = content_type
        .as_deref()
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    if (200..300).contains(&status) && !is_json {
        return Ok(BinaryArtifact {
            bytes: body,
            suggested_name,
            content_type,
        });
    }

    // A JSON body on a 2xx is still an error report — the service never
    // returns JSON for a processed artifact.
    Err(RemoteError::Service {
        status,
        message: classify_error_body(status, &body),
    })
}

/// Extract the most useful message from an error body: structured JSON
/// first, then plain text, then the bare status.
pub fn classify_error_body(status: u16, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                if !msg.is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    if let Ok(text) = std::str::from_utf8(body) {
        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed.len() <= 300 && !trimmed.starts_with('<') {
            return trimmed.to_string();
        }
    }
    format!("HTTP error {status}")
}

/// Pull `filename=` out of a `Content-Disposition` header.
fn parse_disposition_filename(header: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let part = part.trim();
        let value = part.strip_prefix("filename=")?;
        let name = value.trim_matches('"').trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_binary_body_is_an_artifact() {
        let artifact = classify(
            200,
            Some("application/pdf".into()),
            None,
            b"%PDF-1.4".to_vec(),
        )
        .unwrap();
        assert_eq!(artifact.bytes, b"%PDF-1.4");
    }

    #[test]
    fn json_error_body_uses_error_field() {
        let err = classify(
            400,
            Some("application/json".into()),
            None,
            br#"{"error": "invalid range"}"#.to_vec(),
        )
        .unwrap_err();
        match err {
            RemoteError::Service { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalid range");
            }
            other => panic!("expected Service, got {other:?}"),
        }
    }

    #[test]
    fn json_error_body_falls_back_to_message_field() {
        let msg = classify_error_body(422, br#"{"message": "unsupported document"}"#);
        assert_eq!(msg, "unsupported document");
    }

    #[test]
    fn plain_text_error_body_is_passed_through() {
        let msg = classify_error_body(500, b"conversion worker crashed");
        assert_eq!(msg, "conversion worker crashed");
    }

    #[test]
    fn unparseable_error_body_reports_the_status() {
        assert_eq!(classify_error_body(502, &[0xff, 0xfe, 0x00]), "HTTP error 502");
        assert_eq!(classify_error_body(404, b""), "HTTP error 404");
        // HTML error pages are noise, not a message.
        assert_eq!(
            classify_error_body(503, b"<html><body>Bad Gateway</body></html>"),
            "HTTP error 503"
        );
    }

    #[test]
    fn json_body_on_success_status_is_still_an_error() {
        let err = classify(
            200,
            Some("application/json".into()),
            None,
            br#"{"error": "nothing to merge"}"#.to_vec(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Service { status: 200, ref message } if message == "nothing to merge"
        ));
    }

    #[test]
    fn disposition_filename_parsing() {
        assert_eq!(
            parse_disposition_filename(r#"attachment; filename="merged.pdf""#),
            Some("merged.pdf".to_string())
        );
        assert_eq!(
            parse_disposition_filename("attachment; filename=out.zip"),
            Some("out.zip".to_string())
        );
        assert_eq!(parse_disposition_filename("inline"), None);
    }

    #[tokio::test]
    async fn cancel_token_fires_once_cancelled() {
        let (handle, token) = cancel_pair();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
        // Must resolve promptly now that the flag is set.
        token.cancelled().await;
    }

    #[tokio::test]
    async fn never_token_does_not_fire() {
        let token = CancelToken::never();
        assert!(!token.is_cancelled());
        let timed = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            token.cancelled(),
        )
        .await;
        assert!(timed.is_err(), "never() token must not resolve");
    }
}
