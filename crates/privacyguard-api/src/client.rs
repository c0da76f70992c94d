// Control API HTTP client
//
// Wraps `reqwest::Client` with base-URL path construction and uniform
// response handling. Endpoint methods live in `crate::endpoints` as
// inherent methods so this module stays focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// How many bytes of a body to keep in error messages.
const BODY_PREVIEW: usize = 200;

/// The service reports failures as `{"error": "...", "status": "error"}`,
/// sometimes with HTTP 200.
#[derive(serde::Deserialize)]
struct ServiceError {
    error: Option<String>,
}

/// Raw request/response client for the control API.
///
/// Issues GET and POST calls against a fixed base URL (e.g.
/// `http://localhost:8001/api`). No retries happen at this layer; every
/// failure is returned immediately as an [`Error`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from a base URL and transport settings.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments to the base URL. Each segment is
    /// percent-encoded on its own, so interface names containing `/` or
    /// spaces stay a single segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Client(format!("base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn path_url(&self, path: &str) -> Result<Url, Error> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.endpoint(&segments)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET `{base}{path}` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.path_url(path)?;
        self.get_url(url).await
    }

    /// POST a JSON body to `{base}{path}` and decode the JSON reply.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.path_url(path)?;
        self.post_url(url, body).await
    }

    pub(crate) async fn get_url<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        parse_response(resp).await
    }

    pub(crate) async fn post_url<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_response(resp).await
    }
}

/// Map a response to either the decoded body or an [`Error`].
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        let message = service_error(&body).unwrap_or_else(|| preview(&body).to_owned());
        return Err(Error::Status {
            status: status.as_u16(),
            message,
        });
    }

    if let Some(message) = service_error(&body) {
        return Err(Error::Api { message });
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })
}

fn service_error(body: &str) -> Option<String> {
    serde_json::from_str::<ServiceError>(body)
        .ok()
        .and_then(|e| e.error)
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
