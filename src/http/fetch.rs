use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{COOKIE, HeaderMap, USER_AGENT};
use reqwest::{Client, Response};
use serde::{Serialize, Serializer};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::args::{DEFAULT_USER_AGENT, HeaderPair};
use crate::metrics::serialize_micros;

/// Status recorded when no HTTP response was received at all.
pub const CONNECTION_ERROR_STATUS: i32 = -100;

pub type ResponseHeaders = BTreeMap<String, Vec<String>>;

/// Everything needed to issue one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub capture_body: bool,
    pub cookies: String,
    pub header: Option<HeaderPair>,
    pub user_agent: String,
}

impl FetchRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            capture_body: false,
            cookies: String::new(),
            header: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Copy of this request aimed at another URL.
    #[must_use]
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_capture_body(&self, capture_body: bool) -> Self {
        Self {
            capture_body,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_cookies(&self, cookies: impl Into<String>) -> Self {
        Self {
            cookies: cookies.into(),
            ..self.clone()
        }
    }
}

/// Outcome of one instrumented GET.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub url: String,
    #[serde(serialize_with = "serialize_body")]
    pub body: Option<Vec<u8>>,
    pub headers: Option<ResponseHeaders>,
    pub bytes: u64,
    pub chars: u64,
    #[serde(rename = "elapsed_us", serialize_with = "serialize_micros")]
    pub elapsed: Duration,
    pub status: i32,
    pub error: String,
}

impl FetchResult {
    #[must_use]
    pub fn connection_error(url: impl Into<String>, elapsed: Duration, error: String) -> Self {
        Self {
            url: url.into(),
            body: None,
            headers: None,
            bytes: 0,
            chars: 0,
            elapsed,
            status: CONNECTION_ERROR_STATUS,
            error,
        }
    }

    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        self.status == CONNECTION_ERROR_STATUS
    }

    /// Drops body and headers, keeping the measurements.
    #[must_use]
    pub fn without_body(self) -> Self {
        Self {
            body: None,
            headers: None,
            ..self
        }
    }

    /// All values of a response header, if headers were captured.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Option<&[String]> {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get(&name.to_ascii_lowercase()))
            .map(Vec::as_slice)
    }
}

/// Issues a single GET and measures it from send until the body is fully read.
///
/// Never fails: transport errors come back as a result carrying
/// [`CONNECTION_ERROR_STATUS`] and the error text.
pub async fn fetch(client: &Client, request: &FetchRequest) -> FetchResult {
    let mut builder = client
        .get(&request.url)
        .header(USER_AGENT, request.user_agent.as_str());
    if let Some(header) = request.header.as_ref() {
        builder = builder.header(header.name.as_str(), header.value.as_str());
    }
    if !request.cookies.is_empty() {
        builder = builder.header(COOKIE, request.cookies.as_str());
    }

    let start = Instant::now();
    let response = match builder.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!("Request to {} failed: {}", request.url, err);
            return FetchResult::connection_error(
                request.url.as_str(),
                start.elapsed(),
                format!("request failed: {}", err),
            );
        }
    };

    let status = i32::from(response.status().as_u16());
    let headers = collect_headers(response.headers());
    let body = match read_body(response).await {
        Ok(body) => body,
        Err(err) => {
            warn!("Failed to read response body from {}: {}", request.url, err);
            return FetchResult::connection_error(
                request.url.as_str(),
                start.elapsed(),
                format!("body read failed: {}", err),
            );
        }
    };
    let elapsed = start.elapsed();

    let bytes = u64::try_from(body.len()).unwrap_or(u64::MAX);
    let chars = u64::try_from(String::from_utf8_lossy(&body).chars().count()).unwrap_or(u64::MAX);
    debug!(
        "GET {} -> {} ({} bytes in {:?})",
        request.url, status, bytes, elapsed
    );

    let result = FetchResult {
        url: request.url.clone(),
        body: Some(body),
        headers: Some(headers),
        bytes,
        chars,
        elapsed,
        status,
        error: String::new(),
    };
    if request.capture_body {
        result
    } else {
        result.without_body()
    }
}

async fn read_body(response: Response) -> Result<Vec<u8>, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body)
}

fn collect_headers(headers: &HeaderMap) -> ResponseHeaders {
    let mut collected = ResponseHeaders::new();
    for (name, value) in headers {
        collected
            .entry(name.as_str().to_owned())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    collected
}

fn serialize_body<S>(body: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match body {
        Some(bytes) => {
            let text: Cow<'_, str> = String::from_utf8_lossy(bytes);
            serializer.serialize_some(&text)
        }
        None => serializer.serialize_none(),
    }
}
