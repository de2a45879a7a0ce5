//! Backtest service client.
//!
//! The [`BacktestApi`] trait abstracts over the remote service so the TUI
//! worker and the CLI can be driven by a mock in tests. [`HttpBacktestApi`] is
//! the blocking `reqwest` implementation: one request per call, no retries.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::SymbolCatalog;
use crate::config::DashboardConfig;
use crate::signal::{SignalQuery, SignalResponse};

/// Structured errors for calls to the backtest service.
///
/// `Clone` so results can be sent across the TUI worker channel.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Error body the service sends alongside 4xx/5xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// The two endpoints the dashboard consumes.
pub trait BacktestApi: Send + Sync {
    /// `GET /get_symbols/`
    fn symbols(&self) -> Result<SymbolCatalog, ApiError>;

    /// `GET /backtest/?symbol=&timeframe=&page=&limit=`
    fn signals(&self, query: &SignalQuery) -> Result<SignalResponse, ApiError>;
}

/// Blocking HTTP client for the backtest service.
pub struct HttpBacktestApi {
    client: Client,
    base_url: Url,
}

impl HttpBacktestApi {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("forexboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ApiError> {
        let url = config
            .base_url()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Self::new(url, Duration::from_secs(config.request_timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL, keeping any path
    /// prefix the base carries (e.g. `https://host/api/`).
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidRequest(format!("bad endpoint '{path}': {e}")))
    }

    fn get<T>(&self, path: &str, query: Option<&SignalQuery>) -> Result<T, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(path)?;
        log::debug!("GET {url} {query:?}");

        let mut request = self.client.get(url.clone());
        if let Some(q) = query {
            request = request.query(q);
        }

        let resp = request.send().map_err(classify)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status, resp));
        }

        resp.json::<T>().map_err(|e| {
            ApiError::ResponseFormat(format!("failed to parse response from {url}: {e}"))
        })
    }
}

impl BacktestApi for HttpBacktestApi {
    fn symbols(&self) -> Result<SymbolCatalog, ApiError> {
        self.get("get_symbols/", None)
    }

    fn signals(&self, query: &SignalQuery) -> Result<SignalResponse, ApiError> {
        self.get("backtest/", Some(query))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn classify(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_builder() {
        ApiError::InvalidRequest(err.to_string())
    } else {
        ApiError::NetworkUnreachable(err.to_string())
    }
}

fn status_error(status: StatusCode, resp: Response) -> ApiError {
    let message = resp
        .text()
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
        .map(|b| b.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn api(base: &str) -> HttpBacktestApi {
        HttpBacktestApi::new(Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoints_join_onto_bare_host() {
        let api = api("https://forex.example.com");
        assert_eq!(
            api.endpoint("get_symbols/").unwrap().as_str(),
            "https://forex.example.com/get_symbols/"
        );
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let bare = api("http://127.0.0.1:8000/api");
        assert_eq!(
            bare.endpoint("backtest/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/backtest/"
        );
        let slashed = api("http://127.0.0.1:8000/api/");
        assert_eq!(slashed.base_url().as_str(), "http://127.0.0.1:8000/api/");
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        // Port 9 on localhost (discard) is closed on any sane test box.
        let api = api("http://127.0.0.1:9");
        let err = api.symbols().unwrap_err();
        assert!(
            matches!(err, ApiError::NetworkUnreachable(_) | ApiError::Timeout),
            "unexpected error: {err:?}"
        );
    }

    /// Serve one canned HTTP response on an ephemeral port. The handle yields
    /// the request line the client sent.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut header = String::new();
            while reader.read_line(&mut header).unwrap() > 0 && header != "\r\n" {
                header.clear();
            }
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request_line.trim_end().to_string()
        });
        (base, handle)
    }

    fn query(page: u32) -> SignalQuery {
        SignalQuery {
            symbol: "EURUSD".into(),
            timeframe: "DAY".into(),
            page,
            limit: crate::signal::PAGE_SIZE,
        }
    }

    #[test]
    fn signals_request_carries_query_parameters() {
        let (base, server) = serve_once("200 OK", r#"{"signals":[],"summary":{"total_pages":1}}"#);
        let resp = api(&base).signals(&query(2)).unwrap();
        assert_eq!(resp.signals, Some(Vec::new()));

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /backtest/?"), "{request_line}");
        assert!(
            request_line.contains("?symbol=EURUSD&timeframe=DAY&page=2&limit=20"),
            "{request_line}"
        );
    }

    #[test]
    fn error_status_carries_service_message() {
        let (base, server) = serve_once(
            "400 Bad Request",
            r#"{"error":"Invalid symbol or timeframe: X, DAY"}"#,
        );
        let err = api(&base).signals(&query(1)).unwrap_err();
        server.join().unwrap();
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                message: "Invalid symbol or timeframe: X, DAY".into(),
            }
        );
    }

    #[test]
    fn error_status_without_body_uses_reason_phrase() {
        let (base, server) = serve_once("503 Service Unavailable", "");
        let err = api(&base).symbols().unwrap_err();
        server.join().unwrap();
        assert_eq!(
            err,
            ApiError::Status {
                status: 503,
                message: "Service Unavailable".into(),
            }
        );
    }

    #[test]
    fn unparsable_body_is_a_format_error() {
        let (base, server) = serve_once("200 OK", "<html>maintenance</html>");
        let err = api(&base).symbols().unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, ApiError::ResponseFormat(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn error_display() {
        let err = ApiError::Status {
            status: 400,
            message: "Invalid symbol or timeframe: XXX, DAY".into(),
        };
        assert_eq!(err.to_string(), "HTTP 400: Invalid symbol or timeframe: XXX, DAY");
    }
}
