//! OneMotion drum-machine share endpoint
//!
//! The same endpoint shares a project (POST with the project as JSON body,
//! answering with a code) and looks one up (POST with `?code=`, answering
//! with the stored project). Each call is a single blocking request with a
//! timeout and no retry.

use blast_codec::{EncodedProject, StoredProject};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::ServiceConfig;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Share response did not contain a project code")]
    MissingCode,
    #[error("Invalid value for header {0}")]
    Header(&'static str),
    #[error("Failed to create runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Response from sharing a project
#[derive(Debug, Deserialize)]
struct ShareResponse {
    code: Option<String>,
}

/// Blocking client for the share endpoint
pub struct DrumMachineClient {
    client: reqwest::Client,
    endpoint: String,
    runtime: tokio::runtime::Runtime,
}

impl DrumMachineClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers(config)?)
            .build()?;

        // Create a runtime for the single async request of each call
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            runtime,
        })
    }

    /// Share a project, returning its code
    pub fn share(&self, project: &EncodedProject) -> Result<String, ServiceError> {
        self.runtime.block_on(self.share_async(project))
    }

    /// Look up a shared project by code
    pub fn fetch(&self, code: &str) -> Result<StoredProject, ServiceError> {
        self.runtime.block_on(self.fetch_async(code))
    }

    async fn share_async(&self, project: &EncodedProject) -> Result<String, ServiceError> {
        tracing::info!("Sharing project to {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(project).send().await?;
        let body = checked_body(response).await?;
        parse_share_response(&body)
    }

    async fn fetch_async(&self, code: &str) -> Result<StoredProject, ServiceError> {
        tracing::info!("Fetching project {} from {}", code, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("code", code)])
            .send()
            .await?;
        let body = checked_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn default_headers(config: &ServiceConfig) -> Result<HeaderMap, ServiceError> {
    let value = |name: &'static str, raw: &str| {
        HeaderValue::from_str(raw).map_err(|_| ServiceError::Header(name))
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ORIGIN, value("Origin", &config.origin)?);
    headers.insert(REFERER, value("Referer", &config.referer)?);
    headers.insert(USER_AGENT, value("User-Agent", &config.user_agent)?);
    Ok(headers)
}

async fn checked_body(response: reqwest::Response) -> Result<String, ServiceError> {
    let status = response.status();
    tracing::debug!("Service answered HTTP {}", status);
    if !status.is_success() {
        return Err(ServiceError::Status(status));
    }
    let body = response.text().await?;
    tracing::debug!(bytes = body.len(), "Received response body");
    Ok(body)
}

fn parse_share_response(body: &str) -> Result<String, ServiceError> {
    let response: ShareResponse = serde_json::from_str(body)?;
    response
        .code
        .filter(|code| !code.is_empty())
        .ok_or(ServiceError::MissingCode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    /// Answer a single request with a canned response.
    ///
    /// Returns the base URL to configure and a handle yielding the raw request.
    fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (base_url, handle)
    }

    /// Read the head and (per `Content-Length`) the body of one request.
    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&data[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|len| len.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if data.len() >= end + 4 + body_len {
                break;
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    fn client_for(base_url: String) -> DrumMachineClient {
        DrumMachineClient::new(&ServiceConfig {
            base_url,
            ..ServiceConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parse_share_response() {
        let code = parse_share_response(r#"{"code": "rbOc15290", "status": "ok"}"#).unwrap();
        assert_eq!(code, "rbOc15290");
    }

    #[test]
    fn test_parse_share_response_without_code() {
        assert!(matches!(
            parse_share_response(r#"{"status": "error"}"#),
            Err(ServiceError::MissingCode)
        ));
        assert!(matches!(
            parse_share_response(r#"{"code": ""}"#),
            Err(ServiceError::MissingCode)
        ));
    }

    #[test]
    fn test_parse_share_response_not_json() {
        assert!(matches!(
            parse_share_response("<html>busy</html>"),
            Err(ServiceError::Json(_))
        ));
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers(&ServiceConfig::default()).unwrap();
        assert_eq!(headers[ACCEPT], "*/*");
        assert_eq!(headers[ORIGIN], "https://www.onemotion.com");
        assert_eq!(headers[REFERER], "https://www.onemotion.com/drum-machine/");
    }

    #[test]
    fn test_invalid_header_value() {
        let config = ServiceConfig {
            origin: "bad\nvalue".to_string(),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            default_headers(&config),
            Err(ServiceError::Header("Origin"))
        ));
    }

    #[test]
    fn test_client_uses_configured_endpoint() {
        let config = ServiceConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..ServiceConfig::default()
        };
        let client = DrumMachineClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint,
            "http://127.0.0.1:1/drum-machine/share_as_link.php"
        );
    }

    #[test]
    fn test_share_posts_project() {
        let (base_url, server) = serve_once("200 OK", json!({"code": "rbOc15290"}).to_string());
        let client = client_for(base_url);

        let code = client.share(&blast_codec::encode(b"kick")).unwrap();
        assert_eq!(code, "rbOc15290");

        let request = server.join().unwrap();
        assert!(
            request.starts_with("POST /drum-machine/share_as_link.php HTTP/1.1\r\n"),
            "{}",
            request
        );
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("origin: https://www.onemotion.com\r\n"));
        assert!(request.contains(r#""sound":"forzee_kick""#));
    }

    #[test]
    fn test_share_error_status() {
        let (base_url, server) = serve_once("500 Internal Server Error", String::new());
        let client = client_for(base_url);

        let result = client.share(&blast_codec::encode(b"kick"));
        server.join().unwrap();
        match result {
            Err(ServiceError::Status(status)) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_error_status() {
        let (base_url, server) = serve_once("404 Not Found", String::new());
        let client = client_for(base_url);

        let result = client.fetch("gone");
        server.join().unwrap();
        assert!(matches!(result, Err(ServiceError::Status(status)) if status.as_u16() == 404));
    }

    #[test]
    fn test_fetch_by_code() {
        let original = b"\x89PNG\r\n\x1a\n fetched back".to_vec();
        let body = json!({
            "code": "abc",
            "content": blast_codec::encode(&original),
        });
        let (base_url, server) = serve_once("200 OK", body.to_string());
        let client = client_for(base_url);

        let project = client.fetch("abc").unwrap();
        assert_eq!(blast_codec::decode_project(&project).unwrap(), original);

        let request = server.join().unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("POST "), "{}", request_line);
        assert!(request_line.contains("?code=abc"), "{}", request_line);
    }

    #[test]
    fn test_fetch_not_a_project() {
        let (base_url, server) = serve_once("200 OK", json!({"error": "unknown"}).to_string());
        let client = client_for(base_url);

        let result = client.fetch("abc");
        server.join().unwrap();
        assert!(matches!(result, Err(ServiceError::Json(_))));
    }
}
