//! Blocking client for a Tika server's recursive metadata endpoint
//!
//! `POST /rmeta/form/text` takes the file as a multipart upload and answers
//! with a JSON array holding one metadata object for the file and one for
//! every embedded resource inside it.

use crate::error::SourceError;
use crate::source::MetadataSource;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const MAX_EMBEDDED_RESOURCES: &str = "maxEmbeddedResources";
const SKIP_OCR: &str = "X-Tika-OCRskipOcr";

#[derive(Debug, Clone)]
pub struct TikaConfig {
    /// Server root, e.g. `http://localhost:9998`
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Sent as `maxEmbeddedResources`; `Some(0)` keeps Tika from descending
    /// into attachments, `None` leaves the server default
    pub max_embedded_resources: Option<u32>,

    /// Sent as `X-Tika-OCRskipOcr: true`
    pub skip_ocr: bool,
}

impl Default for TikaConfig {
    fn default() -> Self {
        TikaConfig {
            base_url: String::from("http://localhost:9998"),
            timeout: Duration::from_secs(60),
            max_embedded_resources: Some(0),
            skip_ocr: true,
        }
    }
}

pub struct TikaClient {
    client: Client,
    endpoint: String,
    max_embedded_resources: Option<u32>,
    skip_ocr: bool,
}

impl TikaClient {
    pub fn new(config: TikaConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!(
            "{}/rmeta/form/text",
            config.base_url.trim_end_matches('/')
        );

        Ok(TikaClient {
            client,
            endpoint,
            max_embedded_resources: config.max_embedded_resources,
            skip_ocr: config.skip_ocr,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload a document and return the metadata JSON text
    pub fn extract(&self, file_name: &str, document: Vec<u8>) -> Result<String, SourceError> {
        let part = Part::bytes(document).file_name(file_name.to_string());
        let form = Form::new().part(file_name.to_string(), part);

        let response = self
            .with_options(self.client.post(&self.endpoint))
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text()?)
    }

    fn with_options(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(limit) = self.max_embedded_resources {
            request = request.header(MAX_EMBEDDED_RESOURCES, limit.to_string());
        }
        if self.skip_ocr {
            request = request.header(SKIP_OCR, "true");
        }
        request
    }
}

impl MetadataSource for TikaClient {
    fn fetch(&self, path: &Path) -> Result<String, SourceError> {
        let document = std::fs::read(path).map_err(|e| SourceError::io(path, e))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document");

        debug!(path = %path.display(), bytes = document.len(), "sending file to tika");
        self.extract(file_name, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(base_url: String) -> TikaClient {
        TikaClient::new(TikaConfig {
            base_url,
            timeout: Duration::from_secs(5),
            ..TikaConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = client_for("http://tika.local:9998/".to_string());
        assert_eq!(client.endpoint(), "http://tika.local:9998/rmeta/form/text");
    }

    #[test]
    fn test_extract_uploads_document_with_tika_options() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/rmeta/form/text")
                .header("accept", "application/json")
                .header("maxembeddedresources", "0")
                .header("x-tika-ocrskipocr", "true")
                .body_includes("filename=\"report.pdf\"")
                .body_includes("hello world");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"dc:title":"Hello"}]"#);
        });

        let client = client_for(server.base_url());
        let text = client.extract("report.pdf", b"hello world".to_vec()).unwrap();

        mock.assert();
        assert_eq!(text, r#"[{"dc:title":"Hello"}]"#);
    }

    #[test]
    fn test_options_can_be_switched_off() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/rmeta/form/text")
                .header_missing("maxembeddedresources")
                .header_missing("x-tika-ocrskipocr");
            then.status(200).body("[]");
        });

        let client = TikaClient::new(TikaConfig {
            base_url: server.base_url(),
            timeout: Duration::from_secs(5),
            max_embedded_resources: None,
            skip_ocr: false,
        })
        .unwrap();

        assert_eq!(client.extract("a.txt", b"x".to_vec()).unwrap(), "[]");
        mock.assert();
    }

    #[test]
    fn test_fetch_sends_file_contents() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/rmeta/form/text")
                .body_includes("filename=\"notes.txt\"")
                .body_includes("quarterly numbers");
            then.status(200).body(r#"[{"Content-Type":"text/plain"}]"#);
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "quarterly numbers").unwrap();

        let text = client_for(server.base_url()).fetch(&path).unwrap();

        mock.assert();
        assert_eq!(text, r#"[{"Content-Type":"text/plain"}]"#);
    }

    #[test]
    fn test_extract_reports_error_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/rmeta/form/text");
            then.status(422).body("parse failure");
        });

        let client = client_for(server.base_url());
        match client.extract("broken.bin", b"broken".to_vec()).unwrap_err() {
            SourceError::Status { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, "parse failure");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        mock.assert();
    }
}
