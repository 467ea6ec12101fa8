use std::path::Path;
use std::time::Duration;

use reqwest::{multipart, Response};
use scanner_logging::{scanner_debug, scanner_info};
use url::Url;

use crate::wire::{self, ApiSearchResult, ApiSource, SearchRequest};
use crate::{ApiError, FailureKind, SourceCollection};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` leaves slow searches to the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The backend operations the client consumes.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn upload_csv(&self, path: &Path) -> Result<(), ApiError>;

    async fn search_media(&self, query: &str) -> Result<Vec<ApiSearchResult>, ApiError>;

    async fn list_sources(&self, collection: SourceCollection) -> Result<Vec<ApiSource>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        // A trailing slash makes `Url::join` append instead of replacing the
        // last path segment.
        let mut base = settings.base_url.trim().trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{base}: {err}")))?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{path}: {err}")))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn upload_csv(&self, path: &Path) -> Result<(), ApiError> {
        let url = self.endpoint("upload-csv")?;
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ApiError::new(FailureKind::FileRead, format!("{}: {err}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        scanner_info!("uploading {} ({} bytes) to {}", file_name, bytes.len(), url);

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(map_reqwest_error)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        // Success body carries nothing the client needs.
        ensure_success(response).await?;
        Ok(())
    }

    async fn search_media(&self, query: &str) -> Result<Vec<ApiSearchResult>, ApiError> {
        let url = self.endpoint("search-media")?;
        scanner_info!("searching {} query_len={}", url, query.len());

        let response = self
            .client
            .post(url)
            .json(&SearchRequest { query })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        let results = wire::decode_search_results(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        scanner_debug!("search returned {} results", results.len());
        Ok(results)
    }

    async fn list_sources(&self, collection: SourceCollection) -> Result<Vec<ApiSource>, ApiError> {
        let url = self.endpoint(collection.endpoint())?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        let sources = wire::decode_sources(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        scanner_debug!("{} returned {} sources", collection.endpoint(), sources.len());
        Ok(sources)
    }
}

/// Turns a non-2xx response into an error, keeping the backend's `detail`.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(
        ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
            .with_detail(wire::extract_detail(&body)),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
