//! HTTP transport to the analysis service

use crate::config::ApiConfig;
use crate::error::TransportError;
use crate::types::upload::CSV_CONTENT_TYPE;
use crate::types::{AnalysisRequest, AnalysisResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

/// Anything that can run an analysis for the upload workflow
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, TransportError>;
}

/// Multipart `POST /analyze` client
#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    url: String,
}

impl HttpAnalysisClient {
    /// Create a client for the configured endpoint
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: config.analyze_url(),
        })
    }

    /// Get the endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Encode the request as the form the service expects
pub fn build_form(request: AnalysisRequest) -> Result<Form, TransportError> {
    let content_type = request
        .file
        .content_type
        .clone()
        .unwrap_or_else(|| CSV_CONTENT_TYPE.to_string());

    let file = Part::bytes(request.file.bytes)
        .file_name(request.file.name)
        .mime_str(&content_type)
        .map_err(|e| TransportError::Encode(e.to_string()))?;

    Ok(Form::new()
        .part("file", file)
        .text("analysisType", request.analysis_type.to_string())
        .text("detectionThreshold", request.detection_threshold.to_string())
        .text(
            "generateReport",
            if request.generate_report { "true" } else { "false" },
        ))
}

/// Decode and sanity-check a response body
pub fn decode_response(body: &[u8]) -> Result<AnalysisResponse, TransportError> {
    let response: AnalysisResponse = serde_json::from_slice(body)
        .map_err(|e| TransportError::MalformedBody(e.to_string()))?;
    response
        .check_invariants()
        .map_err(TransportError::MalformedBody)?;
    Ok(response)
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, TransportError> {
        let file_name = request.file.name.clone();
        let size = request.file.size();
        let form = build_form(request)?;

        debug!(url = %self.url, file = %file_name, size, "Posting analysis request");

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let analysis = decode_response(&body)?;

        info!(
            file = %file_name,
            total = analysis.total_transactions,
            fraud = analysis.fraud_count,
            "Analysis received"
        );
        Ok(analysis)
    }
}
