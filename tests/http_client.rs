//! End-to-end tests against a stub `/analyze` service

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use fraudshield::client::{AnalysisClient, HttpAnalysisClient};
use fraudshield::config::ApiConfig;
use fraudshield::error::TransportError;
use fraudshield::types::{AnalysisParams, AnalysisRequest, AnalysisType, UploadFile};
use fraudshield::workflow::{ProgressCadence, WorkflowState};
use fraudshield::{NotificationCenter, SubmissionOutcome, UploadWorkflow, WorkflowOptions};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CSV: &[u8] = b"Transaction ID,Card Number,Transaction Amount\nTX1,4111111111111111,1234.5\nTX2,5500000000000004,12\n";

#[derive(Debug, Clone)]
struct Received {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    fields: Arc<Mutex<HashMap<String, Received>>>,
}

async fn analyze(State(stub): State<Stub>, mut multipart: Multipart) -> Response {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let received = Received {
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            bytes: field.bytes().await.unwrap().to_vec(),
        };
        stub.fields.lock().unwrap().insert(name, received);
    }

    (
        stub.status,
        [("content-type", "application/json")],
        stub.body.clone(),
    )
        .into_response()
}

async fn serve(stub: Stub) -> String {
    let app = Router::new()
        .route("/analyze", post(analyze))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn stub(status: StatusCode, body: String) -> Stub {
    Stub {
        status,
        body,
        fields: Arc::new(Mutex::new(HashMap::new())),
    }
}

fn analysis_body() -> Value {
    json!({
        "totalTransactions": 2,
        "fraudCount": 1,
        "legitimateCount": 1,
        "fraudPercentage": 50.0,
        "transactionResults": [
            {
                "transaction": {
                    "Transaction ID": "TX1",
                    "Card Number": "4111111111111111",
                    "Transaction Amount": 1234.5,
                    "Device": "unknown-column"
                },
                "prediction": 1,
                "risk_score": 93.4,
                "reasons": [
                    {
                        "factor": "GMM Model Score",
                        "details": "Transaction has a fraud probability of 93.4%",
                        "risk_contribution": "High"
                    }
                ]
            },
            {
                "transaction": {
                    "Transaction ID": "TX2",
                    "Card Number": "5500000000000004",
                    "Transaction Amount": "12"
                },
                "prediction": 0,
                "risk_score": 4.1
            }
        ],
        "preventionMethods": [
            {
                "title": "Two-factor authentication",
                "description": "Confirm high value purchases out of band",
                "steps": ["Enroll cardholders", "Challenge risky payments"]
            }
        ]
    })
}

fn api_config(base_url: String) -> ApiConfig {
    ApiConfig {
        base_url,
        timeout_secs: 5,
        ..ApiConfig::default()
    }
}

fn upload() -> UploadFile {
    UploadFile::new("tx.csv", Some("text/csv"), CSV.to_vec())
}

fn fast_options() -> WorkflowOptions {
    WorkflowOptions {
        cadence: ProgressCadence {
            tick: Duration::from_millis(5),
            ..ProgressCadence::default()
        },
        completion_delay: Duration::from_millis(20),
        ..WorkflowOptions::default()
    }
}

#[tokio::test]
async fn test_posts_multipart_form_and_decodes_response() {
    let stub = stub(StatusCode::OK, analysis_body().to_string());
    let fields = stub.fields.clone();
    let client = HttpAnalysisClient::new(&api_config(serve(stub).await)).unwrap();

    let params = AnalysisParams {
        analysis_type: AnalysisType::Comprehensive,
        detection_threshold: 0.85,
        generate_report: false,
    };
    let response = client
        .analyze(AnalysisRequest::new(upload(), params))
        .await
        .unwrap();

    assert_eq!(response.total_transactions, 2);
    assert_eq!(response.fraud_results().count(), 1);
    assert_eq!(response.prevention_methods[0].steps.len(), 2);
    assert!(response.transaction_results[1].reasons.is_empty());

    let fields = fields.lock().unwrap();
    let file = &fields["file"];
    assert_eq!(file.file_name.as_deref(), Some("tx.csv"));
    assert_eq!(file.content_type.as_deref(), Some("text/csv"));
    assert_eq!(file.bytes, CSV);
    assert_eq!(fields["analysisType"].bytes, b"comprehensive");
    assert_eq!(fields["detectionThreshold"].bytes, b"0.85");
    assert_eq!(fields["generateReport"].bytes, b"false");
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let stub = stub(StatusCode::INTERNAL_SERVER_ERROR, "{}".to_string());
    let client = HttpAnalysisClient::new(&api_config(serve(stub).await)).unwrap();

    let err = client
        .analyze(AnalysisRequest::new(upload(), AnalysisParams::default()))
        .await
        .unwrap_err();
    assert_eq!(err, TransportError::Status(500));
    assert_eq!(err.to_string(), "HTTP error 500");
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected() {
    let mut inconsistent = analysis_body();
    inconsistent["legitimateCount"] = json!(5);

    for body in ["not json".to_string(), inconsistent.to_string()] {
        let client = HttpAnalysisClient::new(&api_config(serve(stub(StatusCode::OK, body)).await))
            .unwrap();
        let err = client
            .analyze(AnalysisRequest::new(upload(), AnalysisParams::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::MalformedBody(_)), "{err:?}");
    }
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpAnalysisClient::new(&api_config(format!("http://{addr}"))).unwrap();
    let err = client
        .analyze(AnalysisRequest::new(upload(), AnalysisParams::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn test_workflow_displays_results_and_saves_report() {
    let base_url = serve(stub(StatusCode::OK, analysis_body().to_string())).await;
    let client = Arc::new(HttpAnalysisClient::new(&api_config(base_url)).unwrap());
    let center = Arc::new(NotificationCenter::new());
    let workflow = UploadWorkflow::new(client, center, fast_options());

    let handle = workflow.submit(Some(upload()), AnalysisParams::default()).unwrap();
    assert_eq!(handle.outcome().await, SubmissionOutcome::Displayed);
    assert_eq!(workflow.state(), WorkflowState::Displaying);

    let dashboard = workflow.dashboard().unwrap();
    assert_eq!(dashboard.summary.fraud_percentage, "50.00%");
    assert_eq!(dashboard.fraud.len(), 1);
    assert_eq!(dashboard.fraud.entries[0].card, "**** **** **** 1111");
    assert_eq!(dashboard.fraud.entries[0].amount, "$1,234.50");
    assert_eq!(dashboard.all.entries[1].amount, "$12.00");
    assert_eq!(dashboard.all.filtered("legitimate").len(), 1);

    let details = workflow.transaction_details("TX1").unwrap();
    assert_eq!(details.risk.label, "Risk Assessment (93.4%)");

    let dir = tempfile::tempdir().unwrap();
    let path = workflow.download_report().unwrap().write_to(dir.path()).unwrap();
    assert!(path.ends_with("fraud_analysis_report.json"));

    let report: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(report["summary"]["totalTransactions"], 2);
    let flagged = report["fraudulentTransactions"].as_array().unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0]["transaction"]["Device"], "unknown-column");
    assert_eq!(report["preventionMethods"][0]["title"], "Two-factor authentication");
}

#[tokio::test]
async fn test_workflow_failure_returns_to_form() {
    let base_url = serve(stub(StatusCode::BAD_GATEWAY, String::new())).await;
    let client = Arc::new(HttpAnalysisClient::new(&api_config(base_url)).unwrap());
    let center = Arc::new(NotificationCenter::new());
    let workflow = UploadWorkflow::new(client, center.clone(), fast_options());

    let handle = workflow.submit(Some(upload()), AnalysisParams::default()).unwrap();
    assert_eq!(
        handle.outcome().await,
        SubmissionOutcome::Failed(TransportError::Status(502))
    );
    assert!(workflow.snapshot().form_visible());
    assert_eq!(workflow.snapshot().progress, None);
    assert_eq!(
        center.latest().unwrap().message,
        "Error: HTTP error 502. Please try again."
    );
}
