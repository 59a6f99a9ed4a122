//! FraudShield client library
//!
//! Session store, input validation, simulated auth, the CSV upload and
//! analysis workflow, and view models for rendering fraud analysis results
//! returned by a remote `/analyze` endpoint.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod navigation;
pub mod notify;
pub mod render;
pub mod report;
pub mod storage;
pub mod types;
pub mod validation;
pub mod workflow;

pub use auth::AuthWorkflow;
pub use client::{AnalysisClient, HttpAnalysisClient};
pub use config::AppConfig;
pub use notify::{Notification, NotificationCenter, Notifier};
pub use render::Dashboard;
pub use report::ReportArtifact;
pub use storage::SessionStore;
pub use types::{AnalysisParams, AnalysisResponse, TransactionResult, UploadFile};
pub use workflow::{SubmissionOutcome, UploadWorkflow, WorkflowOptions};
