//! Upload/analysis workflow.
//!
//! Owns the file selection → submission → remote analysis → results
//! pipeline. Two tasks run per submission, the network call and the
//! progress ticker, coordinated through one locked state and an epoch
//! counter. `reset()` bumps the epoch; any task finding a stale epoch
//! drops its result instead of writing it.

pub mod progress;
pub mod state;

pub use progress::{Progress, ProgressCadence, ProgressPhase};
pub use state::{WorkflowSnapshot, WorkflowState};

use crate::client::AnalysisClient;
use crate::config::AppConfig;
use crate::error::{NoResultsError, ReportError, TransportError, ValidationError, WorkflowError};
use crate::notify::{Notification, Notifier};
use crate::render::{find_transaction, Dashboard, TransactionDetails};
use crate::report::ReportArtifact;
use crate::types::{AnalysisParams, AnalysisRequest, AnalysisResponse, UploadFile};
use crate::validation::{validate_threshold, validate_upload, MAX_UPLOAD_BYTES};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Tunables of the workflow
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    pub max_file_bytes: u64,
    pub cadence: ProgressCadence,
    /// How long the completed indicator stays up before results display
    pub completion_delay: Duration,
    /// Visibility of analysis failures
    pub error_ttl: Duration,
    /// Visibility of form and download alerts
    pub alert_ttl: Duration,
}

impl WorkflowOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_file_bytes: config.upload.max_file_bytes,
            cadence: ProgressCadence {
                tick: config.progress.tick(),
                step: config.progress.step_percent,
                // 100% is shown only once a response arrives
                ceiling: config.progress.ceiling_percent.min(99),
            },
            completion_delay: config.progress.completion_delay(),
            error_ttl: config.notifications.workflow_ttl(),
            alert_ttl: config.notifications.alert_ttl(),
        }
    }
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_UPLOAD_BYTES,
            cadence: ProgressCadence::default(),
            completion_delay: Duration::from_millis(1000),
            error_ttl: Duration::from_secs(5),
            alert_ttl: Duration::from_secs(3),
        }
    }
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Results are now displayed
    Displayed,
    /// The request failed; the form is back
    Failed(TransportError),
    /// The workflow was reset before the result could be shown
    Discarded,
}

/// Handle to an in-flight submission
#[derive(Debug)]
pub struct SubmissionHandle {
    task: JoinHandle<SubmissionOutcome>,
}

impl SubmissionHandle {
    /// Wait for the submission to settle
    pub async fn outcome(self) -> SubmissionOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => SubmissionOutcome::Failed(TransportError::Network(e.to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: WorkflowState,
    progress: Option<Progress>,
    results: Option<Arc<AnalysisResponse>>,
    /// Bumped on every submission and reset
    epoch: u64,
    /// The ticker may write only while this is set
    ticking: bool,
}

pub(crate) struct Shared {
    inner: Mutex<Inner>,
    client: Arc<dyn AnalysisClient>,
    notifier: Arc<dyn Notifier>,
    options: WorkflowOptions,
    snapshots: watch::Sender<WorkflowSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(WorkflowSnapshot {
            state: inner.state,
            progress: inner.progress,
        });
    }
}

/// The upload form and results dashboard
#[derive(Clone)]
pub struct UploadWorkflow {
    shared: Arc<Shared>,
}

impl UploadWorkflow {
    pub fn new(
        client: Arc<dyn AnalysisClient>,
        notifier: Arc<dyn Notifier>,
        options: WorkflowOptions,
    ) -> Self {
        let (snapshots, _) = watch::channel(WorkflowSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::default()),
                client,
                notifier,
                options,
                snapshots,
            }),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.shared.lock().state
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let inner = self.shared.lock();
        WorkflowSnapshot {
            state: inner.state,
            progress: inner.progress,
        }
    }

    /// Receive every state and progress change
    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Current result set, if results are displayed
    pub fn results(&self) -> Option<Arc<AnalysisResponse>> {
        self.shared.lock().results.clone()
    }

    /// Rendered views of the current result set
    pub fn dashboard(&self) -> Option<Dashboard> {
        self.results().map(|results| Dashboard::render(&results))
    }

    /// "View details" for a transaction; unknown IDs resolve to nothing
    pub fn transaction_details(&self, transaction_id: &str) -> Option<TransactionDetails> {
        let results = self.results()?;
        find_transaction(&results, transaction_id).map(TransactionDetails::new)
    }

    /// Validate the form and start an analysis.
    ///
    /// Validation is synchronous and happens before any network activity.
    /// On success the request runs in the background; the returned handle
    /// resolves once it settles. Must be called within a Tokio runtime.
    pub fn submit(
        &self,
        file: Option<UploadFile>,
        params: AnalysisParams,
    ) -> Result<SubmissionHandle, WorkflowError> {
        let shared = &self.shared;
        let mut inner = shared.lock();

        if inner.state != WorkflowState::Idle {
            return Err(WorkflowError::Busy);
        }

        inner.state = WorkflowState::Validating;
        shared.publish(&inner);

        let file = match Self::validate(file, params, shared.options.max_file_bytes) {
            Ok(file) => file,
            Err(e) => {
                inner.state = WorkflowState::Idle;
                shared.publish(&inner);
                drop(inner);

                debug!(error = %e, "Upload rejected");
                shared
                    .notifier
                    .notify(Notification::error(e.to_string(), shared.options.alert_ttl));
                return Err(e.into());
            }
        };

        inner.state = WorkflowState::Submitting;
        shared.publish(&inner);

        info!(
            file = %file.name,
            size = file.size(),
            analysis_type = %params.analysis_type,
            threshold = params.detection_threshold,
            "Submitting analysis"
        );
        let request = AnalysisRequest::new(file, params);

        inner.epoch += 1;
        let epoch = inner.epoch;
        inner.state = WorkflowState::AwaitingResponse;
        inner.progress = Some(Progress::at(0));
        inner.ticking = true;
        shared.publish(&inner);
        drop(inner);

        let ticker = tokio::spawn(progress::run_ticker(
            shared.clone(),
            epoch,
            shared.options.cadence,
        ));
        let task = tokio::spawn(run_analysis(shared.clone(), epoch, request, ticker));

        Ok(SubmissionHandle { task })
    }

    fn validate(
        file: Option<UploadFile>,
        params: AnalysisParams,
        max_file_bytes: u64,
    ) -> Result<UploadFile, ValidationError> {
        validate_upload(file.as_ref(), max_file_bytes)?;
        validate_threshold(params.detection_threshold)?;
        file.ok_or(ValidationError::NoFile)
    }

    /// Drop the displayed results and show the form again.
    ///
    /// An in-flight request is left to finish; its result is discarded.
    pub fn reset(&self) {
        let mut inner = self.shared.lock();
        let previous = inner.state;

        inner.epoch += 1;
        inner.ticking = false;
        inner.state = WorkflowState::Idle;
        inner.progress = None;
        inner.results = None;
        self.shared.publish(&inner);

        info!(from = %previous, "Workflow reset");
    }

    /// Export the current results as `fraud_analysis_report.json`
    pub fn download_report(&self) -> Result<ReportArtifact, ReportError> {
        let Some(results) = self.results() else {
            self.shared.notifier.notify(Notification::error(
                NoResultsError.to_string(),
                self.shared.options.alert_ttl,
            ));
            return Err(NoResultsError.into());
        };

        ReportArtifact::build(&results).map_err(|e| ReportError::Serialize(e.to_string()))
    }
}

async fn run_analysis(
    shared: Arc<Shared>,
    epoch: u64,
    request: AnalysisRequest,
    ticker: JoinHandle<()>,
) -> SubmissionOutcome {
    // a panicking client must still hand the form back
    let client = shared.client.clone();
    let result = match tokio::spawn(async move { client.analyze(request).await }).await {
        Ok(result) => result,
        Err(e) => Err(TransportError::Network(format!("analysis task failed: {e}"))),
    };

    let response = {
        let mut inner = shared.lock();
        ticker.abort();

        if inner.epoch != epoch {
            debug!(epoch, "Discarding response for a reset analysis");
            return SubmissionOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                inner.ticking = false;
                inner.progress = Some(Progress::complete());
                shared.publish(&inner);
                response
            }
            Err(e) => {
                inner.ticking = false;
                inner.progress = None;
                inner.state = WorkflowState::Idle;
                shared.publish(&inner);
                drop(inner);

                warn!(error = %e, "Analysis failed");
                shared.notifier.notify(Notification::error(
                    format!("Error: {e}. Please try again."),
                    shared.options.error_ttl,
                ));
                return SubmissionOutcome::Failed(e);
            }
        }
    };

    tokio::time::sleep(shared.options.completion_delay).await;

    let mut inner = shared.lock();
    if inner.epoch != epoch {
        debug!(epoch, "Reset during completion delay, dropping results");
        return SubmissionOutcome::Discarded;
    }

    info!(
        total = response.total_transactions,
        fraud = response.fraud_count,
        "Displaying analysis results"
    );
    inner.results = Some(Arc::new(response));
    inner.state = WorkflowState::Displaying;
    inner.progress = None;
    shared.publish(&inner);

    SubmissionOutcome::Displayed
}
