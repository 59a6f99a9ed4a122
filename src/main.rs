//! FraudShield CLI
//!
//! Drives the simulated account flow and uploads transaction CSVs to the
//! analysis service, printing the results dashboard.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fraudshield::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    navigation::{upload_gate, NavigationView, Page, UploadAccess},
    render::{Dashboard, TransactionCard, TransactionDetails},
    storage::{FileStore, MemoryStore},
    types::AnalysisType,
    workflow::WorkflowState,
    AnalysisParams, AuthWorkflow, HttpAnalysisClient, NotificationCenter, SessionStore,
    SubmissionOutcome, UploadFile, UploadWorkflow, WorkflowOptions,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "fraudshield")]
#[command(version, about = "FraudShield fraud analysis client", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Signup {
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm_password: String,
    },

    /// Log in with password and one-time passcode
    Login {
        email: String,

        #[arg(long)]
        password: String,

        /// Page to land on after login (e.g. upload.html)
        #[arg(long)]
        redirect: Option<String>,
    },

    /// End the current session
    Logout,

    /// Show session and navigation state
    Status {
        /// Current page, used to mark the active nav item
        #[arg(long, default_value = "index.html")]
        page: String,
    },

    /// Upload a CSV for fraud analysis
    Analyze {
        /// CSV file of transactions
        path: PathBuf,

        /// standard, comprehensive or quick
        #[arg(short, long)]
        analysis_type: Option<AnalysisType>,

        /// Detection threshold between 0 and 1
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Ask the service to generate a report (true/false)
        #[arg(long)]
        report: Option<bool>,

        /// Only show transactions matching this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Show full details of one transaction
        #[arg(long)]
        details: Option<String>,

        /// Directory to save fraud_analysis_report.json into
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_path(&cli.config)?;
    init_logging(&config)?;
    debug!(path = %cli.config.display(), "Configuration loaded");

    let persistent = FileStore::open(config.storage.local_storage_path())
        .context("Failed to open local storage")?;
    let store = SessionStore::new(Arc::new(persistent), Arc::new(MemoryStore::new()));
    let notifier = Arc::new(NotificationCenter::new());
    let auth = AuthWorkflow::new(
        store.clone(),
        notifier.clone(),
        config.notifications.workflow_ttl(),
    );

    match cli.command {
        Commands::Signup {
            email,
            password,
            confirm_password,
        } => {
            let outcome = auth.signup(&email, &password, &confirm_password)?;
            println!("{}", outcome.message);
        }

        Commands::Login {
            email,
            password,
            redirect,
        } => {
            if let Some(target) = redirect {
                auth.remember_redirect(&target)?;
            }

            let challenge = auth.login(&email, &password)?;
            println!(
                "Your OTP is: {} (In a real system, this would be sent to your email or phone)",
                challenge.code
            );

            let code = prompt("Enter OTP: ").await?;
            let sign_in = auth.verify_otp(&code)?;
            println!("{}", sign_in.outcome.message);
            if let Some(redirect) = sign_in.outcome.redirect {
                println!("Continue at {}", redirect.target);
            }
        }

        Commands::Logout => {
            let outcome = auth.logout()?;
            println!("{}", outcome.message);
        }

        Commands::Status { page } => {
            let session = auth.current_session()?;
            print_navigation(&NavigationView::derive(
                session.as_ref(),
                Page::from_path(&page),
            ));
        }

        Commands::Analyze {
            path,
            analysis_type,
            threshold,
            report,
            filter,
            details,
            out,
        } => {
            let params = AnalysisParams {
                analysis_type: analysis_type.unwrap_or(config.upload.default_analysis_type),
                detection_threshold: threshold.unwrap_or(config.upload.default_threshold),
                generate_report: report.unwrap_or(config.upload.generate_report),
            };
            let request = AnalyzeRequest {
                path,
                params,
                filter,
                details,
                out,
            };
            analyze(&config, &auth, notifier, request).await?;
        }
    }

    Ok(())
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("fraudshield={}", config.logging.level).parse()?);

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

async fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

struct AnalyzeRequest {
    path: PathBuf,
    params: AnalysisParams,
    filter: Option<String>,
    details: Option<String>,
    out: Option<PathBuf>,
}

async fn analyze(
    config: &AppConfig,
    auth: &AuthWorkflow,
    notifier: Arc<NotificationCenter>,
    request: AnalyzeRequest,
) -> Result<()> {
    let session = auth.current_session()?;
    if let UploadAccess::AuthRequired { login, signup } = upload_gate(session.as_ref()) {
        bail!(
            "Authentication Required: please log in ({}) or sign up ({}) to upload files",
            login.href(),
            signup.href()
        );
    }

    let file = UploadFile::from_path(&request.path)
        .with_context(|| format!("Failed to read {}", request.path.display()))?;

    let client = Arc::new(HttpAnalysisClient::new(&config.api)?);
    info!(url = %client.url(), "Using analysis endpoint");
    let workflow = UploadWorkflow::new(client, notifier, WorkflowOptions::from_config(config));

    let mut snapshots = workflow.subscribe();
    let progress = tokio::spawn(async move {
        let mut last = None;
        while snapshots.changed().await.is_ok() {
            let snapshot = *snapshots.borrow_and_update();
            if snapshot.state != WorkflowState::AwaitingResponse {
                continue;
            }
            if let Some(progress) = snapshot.progress.filter(|p| Some(*p) != last) {
                eprintln!("[{:>3}%] {}", progress.percent, progress.phase.label());
                last = Some(progress);
            }
        }
    });

    let handle = workflow.submit(Some(file), request.params)?;
    let outcome = handle.outcome().await;
    progress.abort();

    match outcome {
        SubmissionOutcome::Displayed => {}
        SubmissionOutcome::Failed(e) => bail!("Error: {e}. Please try again."),
        SubmissionOutcome::Discarded => bail!("Analysis was reset before results arrived"),
    }

    let dashboard = workflow
        .dashboard()
        .context("No analysis results available")?;
    print_dashboard(&dashboard, request.filter.as_deref().unwrap_or(""));

    if let Some(id) = &request.details {
        match workflow.transaction_details(id) {
            Some(details) => print_details(&details),
            None => println!("\nTransaction {id} not found"),
        }
    }

    if let Some(dir) = &request.out {
        let artifact = workflow.download_report()?;
        let path = artifact
            .write_to(dir)
            .with_context(|| format!("Failed to write report into {}", dir.display()))?;
        println!("\nReport saved to {}", path.display());
    }

    Ok(())
}

fn print_navigation(view: &NavigationView) {
    let items: Vec<String> = view
        .items
        .iter()
        .map(|item| {
            if item.active {
                format!("[{}]", item.page.label())
            } else {
                item.page.label().to_string()
            }
        })
        .collect();
    println!("{}", items.join(" | "));

    match &view.user_name {
        Some(name) => println!("Logged in as {name}"),
        None => println!("Not logged in"),
    }
    if view.show_signup {
        println!("Sign up: {}", Page::Signup.href());
    }
    if view.show_logout {
        println!("Log out: fraudshield logout");
    }
}

fn print_dashboard(dashboard: &Dashboard, filter: &str) {
    let summary = &dashboard.summary;
    println!("Total transactions: {}", summary.total_transactions);
    println!("Fraudulent:         {}", summary.fraud_count);
    println!("Legitimate:         {}", summary.legitimate_count);
    println!("Fraud rate:         {}", summary.fraud_percentage);

    println!("\n== Fraudulent Transactions ==");
    if dashboard.fraud.is_empty() {
        println!("{}", dashboard.fraud.empty_message);
    }
    for card in dashboard.fraud.filtered(filter) {
        print_card(card);
    }

    println!("\n== All Transactions ==");
    if dashboard.all.is_empty() {
        println!("{}", dashboard.all.empty_message);
    }
    for card in dashboard.all.filtered(filter) {
        print_card(card);
    }

    println!("\n== Prevention Methods ==");
    if dashboard.prevention.is_empty() {
        println!("{}", dashboard.prevention.empty_message);
    }
    for method in &dashboard.prevention.entries {
        println!("\n{}\n  {}", method.title, method.description);
        for step in &method.steps {
            println!("  {}. {}", step.number, step.text);
        }
    }
}

fn print_card(card: &TransactionCard) {
    println!("\n{}  [{}]  {}", card.card, card.badge.label(), card.amount);
    for line in &card.info {
        println!("  {}: {}", line.label, line.value);
    }
    if let Some(risk) = &card.risk {
        println!("  {}", risk.label);
    }
    if !card.reasons.is_empty() {
        println!("  Fraud Indicators:");
        for reason in &card.reasons {
            println!(
                "    - {} ({}): {}",
                reason.factor, reason.severity, reason.details
            );
        }
    }
    if let Some(id) = card.details_id.as_deref().filter(|id| !id.is_empty()) {
        println!("  View Fraud Details: --details {id}");
    }
}

fn print_details(details: &TransactionDetails) {
    println!("\n== Transaction Details ==");
    for line in &details.info {
        println!("{}: {}", line.label, line.value);
    }
    println!("{}", details.risk.label);
    for reason in &details.reasons {
        println!("- {} ({}): {}", reason.factor, reason.severity, reason.details);
    }
}
