//! Results rendering: pure view models built from an analysis response.
//!
//! Nothing here touches a display surface. A rendering layer (the CLI, a
//! template, a component tree) consumes [`Dashboard`] and decides how to draw it.

pub mod filter;
pub mod format;

pub use filter::{filter_entries, Searchable};
pub use format::{format_currency, format_percentage, mask_card_number, UNKNOWN_CARD};

use crate::types::{
    AnalysisResponse, Field, FraudReason, PreventionMethod, RiskContribution, TransactionRecord,
    TransactionResult,
};

const UNKNOWN: &str = "Unknown";
const VIEW_DETAILS: &str = "View Fraud Details";

/// Headline numbers
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub total_transactions: u64,
    pub fraud_count: u64,
    pub legitimate_count: u64,
    /// e.g. `12.50%`
    pub fraud_percentage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Fraudulent,
    Legitimate,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::Fraudulent => "Fraudulent",
            Badge::Legitimate => "Legitimate",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Badge::Fraudulent => "fraud",
            Badge::Legitimate => "legitimate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLine {
    pub label: &'static str,
    pub value: String,
}

/// 0 - 100 risk gauge
#[derive(Debug, Clone, PartialEq)]
pub struct RiskMeter {
    /// Fill width, clamped to 0 - 100
    pub fill_percent: f64,
    /// e.g. `Risk Assessment (93.4%)`
    pub label: String,
}

impl RiskMeter {
    fn new(risk_score: f64) -> Self {
        let score = if risk_score.is_finite() { risk_score } else { 0.0 };
        Self {
            fill_percent: score.clamp(0.0, 100.0),
            label: format!("Risk Assessment ({score:.1}%)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonView {
    pub factor: String,
    pub details: String,
    pub severity: RiskContribution,
}

impl ReasonView {
    pub fn badge_class(&self) -> &'static str {
        self.severity.badge_class()
    }
}

impl From<&FraudReason> for ReasonView {
    fn from(reason: &FraudReason) -> Self {
        Self {
            factor: reason.factor.clone(),
            details: reason.details.clone(),
            severity: reason.risk_contribution,
        }
    }
}

/// One entry of the fraud or all-transactions list
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCard {
    pub card: String,
    pub badge: Badge,
    pub amount: String,
    pub info: Vec<InfoLine>,
    /// Present in the fraud view only
    pub risk: Option<RiskMeter>,
    pub reasons: Vec<ReasonView>,
    /// "View details" affordance for flagged entries of the all-transactions view.
    /// Carries the Transaction ID, empty when the row had none.
    pub details_id: Option<String>,
}

impl TransactionCard {
    /// Fully assessed card for the fraud view
    pub fn fraud(result: &TransactionResult) -> Self {
        Self {
            risk: Some(RiskMeter::new(result.risk_score)),
            reasons: result.reasons.iter().map(ReasonView::from).collect(),
            ..Self::header(result)
        }
    }

    /// Compact card for the all-transactions view
    pub fn summary(result: &TransactionResult) -> Self {
        let details_id = result
            .is_fraud()
            .then(|| result.transaction.transaction_id().unwrap_or_default());
        Self {
            details_id,
            ..Self::header(result)
        }
    }

    fn header(result: &TransactionResult) -> Self {
        let tx = &result.transaction;
        Self {
            card: mask_card_number(tx.get(Field::CardNumber)),
            badge: if result.is_fraud() {
                Badge::Fraudulent
            } else {
                Badge::Legitimate
            },
            amount: format_currency(tx.get(Field::Amount)),
            info: info_lines(
                tx,
                &[
                    ("Date", Field::DateTime),
                    ("Cardholder", Field::CardholderName),
                    ("Merchant", Field::MerchantName),
                    ("Location", Field::Location),
                    ("Transaction ID", Field::TransactionId),
                ],
            ),
            risk: None,
            reasons: Vec::new(),
            details_id: None,
        }
    }
}

impl Searchable for TransactionCard {
    fn search_text(&self) -> String {
        let mut parts = vec![
            self.card.clone(),
            self.badge.label().to_string(),
            self.amount.clone(),
        ];
        parts.extend(self.info.iter().map(|line| format!("{}: {}", line.label, line.value)));
        if let Some(risk) = &self.risk {
            parts.push(risk.label.clone());
            parts.push("Fraud Indicators".to_string());
        }
        for reason in &self.reasons {
            parts.push(reason.factor.clone());
            parts.push(reason.details.clone());
            parts.push(reason.severity.to_string());
        }
        if self.details_id.is_some() {
            parts.push(VIEW_DETAILS.to_string());
        }
        parts.join(" ")
    }
}

/// Modal view for one flagged transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDetails {
    pub info: Vec<InfoLine>,
    pub risk: RiskMeter,
    pub reasons: Vec<ReasonView>,
}

impl TransactionDetails {
    pub fn new(result: &TransactionResult) -> Self {
        let tx = &result.transaction;
        let mut info = info_lines(tx, &[("Transaction ID", Field::TransactionId)]);
        info.push(InfoLine {
            label: "Card Number",
            value: mask_card_number(tx.get(Field::CardNumber)),
        });
        info.push(InfoLine {
            label: "Amount",
            value: format_currency(tx.get(Field::Amount)),
        });
        info.extend(info_lines(
            tx,
            &[
                ("Date", Field::DateTime),
                ("Cardholder", Field::CardholderName),
                ("Merchant", Field::MerchantName),
                ("MCC", Field::Mcc),
                ("Location", Field::Location),
                ("Currency", Field::Currency),
                ("Card Type", Field::CardType),
            ],
        ));

        Self {
            info,
            risk: RiskMeter::new(result.risk_score),
            reasons: result.reasons.iter().map(ReasonView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedStep {
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreventionView {
    pub title: String,
    pub description: String,
    pub steps: Vec<NumberedStep>,
}

impl From<&PreventionMethod> for PreventionView {
    fn from(method: &PreventionMethod) -> Self {
        Self {
            title: method.title.clone(),
            description: method.description.clone(),
            steps: method
                .steps
                .iter()
                .enumerate()
                .map(|(i, text)| NumberedStep {
                    number: i + 1,
                    text: text.clone(),
                })
                .collect(),
        }
    }
}

/// A list view with the message shown when it has no entries
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub entries: Vec<T>,
    pub empty_message: &'static str,
}

impl<T> ListView<T> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T: Searchable> ListView<T> {
    /// Entries matching the live filter text
    pub fn filtered(&self, query: &str) -> Vec<&T> {
        filter_entries(&self.entries, query)
    }
}

/// Every view of one analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub summary: SummaryView,
    pub fraud: ListView<TransactionCard>,
    pub all: ListView<TransactionCard>,
    pub prevention: ListView<PreventionView>,
}

impl Dashboard {
    pub fn render(response: &AnalysisResponse) -> Self {
        Self {
            summary: SummaryView {
                total_transactions: response.total_transactions,
                fraud_count: response.fraud_count,
                legitimate_count: response.legitimate_count,
                fraud_percentage: format_percentage(response.fraud_percentage),
            },
            fraud: ListView {
                entries: response.fraud_results().map(TransactionCard::fraud).collect(),
                empty_message: "No fraudulent transactions detected.",
            },
            all: ListView {
                entries: response
                    .transaction_results
                    .iter()
                    .map(TransactionCard::summary)
                    .collect(),
                empty_message: "No transactions available.",
            },
            prevention: ListView {
                entries: response
                    .prevention_methods
                    .iter()
                    .map(PreventionView::from)
                    .collect(),
                empty_message: "No prevention methods available.",
            },
        }
    }
}

/// Resolve a "view details" click; unknown or empty IDs resolve to nothing
pub fn find_transaction<'a>(
    response: &'a AnalysisResponse,
    transaction_id: &str,
) -> Option<&'a TransactionResult> {
    response
        .transaction_results
        .iter()
        .find(|r| r.transaction.transaction_id().as_deref() == Some(transaction_id))
}

fn info_lines(tx: &TransactionRecord, fields: &[(&'static str, Field)]) -> Vec<InfoLine> {
    fields
        .iter()
        .map(|&(label, field)| InfoLine {
            label,
            value: tx.text(field).unwrap_or_else(|| UNKNOWN.to_string()),
        })
        .collect()
}
