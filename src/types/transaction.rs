//! Per-transaction results returned by the analysis service

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Known CSV columns of an uploaded transaction.
///
/// The service echoes every uploaded column back, so a record may carry
/// columns outside this set; those are preserved but never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CardNumber,
    Amount,
    DateTime,
    CardholderName,
    MerchantName,
    Mcc,
    Location,
    Currency,
    CardType,
    TransactionId,
}

impl Field {
    /// Column name as it appears in the CSV header
    pub fn column(self) -> &'static str {
        match self {
            Field::CardNumber => "Card Number",
            Field::Amount => "Transaction Amount",
            Field::DateTime => "Transaction Date and Time",
            Field::CardholderName => "Cardholder Name",
            Field::MerchantName => "Merchant Name",
            Field::Mcc => "Merchant Category Code (MCC)",
            Field::Location => "Transaction Location (City or ZIP Code)",
            Field::Currency => "Transaction Currency",
            Field::CardType => "Card Type",
            Field::TransactionId => "Transaction ID",
        }
    }

    /// Short header names accepted when the long column is absent
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::DateTime => &["Date"],
            Field::Mcc => &["MCC"],
            Field::Location => &["Location"],
            Field::Currency => &["Currency"],
            _ => &[],
        }
    }

    pub const ALL: [Field; 10] = [
        Field::CardNumber,
        Field::Amount,
        Field::DateTime,
        Field::CardholderName,
        Field::MerchantName,
        Field::Mcc,
        Field::Location,
        Field::Currency,
        Field::CardType,
        Field::TransactionId,
    ];
}

/// A single uploaded CSV row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(Map<String, Value>);

impl TransactionRecord {
    pub fn new(columns: Map<String, Value>) -> Self {
        Self(columns)
    }

    /// Builder helper, mostly for tests and sample data
    pub fn with(mut self, field: Field, value: impl Into<Value>) -> Self {
        self.0.insert(field.column().to_string(), value.into());
        self
    }

    /// Raw value of a known column, falling back to its aliases. Nulls read as absent.
    pub fn get(&self, field: Field) -> Option<&Value> {
        std::iter::once(field.column())
            .chain(field.aliases().iter().copied())
            .filter_map(|column| self.0.get(column))
            .find(|value| !value.is_null())
    }

    /// Display text of a column; `None` for absent, null, empty or structured values.
    pub fn text(&self, field: Field) -> Option<String> {
        match self.get(field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn transaction_id(&self) -> Option<String> {
        self.text(Field::TransactionId)
    }

    pub fn columns(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Model verdict for a transaction, `0` or `1` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Prediction {
    Legitimate,
    Fraudulent,
}

impl TryFrom<u8> for Prediction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Prediction::Legitimate),
            1 => Ok(Prediction::Fraudulent),
            other => Err(format!("prediction must be 0 or 1, got {other}")),
        }
    }
}

impl From<Prediction> for u8 {
    fn from(prediction: Prediction) -> Self {
        match prediction {
            Prediction::Legitimate => 0,
            Prediction::Fraudulent => 1,
        }
    }
}

/// How much a single factor contributed to a fraud verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskContribution {
    Low,
    Medium,
    High,
}

impl RiskContribution {
    /// Classify a model fraud probability (0.0 - 1.0) the way the service labels its score reason
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.9 {
            RiskContribution::High
        } else if probability > 0.7 {
            RiskContribution::Medium
        } else {
            RiskContribution::Low
        }
    }

    /// Lowercase key used to style severity badges
    pub fn badge_class(self) -> &'static str {
        match self {
            RiskContribution::Low => "low",
            RiskContribution::Medium => "medium",
            RiskContribution::High => "high",
        }
    }
}

impl fmt::Display for RiskContribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskContribution::Low => "Low",
            RiskContribution::Medium => "Medium",
            RiskContribution::High => "High",
        };
        f.write_str(label)
    }
}

/// One explanation attached to a flagged transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudReason {
    pub factor: String,
    pub details: String,
    pub risk_contribution: RiskContribution,
}

/// Analysis outcome for one uploaded row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub transaction: TransactionRecord,
    pub prediction: Prediction,
    /// Fraud risk on a 0 - 100 scale
    pub risk_score: f64,
    #[serde(default)]
    pub reasons: Vec<FraudReason>,
}

impl TransactionResult {
    pub fn is_fraud(&self) -> bool {
        self.prediction == Prediction::Fraudulent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_deserializes_service_shape() {
        let raw = json!({
            "transaction": {
                "Card Number": "4111111111111111",
                "Transaction Amount": 6200.0,
                "Transaction ID": "T-1",
                "Risk Segment": "retail"
            },
            "prediction": 1,
            "risk_score": 93.4,
            "reasons": [
                {"factor": "High Transaction Amount", "details": "too high", "risk_contribution": "High"}
            ]
        });

        let result: TransactionResult = serde_json::from_value(raw).unwrap();
        assert!(result.is_fraud());
        assert_eq!(result.transaction.transaction_id().as_deref(), Some("T-1"));
        assert_eq!(result.reasons[0].risk_contribution, RiskContribution::High);
        // unknown columns survive
        assert_eq!(result.transaction.columns()["Risk Segment"], json!("retail"));
    }

    #[test]
    fn test_prediction_rejects_out_of_range() {
        let raw = json!({"transaction": {}, "prediction": 2, "risk_score": 1.0});
        assert!(serde_json::from_value::<TransactionResult>(raw).is_err());
    }

    #[test]
    fn test_field_aliases() {
        let record: TransactionRecord =
            serde_json::from_value(json!({"Location": "Austin", "MCC": 5411, "Date": null}))
                .unwrap();

        assert_eq!(record.text(Field::Location).as_deref(), Some("Austin"));
        assert_eq!(record.text(Field::Mcc).as_deref(), Some("5411"));
        assert_eq!(record.text(Field::DateTime), None);
    }

    #[test]
    fn test_risk_contribution_from_probability() {
        assert_eq!(RiskContribution::from_probability(0.95), RiskContribution::High);
        assert_eq!(RiskContribution::from_probability(0.9), RiskContribution::Medium);
        assert_eq!(RiskContribution::from_probability(0.75), RiskContribution::Medium);
        assert_eq!(RiskContribution::from_probability(0.7), RiskContribution::Low);
        assert_eq!(RiskContribution::High.badge_class(), "high");
    }
}
