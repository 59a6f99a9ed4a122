//! Analysis request parameters and the service response

use super::transaction::TransactionResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis mode requested from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    Standard,
    Comprehensive,
    Quick,
}

impl AnalysisType {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisType::Standard => "standard",
            AnalysisType::Comprehensive => "comprehensive",
            AnalysisType::Quick => "quick",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(AnalysisType::Standard),
            "comprehensive" => Ok(AnalysisType::Comprehensive),
            "quick" => Ok(AnalysisType::Quick),
            other => Err(format!(
                "unknown analysis type '{other}' (expected standard, comprehensive or quick)"
            )),
        }
    }
}

/// Recommended countermeasure returned with a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreventionMethod {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Headline counts of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_transactions: u64,
    pub fraud_count: u64,
    pub legitimate_count: u64,
    pub fraud_percentage: f64,
}

/// Full body returned by `POST /analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub total_transactions: u64,
    pub fraud_count: u64,
    pub legitimate_count: u64,
    pub fraud_percentage: f64,
    #[serde(default)]
    pub transaction_results: Vec<TransactionResult>,
    #[serde(default)]
    pub prevention_methods: Vec<PreventionMethod>,
}

impl AnalysisResponse {
    /// Build a consistent response from per-transaction results
    pub fn from_results(
        transaction_results: Vec<TransactionResult>,
        prevention_methods: Vec<PreventionMethod>,
    ) -> Self {
        let total_transactions = transaction_results.len() as u64;
        let fraud_count = transaction_results.iter().filter(|r| r.is_fraud()).count() as u64;

        Self {
            total_transactions,
            fraud_count,
            legitimate_count: total_transactions - fraud_count,
            fraud_percentage: fraud_percentage(fraud_count, total_transactions),
            transaction_results,
            prevention_methods,
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total_transactions: self.total_transactions,
            fraud_count: self.fraud_count,
            legitimate_count: self.legitimate_count,
            fraud_percentage: self.fraud_percentage,
        }
    }

    /// Results flagged as fraudulent, in service order
    pub fn fraud_results(&self) -> impl Iterator<Item = &TransactionResult> {
        self.transaction_results.iter().filter(|r| r.is_fraud())
    }

    /// Verify the count invariants; the error text describes the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        let counted = self.fraud_count.checked_add(self.legitimate_count);
        if counted != Some(self.total_transactions) {
            return Err(format!(
                "fraudCount ({}) + legitimateCount ({}) != totalTransactions ({})",
                self.fraud_count, self.legitimate_count, self.total_transactions
            ));
        }

        if self.transaction_results.len() as u64 != self.total_transactions {
            return Err(format!(
                "{} transaction results for totalTransactions {}",
                self.transaction_results.len(),
                self.total_transactions
            ));
        }

        let flagged = self.fraud_results().count() as u64;
        if flagged != self.fraud_count {
            return Err(format!(
                "{flagged} results flagged fraudulent but fraudCount is {}",
                self.fraud_count
            ));
        }

        // the service rounds the share to two decimals
        let expected = fraud_percentage(self.fraud_count, self.total_transactions);
        if !self.fraud_percentage.is_finite()
            || (self.fraud_percentage - expected).abs() > PERCENTAGE_TOLERANCE
        {
            return Err(format!(
                "fraudPercentage {} does not match expected {expected}",
                self.fraud_percentage
            ));
        }

        Ok(())
    }
}

/// Half a hundredth of a percent plus float slack
const PERCENTAGE_TOLERANCE: f64 = 0.005 + 1e-9;

/// `100 * fraud / total`, zero for an empty upload
pub fn fraud_percentage(fraud_count: u64, total_transactions: u64) -> f64 {
    if total_transactions == 0 {
        0.0
    } else {
        fraud_count as f64 / total_transactions as f64 * 100.0
    }
}
