//! Downloadable analysis report

use crate::types::{AnalysisResponse, PreventionMethod, Summary, TransactionResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const REPORT_FILE_NAME: &str = "fraud_analysis_report.json";
pub const REPORT_CONTENT_TYPE: &str = "application/json";

/// Report body: summary, flagged rows only, recommendations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport<'a> {
    pub summary: Summary,
    pub fraudulent_transactions: Vec<&'a TransactionResult>,
    pub prevention_methods: &'a [PreventionMethod],
}

impl<'a> AnalysisReport<'a> {
    pub fn from_response(response: &'a AnalysisResponse) -> Self {
        Self {
            summary: response.summary(),
            fraudulent_transactions: response.fraud_results().collect(),
            prevention_methods: &response.prevention_methods,
        }
    }
}

/// A ready-to-save file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ReportArtifact {
    pub fn build(response: &AnalysisResponse) -> serde_json::Result<Self> {
        let bytes = serde_json::to_vec_pretty(&AnalysisReport::from_response(response))?;
        Ok(Self {
            file_name: REPORT_FILE_NAME,
            content_type: REPORT_CONTENT_TYPE,
            bytes,
        })
    }

    /// Save into `dir` under the report file name, returning the full path
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Prediction, TransactionRecord};
    use serde_json::Value;

    fn row(id: &str, prediction: Prediction) -> TransactionResult {
        TransactionResult {
            transaction: TransactionRecord::default().with(Field::TransactionId, id),
            prediction,
            risk_score: 50.0,
            reasons: Vec::new(),
        }
    }

    #[test]
    fn test_report_contains_only_fraud_rows() {
        let response = AnalysisResponse::from_results(
            vec![
                row("A", Prediction::Legitimate),
                row("B", Prediction::Fraudulent),
                row("C", Prediction::Legitimate),
            ],
            vec![PreventionMethod {
                title: "Enhanced Card Security Features".to_string(),
                description: "More checks".to_string(),
                steps: vec!["Use dynamic CVV codes".to_string()],
            }],
        );

        let artifact = ReportArtifact::build(&response).unwrap();
        assert_eq!(artifact.file_name, "fraud_analysis_report.json");

        let json: Value = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(json["summary"]["totalTransactions"], 3);
        assert_eq!(json["summary"]["fraudCount"], 1);
        let fraud = json["fraudulentTransactions"].as_array().unwrap();
        assert_eq!(fraud.len(), 1);
        assert_eq!(fraud[0]["transaction"]["Transaction ID"], "B");
        assert_eq!(fraud[0]["prediction"], 1);
        assert_eq!(json["preventionMethods"][0]["steps"][0], "Use dynamic CVV codes");
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let response = AnalysisResponse::from_results(Vec::new(), Vec::new());
        let path = ReportArtifact::build(&response)
            .unwrap()
            .write_to(dir.path().join("out"))
            .unwrap();

        assert!(path.ends_with("fraud_analysis_report.json"));
        assert!(std::fs::read_to_string(path).unwrap().contains("\"summary\""));
    }
}
