//! Type definitions for the FraudShield client

pub mod analysis;
pub mod transaction;
pub mod upload;
pub mod user;

pub use analysis::{AnalysisResponse, AnalysisType, PreventionMethod, Summary};
pub use transaction::{
    Field, FraudReason, Prediction, RiskContribution, TransactionRecord, TransactionResult,
};
pub use upload::{AnalysisParams, AnalysisRequest, UploadFile};
pub use user::{PendingOtp, RegisteredUser, Session};
