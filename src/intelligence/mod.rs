//! Rule-based clinical analysis: the symptom catalog, the per-answer
//! detector, and the condition inferencer that feeds both summary tiers.

pub mod detection;
pub mod inference;
pub mod questions;
pub mod reference;
pub mod types;

pub use detection::{fold_case, SymptomDetector};
pub use inference::ConditionInferencer;
pub use questions::QuestionBank;
pub use reference::ClinicalReference;
pub use types::*;
