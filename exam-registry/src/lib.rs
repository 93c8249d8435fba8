//! Exam registry for a driving school
//!
//! Keeps one [`Exam`] per student in an [`ExamList`], registers theory and practical
//! attempts against the configured [`Rules`], persists the list as JSON and prints reports.
//!
pub mod config;
pub mod directory;
pub mod list;
pub mod report;
pub mod store;

pub use directory::{DrivingLog, StudentDirectory};
pub use exam_model::{Exam, ExamCode, ExamKind, Outcome, StudentId};
pub use exam_utils::{
    attempt::{Penalty, Rules},
    error::Error,
};
pub use list::{AuditIssue, ExamList, Registration};
