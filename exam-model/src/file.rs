use serde::{Deserialize, Serialize};

use crate::Exam;

pub const FILE_FORMAT_VERSION: u32 = 1;

/// On-disk envelope of the exam list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamFile {
    pub version: u32,
    pub exams: Vec<Exam>,
}

impl ExamFile {
    pub fn new(exams: Vec<Exam>) -> Self {
        ExamFile {
            version: FILE_FORMAT_VERSION,
            exams,
        }
    }
}
