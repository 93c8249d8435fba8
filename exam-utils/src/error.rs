use std::path::PathBuf;

use exam_model::{ExamCode, StudentId};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid student id: {0}")]
    InvalidStudentId(StudentId),
    #[error("no exam for student {0}")]
    NotFound(StudentId),
    #[error("exam for student {0} already exists")]
    Duplicate(StudentId),
    #[error("index {index} out of range for {len} exams")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{0}")]
    InvalidDate(String),
    #[error("{0}")]
    InvalidRecord(String),
    #[error("unsupported exam file version {found}, expected {expected}")]
    Version { expected: u32, found: u32 },
    #[error("no student named {0}")]
    UnknownStudent(String),
    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    // Froms
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::File {
            path: path.into(),
            source,
        }
    }

    /// Status code reported to callers that branch on [`ExamCode`]
    pub fn code(&self) -> ExamCode {
        ExamCode::GenericError
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Error::File { source, .. } | Error::Io(source) => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
