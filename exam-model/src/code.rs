use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamKind {
    Theory,
    Practical,
}

impl ExamKind {
    pub const ALL: [ExamKind; 2] = [ExamKind::Theory, ExamKind::Practical];
}

impl fmt::Display for ExamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamKind::Theory => write!(f, "theory"),
            ExamKind::Practical => write!(f, "practical"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    #[default]
    NotPassed,
    Passed,
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        if passed {
            Outcome::Passed
        } else {
            Outcome::NotPassed
        }
    }
}

/// Status returned by attempt registration.
///
/// Numeric values are stable, see [`ExamCode::value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamCode {
    Ok,
    GenericError,
    TheoryNotPassed,
    InsufficientDrivingHours,
    AttemptsExhausted,
    AlreadyPassed,
}

impl ExamCode {
    pub fn value(self) -> i8 {
        match self {
            ExamCode::Ok => 0,
            ExamCode::GenericError => -1,
            ExamCode::TheoryNotPassed => -2,
            ExamCode::InsufficientDrivingHours => -3,
            ExamCode::AttemptsExhausted => -4,
            ExamCode::AlreadyPassed => -5,
        }
    }

    pub fn is_ok(self) -> bool {
        self == ExamCode::Ok
    }
}

impl fmt::Display for ExamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ExamCode::Ok => "attempt registered",
            ExamCode::GenericError => "attempt could not be registered",
            ExamCode::TheoryNotPassed => "theory exam not passed yet",
            ExamCode::InsufficientDrivingHours => "not enough driving hours completed",
            ExamCode::AttemptsExhausted => "no attempts left",
            ExamCode::AlreadyPassed => "exam already passed",
        };
        f.write_str(msg)
    }
}
