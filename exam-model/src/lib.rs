use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod code;
pub mod file;

pub use code::{ExamCode, ExamKind, Outcome};
pub use file::{ExamFile, FILE_FORMAT_VERSION};

/// Identifier of a student, owned by the student registry. Valid ids are `> 0`.
pub type StudentId = u32;

/// History of one exam kind for one student.
///
/// Fields are public for serialization and test fixtures. Attempts are meant to go
/// through the registration functions, which keep dates ordered and within the attempt
/// limit; records edited by hand are checked by the registry audit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sitting {
    /// One date per attempt, in attempt order
    pub dates: Vec<NaiveDate>,
    pub outcome: Outcome,
}

impl Sitting {
    pub fn attempts(&self) -> u32 {
        u32::try_from(self.dates.len()).unwrap_or(u32::MAX)
    }

    pub fn is_passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Exam state of a single student, covering both the theory and the practical sitting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(rename = "studentId")]
    pub student_id: StudentId,
    pub theory: Sitting,
    pub practical: Sitting,
}

impl Exam {
    /// A record with zero attempts and nothing passed
    pub fn new(student_id: StudentId) -> Self {
        Exam {
            student_id,
            theory: Sitting::default(),
            practical: Sitting::default(),
        }
    }

    pub fn reset(&mut self) {
        self.theory = Sitting::default();
        self.practical = Sitting::default();
    }

    pub fn sitting(&self, kind: ExamKind) -> &Sitting {
        match kind {
            ExamKind::Theory => &self.theory,
            ExamKind::Practical => &self.practical,
        }
    }

    pub fn sitting_mut(&mut self, kind: ExamKind) -> &mut Sitting {
        match kind {
            ExamKind::Theory => &mut self.theory,
            ExamKind::Practical => &mut self.practical,
        }
    }

    pub fn attempts(&self, kind: ExamKind) -> u32 {
        self.sitting(kind).attempts()
    }

    pub fn theory_attempts(&self) -> u32 {
        self.theory.attempts()
    }

    pub fn practical_attempts(&self) -> u32 {
        self.practical.attempts()
    }

    pub fn is_passed(&self, kind: ExamKind) -> bool {
        self.sitting(kind).is_passed()
    }

    pub fn is_theory_passed(&self) -> bool {
        self.theory.is_passed()
    }

    pub fn is_practical_passed(&self) -> bool {
        self.practical.is_passed()
    }

    /// Date of the `attempt`-th attempt (0-based), if that attempt was made
    pub fn attempt_date(&self, kind: ExamKind, attempt: usize) -> Option<NaiveDate> {
        self.sitting(kind).dates.get(attempt).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_exam_has_no_history() {
        let exam = Exam::new(7);
        assert_eq!(exam.student_id, 7);
        assert_eq!(exam.theory_attempts(), 0);
        assert_eq!(exam.practical_attempts(), 0);
        assert!(!exam.is_theory_passed());
        assert!(!exam.is_practical_passed());
        assert_eq!(exam.attempt_date(ExamKind::Theory, 0), None);
    }

    #[test]
    fn attempt_date_only_for_attempts_made() {
        let mut exam = Exam::new(1);
        exam.theory.dates.push(date(3, 2, 2025));
        assert_eq!(exam.attempt_date(ExamKind::Theory, 0), Some(date(3, 2, 2025)));
        assert_eq!(exam.attempt_date(ExamKind::Theory, 1), None);
        assert_eq!(exam.attempt_date(ExamKind::Practical, 0), None);
    }

    #[test]
    fn reset_clears_both_sittings() {
        let mut exam = Exam::new(4);
        exam.theory.dates.push(date(10, 1, 2025));
        exam.theory.outcome = Outcome::Passed;
        exam.practical.dates.push(date(10, 3, 2025));

        exam.reset();

        assert_eq!(exam, Exam::new(4));
    }

    #[test]
    fn exam_serializes_with_camel_case_id() {
        let exam = Exam::new(12);
        let json = serde_json::to_value(&exam).unwrap();
        assert_eq!(json["studentId"], 12);
        assert_eq!(json["theory"]["outcome"], "NOT_PASSED");
    }
}
