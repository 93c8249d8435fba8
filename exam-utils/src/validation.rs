use chrono::{Datelike, NaiveDate};
use exam_model::{Exam, ExamKind, Sitting, StudentId};

use crate::{attempt::Rules, error::Error};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

pub fn validate_student_id(id: StudentId) -> Result<(), Error> {
    if id == 0 {
        return Err(Error::InvalidStudentId(id));
    }
    Ok(())
}

pub fn validate_date(date: NaiveDate) -> Result<(), Error> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(Error::InvalidDate(format!(
            "{date} is outside {MIN_YEAR}..={MAX_YEAR}"
        )));
    }
    Ok(())
}

/// Checks that attempts, outcome and dates of a sitting agree with each other:
/// - no more attempts than allowed
/// - passed only after at least one attempt
/// - every date in range and not earlier than the previous one
pub fn check_sitting(kind: ExamKind, sitting: &Sitting, rules: &Rules) -> Result<(), Error> {
    let attempts = sitting.attempts();
    if attempts > rules.max_attempts {
        return Err(Error::InvalidRecord(format!(
            "{kind}: {attempts} attempts exceed the maximum of {}",
            rules.max_attempts
        )));
    }
    if sitting.is_passed() && attempts == 0 {
        return Err(Error::InvalidRecord(format!(
            "{kind}: passed without any attempt"
        )));
    }
    for date in &sitting.dates {
        validate_date(*date)?;
    }
    if sitting.dates.windows(2).any(|w| w[1] < w[0]) {
        return Err(Error::InvalidRecord(format!(
            "{kind}: attempt dates are out of order"
        )));
    }
    Ok(())
}

pub fn validate_exam(exam: &Exam, rules: &Rules) -> Result<(), Error> {
    validate_student_id(exam.student_id)?;
    for kind in ExamKind::ALL {
        check_sitting(kind, exam.sitting(kind), rules).map_err(|e| match e {
            Error::InvalidRecord(msg) | Error::InvalidDate(msg) => {
                Error::InvalidRecord(format!("student {}: {msg}", exam.student_id))
            }
            other => other,
        })?;
    }
    if exam.practical_attempts() > 0 && !exam.is_theory_passed() {
        return Err(Error::InvalidRecord(format!(
            "student {}: practical attempts recorded before passing theory",
            exam.student_id
        )));
    }
    Ok(())
}

pub fn practical_prerequisites_met(exam: &Exam, driving_hours: u32, rules: &Rules) -> bool {
    exam.is_theory_passed() && driving_hours >= rules.min_driving_hours
}
