use chrono::NaiveDate;
use exam_model::{Exam, ExamCode, ExamKind, Outcome};
use tracing::debug;

use crate::validation::validate_date;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_MIN_DRIVING_HOURS: u32 = 6;

/// Limits applied when registering attempts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Attempts allowed per exam kind
    pub max_attempts: u32,
    /// Driving hours required before the practical exam
    pub min_driving_hours: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_driving_hours: DEFAULT_MIN_DRIVING_HOURS,
        }
    }
}

/// Consequence for the student once an exam kind has no attempts left
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Penalty {
    /// Student is suspended and the first instalment is due again
    SuspendAndRepayFirstInstalment,
    /// Every instalment is due again
    RepayAllInstalments,
}

pub fn attempts_exhausted(exam: &Exam, kind: ExamKind, rules: &Rules) -> bool {
    exam.attempts(kind) >= rules.max_attempts
}

fn check_common(exam: &Exam, kind: ExamKind, rules: &Rules) -> ExamCode {
    if exam.is_passed(kind) {
        return ExamCode::AlreadyPassed;
    }
    if attempts_exhausted(exam, kind, rules) {
        return ExamCode::AttemptsExhausted;
    }
    ExamCode::Ok
}

/// Whether a theory attempt would be accepted, without recording it
pub fn check_theory_attempt(exam: &Exam, rules: &Rules) -> ExamCode {
    check_common(exam, ExamKind::Theory, rules)
}

/// Whether a practical attempt would be accepted, without recording it
pub fn check_practical_attempt(exam: &Exam, driving_hours: u32, rules: &Rules) -> ExamCode {
    let code = check_common(exam, ExamKind::Practical, rules);
    if !code.is_ok() {
        return code;
    }
    if !exam.is_theory_passed() {
        return ExamCode::TheoryNotPassed;
    }
    if driving_hours < rules.min_driving_hours {
        return ExamCode::InsufficientDrivingHours;
    }
    ExamCode::Ok
}

/// Appends the attempt. The caller has already admitted it.
fn record(exam: &mut Exam, kind: ExamKind, outcome: Outcome, date: NaiveDate) -> ExamCode {
    let sitting = exam.sitting_mut(kind);
    if validate_date(date).is_err() {
        debug!(%date, %kind, "attempt date out of range");
        return ExamCode::GenericError;
    }
    if sitting.dates.last().is_some_and(|last| date < *last) {
        debug!(%date, %kind, "attempt date precedes the previous attempt");
        return ExamCode::GenericError;
    }
    sitting.dates.push(date);
    sitting.outcome = outcome;
    ExamCode::Ok
}

/// Records a theory attempt. Any code other than [`ExamCode::Ok`] leaves `exam` untouched.
pub fn record_theory_attempt(
    exam: &mut Exam,
    outcome: Outcome,
    date: NaiveDate,
    rules: &Rules,
) -> ExamCode {
    let code = check_theory_attempt(exam, rules);
    if !code.is_ok() {
        return code;
    }
    record(exam, ExamKind::Theory, outcome, date)
}

/// Records a practical attempt. Theory must be passed and `driving_hours` must reach
/// [`Rules::min_driving_hours`]. Any code other than [`ExamCode::Ok`] leaves `exam` untouched.
pub fn record_practical_attempt(
    exam: &mut Exam,
    outcome: Outcome,
    date: NaiveDate,
    driving_hours: u32,
    rules: &Rules,
) -> ExamCode {
    let code = check_practical_attempt(exam, driving_hours, rules);
    if !code.is_ok() {
        return code;
    }
    record(exam, ExamKind::Practical, outcome, date)
}

pub fn penalty_for(exam: &Exam, kind: ExamKind, rules: &Rules) -> Option<Penalty> {
    if exam.is_passed(kind) || !attempts_exhausted(exam, kind, rules) {
        return None;
    }
    match kind {
        ExamKind::Theory => Some(Penalty::SuspendAndRepayFirstInstalment),
        ExamKind::Practical => Some(Penalty::RepayAllInstalments),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn theory_passed(id: u32) -> Exam {
        let mut exam = Exam::new(id);
        let code = record_theory_attempt(
            &mut exam,
            Outcome::Passed,
            date(10, 1, 2025),
            &Rules::default(),
        );
        assert_eq!(code, ExamCode::Ok);
        exam
    }

    #[test]
    fn failed_theory_attempts_run_out() {
        let rules = Rules::default();
        let mut exam = Exam::new(1);

        for day in 1..=2 {
            let code = record_theory_attempt(&mut exam, Outcome::NotPassed, date(day, 1, 2025), &rules);
            assert_eq!(code, ExamCode::Ok);
        }
        assert!(attempts_exhausted(&exam, ExamKind::Theory, &rules));

        let code = record_theory_attempt(&mut exam, Outcome::Passed, date(3, 1, 2025), &rules);
        assert_eq!(code, ExamCode::AttemptsExhausted);
        assert_eq!(exam.theory_attempts(), 2);
        assert!(!exam.is_theory_passed());
    }

    #[test]
    fn passed_theory_rejects_more_attempts() {
        let rules = Rules::default();
        let mut exam = theory_passed(1);

        let code = record_theory_attempt(&mut exam, Outcome::Passed, date(11, 1, 2025), &rules);
        assert_eq!(code, ExamCode::AlreadyPassed);
        assert_eq!(exam.theory_attempts(), 1);
    }

    #[test]
    fn practical_requires_theory() {
        let rules = Rules::default();
        let mut exam = Exam::new(1);
        let code = record_practical_attempt(&mut exam, Outcome::Passed, date(1, 3, 2025), 10, &rules);
        assert_eq!(code, ExamCode::TheoryNotPassed);
        assert_eq!(exam.practical_attempts(), 0);
    }

    #[test]
    fn practical_requires_driving_hours() {
        let rules = Rules::default();
        let mut exam = theory_passed(1);
        let code = record_practical_attempt(&mut exam, Outcome::Passed, date(1, 3, 2025), 5, &rules);
        assert_eq!(code, ExamCode::InsufficientDrivingHours);

        let code = record_practical_attempt(&mut exam, Outcome::Passed, date(1, 3, 2025), 6, &rules);
        assert_eq!(code, ExamCode::Ok);
        assert!(exam.is_practical_passed());
        assert_eq!(exam.attempt_date(ExamKind::Practical, 0), Some(date(1, 3, 2025)));
    }

    #[test]
    fn already_passed_wins_over_missing_hours() {
        let rules = Rules::default();
        let mut exam = theory_passed(1);
        record_practical_attempt(&mut exam, Outcome::Passed, date(1, 3, 2025), 8, &rules);

        let code = record_practical_attempt(&mut exam, Outcome::Passed, date(2, 3, 2025), 0, &rules);
        assert_eq!(code, ExamCode::AlreadyPassed);
    }

    #[test]
    fn bad_dates_are_generic_errors() {
        let rules = Rules::default();
        let mut exam = Exam::new(1);
        let code = record_theory_attempt(&mut exam, Outcome::NotPassed, date(1, 1, 1999), &rules);
        assert_eq!(code, ExamCode::GenericError);

        record_theory_attempt(&mut exam, Outcome::NotPassed, date(5, 1, 2025), &rules);
        let code = record_theory_attempt(&mut exam, Outcome::Passed, date(4, 1, 2025), &rules);
        assert_eq!(code, ExamCode::GenericError);
        assert_eq!(exam.theory_attempts(), 1);
    }

    #[test]
    fn penalties_follow_exhaustion() {
        let rules = Rules::default();
        let mut exam = Exam::new(1);
        assert_eq!(penalty_for(&exam, ExamKind::Theory, &rules), None);

        record_theory_attempt(&mut exam, Outcome::NotPassed, date(1, 1, 2025), &rules);
        assert_eq!(penalty_for(&exam, ExamKind::Theory, &rules), None);
        record_theory_attempt(&mut exam, Outcome::NotPassed, date(2, 1, 2025), &rules);
        assert_eq!(
            penalty_for(&exam, ExamKind::Theory, &rules),
            Some(Penalty::SuspendAndRepayFirstInstalment)
        );

        let mut exam = theory_passed(2);
        record_practical_attempt(&mut exam, Outcome::NotPassed, date(1, 3, 2025), 6, &rules);
        record_practical_attempt(&mut exam, Outcome::NotPassed, date(2, 3, 2025), 6, &rules);
        assert_eq!(
            penalty_for(&exam, ExamKind::Practical, &rules),
            Some(Penalty::RepayAllInstalments)
        );
    }

    #[test]
    fn pass_on_last_attempt_has_no_penalty() {
        let rules = Rules::default();
        let mut exam = Exam::new(1);
        record_theory_attempt(&mut exam, Outcome::NotPassed, date(1, 1, 2025), &rules);
        record_theory_attempt(&mut exam, Outcome::Passed, date(2, 1, 2025), &rules);
        assert_eq!(penalty_for(&exam, ExamKind::Theory, &rules), None);
    }

    proptest! {
        #[test]
        fn prop_attempts_never_exceed_max(
            max_attempts in 1u32..6,
            outcomes in prop::collection::vec(any::<bool>(), 0..12),
        ) {
            let rules = Rules { max_attempts, ..Rules::default() };
            let mut exam = Exam::new(1);
            let start = date(1, 1, 2025);

            for (i, passed) in outcomes.into_iter().enumerate() {
                let before = exam.clone();
                let day = start + chrono::Days::new(i as u64);
                let code = record_theory_attempt(&mut exam, Outcome::from(passed), day, &rules);
                if code.is_ok() {
                    prop_assert_eq!(exam.theory_attempts(), before.theory_attempts() + 1);
                } else {
                    prop_assert_eq!(&exam, &before);
                }
                prop_assert!(exam.theory_attempts() <= max_attempts);
            }
        }
    }
}
