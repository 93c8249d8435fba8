use chrono::NaiveDate;
use exam_model::{Exam, ExamCode, ExamKind, Outcome, StudentId};
use exam_utils::{
    attempt::{self, Penalty, Rules},
    error::Error,
    validation::{validate_exam, validate_student_id},
};
use tracing::{debug, info, warn};

use crate::directory::DrivingLog;

/// Result of a full attempt registration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registration {
    pub code: ExamCode,
    /// Set when this attempt used up the last one without a pass
    pub penalty: Option<Penalty>,
}

/// A record that failed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditIssue {
    pub index: usize,
    pub student_id: StudentId,
    pub reason: String,
}

/// All exam records, in insertion order, with at most one record per student.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExamList {
    exams: Vec<Exam>,
    rules: Rules,
}

impl ExamList {
    pub fn new(rules: Rules) -> Self {
        ExamList {
            exams: Vec::new(),
            rules,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Removes every record. Rules are kept.
    pub fn clear(&mut self) {
        self.exams.clear();
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exam> {
        self.exams.iter()
    }

    pub fn find(&self, student_id: StudentId) -> Option<&Exam> {
        self.exams.iter().find(|e| e.student_id == student_id)
    }

    pub(crate) fn find_mut(&mut self, student_id: StudentId) -> Option<&mut Exam> {
        self.exams.iter_mut().find(|e| e.student_id == student_id)
    }

    pub fn get(&self, index: usize) -> Result<&Exam, Error> {
        self.exams.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.exams.len(),
        })
    }

    /// Adds an empty record for a newly enrolled student
    pub fn initialize_exam(&mut self, student_id: StudentId) -> Result<(), Error> {
        validate_student_id(student_id)?;
        if self.find(student_id).is_some() {
            return Err(Error::Duplicate(student_id));
        }
        self.exams.push(Exam::new(student_id));
        debug!(student_id, "exam record created");
        Ok(())
    }

    /// Puts an existing record back to zero attempts and nothing passed
    pub fn reset_exam(&mut self, student_id: StudentId) -> Result<(), Error> {
        let exam = self
            .find_mut(student_id)
            .ok_or(Error::NotFound(student_id))?;
        exam.reset();
        info!(student_id, "exam record reset");
        Ok(())
    }

    pub fn attempts_exhausted(&self, exam: &Exam, kind: ExamKind) -> bool {
        attempt::attempts_exhausted(exam, kind, &self.rules)
    }

    pub fn register_theory_attempt_base(
        &mut self,
        student_id: StudentId,
        outcome: Outcome,
        date: NaiveDate,
    ) -> ExamCode {
        let rules = self.rules;
        let Some(exam) = self.lookup_mut(student_id) else {
            return ExamCode::GenericError;
        };
        attempt::record_theory_attempt(exam, outcome, date, &rules)
    }

    pub fn register_practical_attempt_base(
        &mut self,
        student_id: StudentId,
        outcome: Outcome,
        date: NaiveDate,
        driving_hours: u32,
    ) -> ExamCode {
        let rules = self.rules;
        let Some(exam) = self.lookup_mut(student_id) else {
            return ExamCode::GenericError;
        };
        attempt::record_practical_attempt(exam, outcome, date, driving_hours, &rules)
    }

    /// Registers a theory attempt and reports the penalty once no attempts are left.
    pub fn register_theory_attempt(
        &mut self,
        student_id: StudentId,
        outcome: Outcome,
        date: NaiveDate,
    ) -> Registration {
        let code = self.register_theory_attempt_base(student_id, outcome, date);
        self.finish_registration(student_id, ExamKind::Theory, code)
    }

    /// Registers a practical attempt, reading completed hours from `driving_log`.
    /// A student without lessons on record counts as zero hours.
    pub fn register_practical_attempt<D>(
        &mut self,
        student_id: StudentId,
        outcome: Outcome,
        date: NaiveDate,
        driving_log: &D,
    ) -> Registration
    where
        D: DrivingLog + ?Sized,
    {
        let hours = driving_log.hours_completed(student_id).unwrap_or_else(|| {
            debug!(student_id, "no driving lessons on record");
            0
        });
        let code = self.register_practical_attempt_base(student_id, outcome, date, hours);
        self.finish_registration(student_id, ExamKind::Practical, code)
    }

    /// Checks every record and returns the incoherent ones
    pub fn audit(&self) -> Vec<AuditIssue> {
        self.exams
            .iter()
            .enumerate()
            .filter_map(|(index, exam)| {
                validate_exam(exam, &self.rules)
                    .err()
                    .map(|e| AuditIssue {
                        index,
                        student_id: exam.student_id,
                        reason: e.to_string(),
                    })
            })
            .collect()
    }

    /// Swaps in records whose ids the caller has checked for validity and uniqueness
    pub(crate) fn replace_all(&mut self, exams: Vec<Exam>) {
        self.exams = exams;
    }

    pub(crate) fn as_slice(&self) -> &[Exam] {
        &self.exams
    }

    fn lookup_mut(&mut self, student_id: StudentId) -> Option<&mut Exam> {
        if validate_student_id(student_id).is_err() {
            warn!(student_id, "invalid student id");
            return None;
        }
        let exam = self.find_mut(student_id);
        if exam.is_none() {
            warn!(student_id, "exam not found");
        }
        exam
    }

    fn finish_registration(
        &self,
        student_id: StudentId,
        kind: ExamKind,
        code: ExamCode,
    ) -> Registration {
        if !code.is_ok() {
            warn!(student_id, %kind, code = code.value(), "{code}");
            return Registration {
                code,
                penalty: None,
            };
        }

        // `find` cannot miss here: the base registration succeeded
        let Some(exam) = self.find(student_id) else {
            return Registration {
                code: ExamCode::GenericError,
                penalty: None,
            };
        };
        let attempts = exam.attempts(kind);
        if exam.is_passed(kind) {
            info!(student_id, %kind, attempts, "exam passed");
        } else {
            info!(student_id, %kind, attempts, "exam failed");
        }

        let penalty = attempt::penalty_for(exam, kind, &self.rules);
        if let Some(penalty) = penalty {
            warn!(student_id, %kind, ?penalty, "attempts exhausted");
        }
        Registration { code, penalty }
    }
}

impl<'a> IntoIterator for &'a ExamList {
    type Item = &'a Exam;
    type IntoIter = std::slice::Iter<'a, Exam>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
