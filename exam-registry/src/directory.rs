//! Lookups answered by the other school registries.

use std::collections::HashMap;

use exam_model::StudentId;

/// Driving lessons completed per student
pub trait DrivingLog {
    /// `None` when the student has no lessons on record
    fn hours_completed(&self, student_id: StudentId) -> Option<u32>;
}

impl DrivingLog for HashMap<StudentId, u32> {
    fn hours_completed(&self, student_id: StudentId) -> Option<u32> {
        self.get(&student_id).copied()
    }
}

impl<F> DrivingLog for F
where
    F: Fn(StudentId) -> Option<u32>,
{
    fn hours_completed(&self, student_id: StudentId) -> Option<u32> {
        self(student_id)
    }
}

/// Resolves a student's name to their id
pub trait StudentDirectory {
    fn find_student(&self, first_name: &str, last_name: &str) -> Option<StudentId>;
}

/// Keyed by `(first_name, last_name)`, matched ignoring case
impl StudentDirectory for HashMap<(String, String), StudentId> {
    fn find_student(&self, first_name: &str, last_name: &str) -> Option<StudentId> {
        self.iter()
            .find(|((first, last), _)| {
                first.eq_ignore_ascii_case(first_name) && last.eq_ignore_ascii_case(last_name)
            })
            .map(|(_, id)| *id)
    }
}

impl<F> StudentDirectory for F
where
    F: Fn(&str, &str) -> Option<StudentId>,
{
    fn find_student(&self, first_name: &str, last_name: &str) -> Option<StudentId> {
        self(first_name, last_name)
    }
}
