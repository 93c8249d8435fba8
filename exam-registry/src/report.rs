//! Plain-text reports of exam records.

use std::io::{self, Write};

use exam_model::{Exam, ExamKind};
use exam_utils::error::Error;

use crate::{directory::StudentDirectory, list::ExamList};

const DATE_FORMAT: &str = "%d/%m/%Y";

fn status(passed: bool) -> &'static str {
    if passed { "Passed" } else { "Not passed" }
}

fn label(kind: ExamKind) -> &'static str {
    match kind {
        ExamKind::Theory => "Theory",
        ExamKind::Practical => "Practical",
    }
}

pub fn write_exam_details<W: Write>(out: &mut W, exam: &Exam) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "--- EXAM STATUS ---")?;
    writeln!(out, "Student ID: {}", exam.student_id)?;
    for kind in ExamKind::ALL {
        let sitting = exam.sitting(kind);
        writeln!(
            out,
            "{}: {} attempt(s) - {}",
            label(kind),
            sitting.attempts(),
            status(sitting.is_passed())
        )?;
        for (n, date) in sitting.dates.iter().enumerate() {
            writeln!(
                out,
                " - {kind} attempt {}: {}",
                n + 1,
                date.format(DATE_FORMAT)
            )?;
        }
    }
    Ok(())
}

pub fn write_all_exams<W: Write>(out: &mut W, list: &ExamList) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "--- Exam list ---")?;
    if list.is_empty() {
        writeln!(out, "No exams registered.")?;
    }
    for exam in list {
        write_exam_details(out, exam)?;
    }
    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, list: &ExamList) -> io::Result<()> {
    let passed = list
        .iter()
        .filter(|e| e.is_theory_passed() && e.is_practical_passed())
        .count();
    writeln!(out, "Exam records: {}", list.len())?;
    writeln!(out, "Exams in progress: {}", list.len() - passed)?;
    writeln!(out, "Students licensed: {passed}")
}

/// Prints the exam of the student called `first_name last_name`
pub fn print_exam<W, D>(
    out: &mut W,
    list: &ExamList,
    directory: &D,
    first_name: &str,
    last_name: &str,
) -> Result<(), Error>
where
    W: Write,
    D: StudentDirectory + ?Sized,
{
    let student_id = directory
        .find_student(first_name, last_name)
        .ok_or_else(|| Error::UnknownStudent(format!("{first_name} {last_name}")))?;
    let exam = list.find(student_id).ok_or(Error::NotFound(student_id))?;
    write_exam_details(out, exam)?;
    Ok(())
}

pub fn print_exam_details(exam: &Exam) -> io::Result<()> {
    write_exam_details(&mut io::stdout().lock(), exam)
}

pub fn print_all_exams(list: &ExamList) -> io::Result<()> {
    write_all_exams(&mut io::stdout().lock(), list)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use exam_model::{Outcome, StudentId};

    use super::*;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> ExamList {
        let mut list = ExamList::default();
        list.initialize_exam(1).unwrap();
        list.initialize_exam(2).unwrap();
        list.register_theory_attempt_base(1, Outcome::NotPassed, date(3, 2, 2025));
        list.register_theory_attempt_base(1, Outcome::Passed, date(17, 2, 2025));
        list
    }

    #[test]
    fn details_list_every_attempt() {
        let list = sample();
        let mut out = Vec::new();
        write_exam_details(&mut out, list.find(1).unwrap()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Student ID: 1"));
        assert!(text.contains("Theory: 2 attempt(s) - Passed"));
        assert!(text.contains(" - theory attempt 1: 03/02/2025"));
        assert!(text.contains(" - theory attempt 2: 17/02/2025"));
        assert!(text.contains("Practical: 0 attempt(s) - Not passed"));
    }

    #[test]
    fn all_exams_in_order() {
        let list = sample();
        let mut out = Vec::new();
        write_all_exams(&mut out, &list).unwrap();
        let text = String::from_utf8(out).unwrap();

        let first = text.find("Student ID: 1").unwrap();
        let second = text.find("Student ID: 2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn empty_list_says_so() {
        let mut out = Vec::new();
        write_all_exams(&mut out, &ExamList::default()).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No exams registered."));
    }

    #[test]
    fn print_exam_resolves_student_name() {
        let list = sample();
        let mut students: HashMap<(String, String), StudentId> = HashMap::new();
        students.insert(("Luca".to_string(), "Bianchi".to_string()), 1);
        students.insert(("Anna".to_string(), "Verdi".to_string()), 9);

        let mut out = Vec::new();
        print_exam(&mut out, &list, &students, "luca", "bianchi").unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Student ID: 1"));

        let mut out = Vec::new();
        let err = print_exam(&mut out, &list, &students, "Mario", "Neri").unwrap_err();
        assert!(matches!(err, Error::UnknownStudent(_)));
        let err = print_exam(&mut out, &list, &students, "Anna", "Verdi").unwrap_err();
        assert!(matches!(err, Error::NotFound(9)));
    }
}
