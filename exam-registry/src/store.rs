use std::{collections::HashSet, ffi::OsStr, path::Path};

use exam_model::{ExamFile, FILE_FORMAT_VERSION};
use exam_utils::{error::Error, validation::validate_student_id};
use tracing::{debug, info, warn};

use crate::list::ExamList;

/// Writes the whole list to `path`, replacing what was there.
///
/// The file is written next to `path` first and renamed over it, so a failed save
/// leaves the previous contents in place.
#[tracing::instrument(skip_all, fields(path = %path.display()), err(Debug))]
pub async fn save(list: &ExamList, path: &Path) -> Result<(), Error> {
    let file = ExamFile::new(list.as_slice().to_vec());
    let json = serde_json::to_vec_pretty(&file)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    if let Err(e) = tokio::fs::write(&tmp, &json).await {
        discard_tmp(&tmp).await;
        return Err(Error::file(&tmp, e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        discard_tmp(&tmp).await;
        return Err(Error::file(path, e));
    }

    info!(num = list.len(), "saved exams");
    Ok(())
}

async fn discard_tmp(tmp: &OsStr) {
    if let Err(e) = tokio::fs::remove_file(tmp).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(tmp = %Path::new(tmp).display(), "unable to remove temp file: {e}");
        }
    }
}

/// Replaces the contents of `list` with the records stored at `path`.
///
/// Nothing is applied unless the whole file parses, has the current version and
/// holds one record per valid student id, so on error `list` keeps its prior contents.
/// Records that break the list's rules still load; they are logged and left for
/// [`ExamList::audit`] to report.
#[tracing::instrument(skip_all, fields(path = %path.display()), err(Debug))]
pub async fn load(list: &mut ExamList, path: &Path) -> Result<(), Error> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::file(path, e))?;
    let file: ExamFile = serde_json::from_slice(&bytes)?;

    if file.version != FILE_FORMAT_VERSION {
        return Err(Error::Version {
            expected: FILE_FORMAT_VERSION,
            found: file.version,
        });
    }

    let mut seen = HashSet::with_capacity(file.exams.len());
    for exam in &file.exams {
        validate_student_id(exam.student_id)?;
        if !seen.insert(exam.student_id) {
            return Err(Error::Duplicate(exam.student_id));
        }
    }

    debug!(num = file.exams.len(), "loaded exams");
    list.replace_all(file.exams);
    for issue in list.audit() {
        warn!(index = issue.index, student_id = issue.student_id, "{}", issue.reason);
    }
    Ok(())
}

/// Like [`load`], but a missing file starts an empty session.
pub async fn load_or_empty(list: &mut ExamList, path: &Path) -> Result<(), Error> {
    match load(list, path).await {
        Err(e) if e.is_not_found() => {
            info!(path = %path.display(), "no saved exams found, starting empty");
            list.clear();
            Ok(())
        }
        res => res,
    }
}
