//! Auditoría de grado: cruza los cursos requeridos de un major (o minor) con
//! el historial y las inscripciones del estudiante.
//!
//! - `finished`: requeridos con alguna nota > 2.0
//! - `in_progress`: requeridos en una fila "registered"
//! - `failed`: requeridos con alguna nota <= 2.0
//! - `still_needed`: requeridos que no están ni en `in_progress` ni en `finished`
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::{CourseId, HistoryRecord, MajorId, StudentId};
use crate::store::queries::{self, RequirementRow};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditCourse {
    pub course_name: String,
    pub title: String,
    pub credit: i64,
}

impl From<&RequirementRow> for AuditCourse {
    fn from(r: &RequirementRow) -> Self {
        AuditCourse { course_name: r.name.clone(), title: r.title.clone(), credit: r.credit }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeAudit {
    pub netid: StudentId,
    #[serde(rename = "full_name")]
    pub full_name: String,
    pub finished: Vec<AuditCourse>,
    pub in_progress: Vec<AuditCourse>,
    pub failed: Vec<AuditCourse>,
    pub still_needed: Vec<AuditCourse>,
    pub credit_earned: i64,
    pub credit_needed: i64,
    pub credit_in_progress: i64,
}

/// Arma la auditoría sin tocar la base.
pub fn build_audit(
    netid: StudentId,
    full_name: String,
    requirements: &[RequirementRow],
    history: &[HistoryRecord],
    registered: &HashSet<CourseId>,
) -> DegreeAudit {
    let passed: HashSet<CourseId> = history.iter().filter(|h| h.passed()).map(|h| h.course).collect();
    let failed_ids: HashSet<CourseId> = history.iter().filter(|h| !h.passed()).map(|h| h.course).collect();

    // orden por nombre descendente
    let mut reqs: Vec<&RequirementRow> = requirements.iter().collect();
    reqs.sort_by(|a, b| b.name.cmp(&a.name));
    reqs.dedup_by_key(|r| r.id);

    let pick = |pred: &dyn Fn(&RequirementRow) -> bool| -> Vec<AuditCourse> {
        reqs.iter().filter(|r| pred(**r)).map(|r| AuditCourse::from(*r)).collect()
    };

    let finished = pick(&|r: &RequirementRow| passed.contains(&r.id));
    let in_progress = pick(&|r: &RequirementRow| registered.contains(&r.id));
    let failed = pick(&|r: &RequirementRow| failed_ids.contains(&r.id));
    let still_needed =
        pick(&|r: &RequirementRow| !passed.contains(&r.id) && !registered.contains(&r.id));

    DegreeAudit {
        netid,
        full_name,
        credit_earned: total_credit(&finished),
        credit_needed: total_credit(&still_needed),
        credit_in_progress: total_credit(&in_progress),
        finished,
        in_progress,
        failed,
        still_needed,
    }
}

fn total_credit(courses: &[AuditCourse]) -> i64 {
    courses.iter().map(|c| c.credit).sum()
}

/// Lee lo necesario y arma la auditoría. `None` si el estudiante no existe.
pub fn degree_audit(
    conn: &Connection,
    netid: StudentId,
    major: MajorId,
    is_major: bool,
) -> Result<Option<DegreeAudit>, StoreError> {
    let Some(student) = queries::fetch_student(conn, netid)? else { return Ok(None) };
    let requirements = queries::requirement_courses(conn, major, !is_major)?;
    let history = queries::fetch_history(conn, netid)?;
    let registered = queries::registered_course_ids(conn, netid)?;
    Ok(Some(build_audit(student.netid, student.full_name, &requirements, &history, &registered)))
}
