use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::collections::{BTreeMap, HashSet};

use crate::error::StoreError;
use crate::models::views::{
    CapacityView, CartItem, CartSectionView, CartView, CourseDetail, CourseFilter, CourseSummary,
    HistoryEntry, HistoryView, LectureView, PrerequisiteName, QuizView,
};
use crate::models::{
    Capacity, Course, CourseId, DayCode, HistoryRecord, Interval, MajorId, PendingEntry,
    RegistrationStatus, Section, SectionId, SectionKind, Student, StudentId,
};
use crate::registration::RegistrationSnapshot;
use crate::store::db::value_as_text;

/// Trimestres que muestra `/history`, en el orden del front-end.
pub const HISTORY_QUARTERS: [&str; 3] = ["winter", "autumn", "spring"];

/// Fila cruda de `lectures` / `quizzes` antes de validar.
struct RawSection {
    id: i64,
    name: String,
    parent: i64,
    capacity: i64,
    current_enroll: i64,
    start: i64,
    end: i64,
    day: Value,
}

impl RawSection {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSection> {
        Ok(RawSection {
            id: row.get(0)?,
            name: row.get(1)?,
            parent: row.get(2)?,
            capacity: row.get(3)?,
            current_enroll: row.get(4)?,
            start: row.get(5)?,
            end: row.get(6)?,
            day: row.get(7)?,
        })
    }

    fn into_section(self, kind: SectionKind, table: &'static str) -> Result<Section, StoreError> {
        let id = self.id;
        let bad = |what: &str| StoreError::malformed(table, format!("id {}: {}", id, what));

        let capacity = Capacity::from_db(self.capacity).ok_or_else(|| bad("capacity"))?;
        let current_enroll = u32::try_from(self.current_enroll).map_err(|_| bad("current_enroll"))?;
        let start = u32::try_from(self.start).map_err(|_| bad("start_time"))?;
        let end = u32::try_from(self.end).map_err(|_| bad("end_time"))?;
        if end < start {
            return Err(bad("end_time before start_time"));
        }
        let day = value_as_text(self.day)
            .and_then(|d| DayCode::parse(&d))
            .ok_or_else(|| bad("day_in_week"))?;

        Ok(Section {
            id,
            kind,
            name: self.name,
            parent: self.parent,
            capacity,
            current_enroll,
            schedule: Interval::new(start, end, day),
        })
    }
}

const LECTURE_COLUMNS: &str =
    "lectureid, section_name, course, capacity, current_enroll, start_time, end_time, day_in_week";
const QUIZ_COLUMNS: &str =
    "quizid, section_name, lecture, capacity, current_enroll, start_time, end_time, day_in_week";

pub fn fetch_lecture(conn: &Connection, id: SectionId) -> Result<Option<Section>, StoreError> {
    let sql = format!("SELECT {} FROM lectures WHERE lectureid = ?1", LECTURE_COLUMNS);
    let raw = conn.query_row(&sql, params![id], RawSection::from_row).optional()?;
    raw.map(|r| r.into_section(SectionKind::Lecture, "lectures")).transpose()
}

pub fn fetch_quiz(conn: &Connection, id: SectionId) -> Result<Option<Section>, StoreError> {
    let sql = format!("SELECT {} FROM quizzes WHERE quizid = ?1", QUIZ_COLUMNS);
    let raw = conn.query_row(&sql, params![id], RawSection::from_row).optional()?;
    raw.map(|r| r.into_section(SectionKind::Quiz, "quizzes")).transpose()
}

pub fn fetch_prerequisites(conn: &Connection, course: CourseId) -> Result<Vec<CourseId>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT pre_course_id FROM prerequisites WHERE pre_course_id IS NOT NULL AND course_id = ?1",
    )?;
    let rows = stmt.query_map(params![course], |row| row.get::<_, i64>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn fetch_course(conn: &Connection, id: CourseId) -> Result<Option<Course>, StoreError> {
    let raw = conn
        .query_row(
            "SELECT courseid, course_name, major, credit FROM courses WHERE courseid = ?1",
            params![id],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, i64>(2)?, row.get::<_, i64>(3)?)),
        )
        .optional()?;
    let Some((id, name, major, credit)) = raw else { return Ok(None) };
    let credit = u32::try_from(credit)
        .ok()
        .filter(|c| *c > 0)
        .ok_or_else(|| StoreError::malformed("courses", format!("id {}: credit {}", id, credit)))?;
    let prerequisites = fetch_prerequisites(conn, id)?;
    Ok(Some(Course { id, name, major, credit, prerequisites }))
}

pub fn fetch_student(conn: &Connection, netid: StudentId) -> Result<Option<Student>, StoreError> {
    let student = conn
        .query_row(
            "SELECT netid, full_name, major FROM students WHERE netid = ?1",
            params![netid],
            |row| Ok(Student { netid: row.get(0)?, full_name: row.get(1)?, major: row.get(2)? }),
        )
        .optional()?;
    Ok(student)
}

/// `minor = true` lee `minorrequirements`.
pub fn fetch_requirements(conn: &Connection, major: MajorId, minor: bool) -> Result<Vec<CourseId>, StoreError> {
    let table = if minor { "minorrequirements" } else { "majorrequirements" };
    let sql = format!("SELECT course_id FROM {} WHERE major_id = ?1", table);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![major], |row| row.get::<_, i64>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn fetch_history(conn: &Connection, netid: StudentId) -> Result<Vec<HistoryRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT course_id, grade, school_year, school_quarter FROM history WHERE student_id = ?1",
    )?;
    let rows = stmt.query_map(params![netid], |row| {
        Ok(HistoryRecord {
            course: row.get(0)?,
            grade: row.get(1)?,
            school_year: row.get(2)?,
            school_quarter: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Filas de `nextquarter` del estudiante, resueltas a cátedra + quiz + curso.
/// `status = None` devuelve el conjunto pendiente completo.
pub fn fetch_pending(
    conn: &Connection,
    netid: StudentId,
    status: Option<RegistrationStatus>,
) -> Result<Vec<PendingEntry>, StoreError> {
    let mut sql = String::from(
        "SELECT lecture, quiz, registration_status, confirmation_code FROM nextquarter WHERE netid = ?1",
    );
    let mut values: Vec<Value> = vec![Value::Integer(netid)];
    if let Some(s) = status {
        sql.push_str(" AND registration_status = ?2");
        values.push(Value::Text(s.as_str().to_string()));
    }
    sql.push_str(" ORDER BY rowid");

    let rows: Vec<(i64, i64, String, Option<i64>)> = {
        let mut stmt = conn.prepare(&sql)?;
        let it = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;
        it.collect::<Result<Vec<_>, _>>()?
    };

    let mut out = Vec::with_capacity(rows.len());
    for (lecture_id, quiz_id, status_raw, code) in rows {
        let status = RegistrationStatus::parse(&status_raw).ok_or_else(|| {
            StoreError::malformed("nextquarter", format!("registration_status {:?}", status_raw))
        })?;
        let lecture = fetch_lecture(conn, lecture_id)?.ok_or_else(|| {
            StoreError::malformed("nextquarter", format!("missing lecture {}", lecture_id))
        })?;
        let quiz = fetch_quiz(conn, quiz_id)?
            .ok_or_else(|| StoreError::malformed("nextquarter", format!("missing quiz {}", quiz_id)))?;
        let course = fetch_course(conn, lecture.parent)?.ok_or_else(|| {
            StoreError::malformed("lectures", format!("lecture {} has no course", lecture_id))
        })?;
        out.push(PendingEntry { course, lecture, quiz, status, confirmation_code: code });
    }
    Ok(out)
}

/// Lee todo lo que necesita `register_check`. Se llama dentro de la transacción.
pub fn load_registration_snapshot(
    conn: &Connection,
    netid: StudentId,
) -> Result<RegistrationSnapshot, StoreError> {
    let student = fetch_student(conn, netid)?
        .ok_or_else(|| StoreError::not_found(format!("student {}", netid)))?;
    let major_requirements: HashSet<CourseId> =
        fetch_requirements(conn, student.major, false)?.into_iter().collect();
    let pending = fetch_pending(conn, netid, None)?;
    let history = fetch_history(conn, netid)?;
    Ok(RegistrationSnapshot { student, major_requirements, pending, history })
}

// --- sesión ---

pub fn is_signed_in(conn: &Connection, netid: StudentId) -> Result<bool, StoreError> {
    let found = conn
        .query_row("SELECT student_id FROM signin WHERE student_id = ?1", params![netid], |r| {
            r.get::<_, i64>(0)
        })
        .optional()?;
    Ok(found.is_some())
}

/// Comparación en texto plano (sin hardening).
pub fn verify_credentials(conn: &Connection, netid: StudentId, password: &str) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT netid FROM students WHERE netid = ?1 AND log_in_password = ?2",
            params![netid, password],
            |r| r.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

// --- catálogo ---

/// Cursos con al menos una cátedra el próximo trimestre, ordenados por nombre.
pub fn search_courses(conn: &Connection, filter: &CourseFilter) -> Result<Vec<CourseSummary>, StoreError> {
    let mut sql = String::from(
        "SELECT DISTINCT c.course_name, c.credit, c.title, m.category \
         FROM lectures l, courses c, majors m \
         WHERE l.course = c.courseid AND c.major = m.majorid ",
    );
    let mut values: Vec<Value> = Vec::new();
    if let Some(k) = filter.keyword.as_ref().filter(|k| !k.is_empty()) {
        sql.push_str("AND (c.course_name LIKE ? OR c.course_description LIKE ?) ");
        let pattern = format!("%{}%", k);
        values.push(Value::Text(pattern.clone()));
        values.push(Value::Text(pattern));
    }
    if let Some(cat) = filter.category.as_ref().filter(|c| !c.is_empty()) {
        sql.push_str("AND m.category = ? ");
        values.push(Value::Text(cat.clone()));
    }
    if let Some(credit) = filter.credit {
        sql.push_str("AND c.credit = ? ");
        values.push(Value::Integer(credit));
    }
    sql.push_str("ORDER BY c.course_name");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
        Ok(CourseSummary {
            course_name: row.get(0)?,
            credit: row.get(1)?,
            title: row.get(2)?,
            category: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn course_id_by_name(conn: &Connection, name: &str) -> Result<Option<CourseId>, StoreError> {
    let id = conn
        .query_row("SELECT courseid FROM courses WHERE course_name = ?1", params![name], |r| {
            r.get::<_, i64>(0)
        })
        .optional()?;
    Ok(id)
}

fn quizzes_of(conn: &Connection, lecture: SectionId) -> Result<Vec<QuizView>, StoreError> {
    let sql = format!(
        "SELECT {}, t.name FROM quizzes q, tas t WHERE q.instructor = t.id AND q.lecture = ?1 \
         ORDER BY q.section_name",
        QUIZ_COLUMNS
            .split(", ")
            .map(|c| format!("q.{}", c))
            .collect::<Vec<_>>()
            .join(", ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![lecture], |row| {
        Ok((RawSection::from_row(row)?, row.get::<_, String>(8)?))
    })?;
    let mut out = Vec::new();
    for r in rows {
        let (raw, instructor) = r?;
        let s = raw.into_section(SectionKind::Quiz, "quizzes")?;
        out.push(QuizView {
            quiz: s.name,
            instructor,
            capacity: CapacityView::from(s.capacity),
            current_enroll: s.current_enroll,
            schedule_day: s.schedule.day.to_display(),
            schedule_time: s.schedule.display_time(),
        });
    }
    Ok(out)
}

fn lectures_of(conn: &Connection, course: CourseId) -> Result<Vec<LectureView>, StoreError> {
    let sql = format!(
        "SELECT {}, i.name FROM lectures l, instructors i WHERE l.instructor = i.id AND l.course = ?1 \
         ORDER BY l.section_name",
        LECTURE_COLUMNS
            .split(", ")
            .map(|c| format!("l.{}", c))
            .collect::<Vec<_>>()
            .join(", ")
    );
    let raws: Vec<(RawSection, String)> = {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![course], |row| {
            Ok((RawSection::from_row(row)?, row.get::<_, String>(8)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };
    let mut out = Vec::with_capacity(raws.len());
    for (raw, instructor) in raws {
        let s = raw.into_section(SectionKind::Lecture, "lectures")?;
        out.push(LectureView {
            quizzes: quizzes_of(conn, s.id)?,
            lecture: s.name,
            instructor,
            capacity: CapacityView::from(s.capacity),
            current_enroll: s.current_enroll,
            schedule_day: s.schedule.day.to_display(),
            schedule_time: s.schedule.display_time(),
        });
    }
    Ok(out)
}

pub fn course_detail(conn: &Connection, course_name: &str) -> Result<Option<CourseDetail>, StoreError> {
    let base = conn
        .query_row(
            "SELECT c.courseid, c.course_name, c.course_description, m.major_name, c.credit \
             FROM courses c, majors m WHERE m.majorid = c.major AND c.course_name = ?1",
            params![course_name],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        )
        .optional()?;
    let Some((id, name, description, department, credit)) = base else { return Ok(None) };

    let pre_requisites = {
        let mut stmt = conn.prepare(
            "SELECT c.course_name FROM courses c, prerequisites p \
             WHERE p.pre_course_id = c.courseid AND p.course_id = ?1",
        )?;
        let rows = stmt.query_map(params![id], |row| Ok(PrerequisiteName { course_name: row.get(0)? }))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    Ok(Some(CourseDetail {
        course_name: name,
        description,
        department,
        credit,
        pre_requisites,
        sections: lectures_of(conn, id)?,
    }))
}

// --- carro ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSection {
    pub course: CourseId,
    pub lecture: SectionId,
    pub quiz: SectionId,
}

/// Resuelve (curso, cátedra, quiz) por nombres; `None` si el trío no existe.
pub fn resolve_section(
    conn: &Connection,
    course_name: &str,
    lecture_name: &str,
    quiz_name: &str,
) -> Result<Option<ResolvedSection>, StoreError> {
    let lec = conn
        .query_row(
            "SELECT c.courseid, l.lectureid FROM lectures l, courses c \
             WHERE c.courseid = l.course AND l.section_name = ?1 AND c.course_name = ?2",
            params![lecture_name, course_name],
            |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)),
        )
        .optional()?;
    let Some((course, lecture)) = lec else { return Ok(None) };
    let quiz = conn
        .query_row(
            "SELECT quizid FROM quizzes WHERE lecture = ?1 AND section_name = ?2",
            params![lecture, quiz_name],
            |r| r.get::<_, i64>(0),
        )
        .optional()?;
    Ok(quiz.map(|quiz| ResolvedSection { course, lecture, quiz }))
}

/// True si la cátedra o el quiz están llenos, o si el trío no existe.
pub fn is_section_full(
    conn: &Connection,
    course_name: &str,
    lecture_name: &str,
    quiz_name: &str,
) -> Result<bool, StoreError> {
    let Some(r) = resolve_section(conn, course_name, lecture_name, quiz_name)? else { return Ok(true) };
    let lecture = fetch_lecture(conn, r.lecture)?;
    let quiz = fetch_quiz(conn, r.quiz)?;
    match (lecture, quiz) {
        (Some(l), Some(q)) => Ok(!crate::registration::capacity::has_open_seats(&l)
            || !crate::registration::capacity::has_open_seats(&q)),
        _ => Ok(true),
    }
}

pub fn has_pending_course(conn: &Connection, netid: StudentId, course: CourseId) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT n.lecture FROM nextquarter n, lectures l \
             WHERE n.lecture = l.lectureid AND n.netid = ?1 AND l.course = ?2 LIMIT 1",
            params![netid, course],
            |r| r.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn instructor_name(conn: &Connection, kind: SectionKind, section: SectionId) -> Result<String, StoreError> {
    let sql = match kind {
        SectionKind::Lecture => "SELECT i.name FROM lectures l, instructors i WHERE l.instructor = i.id AND l.lectureid = ?1",
        SectionKind::Quiz => "SELECT t.name FROM quizzes q, tas t WHERE q.instructor = t.id AND q.quizid = ?1",
    };
    let name = conn.query_row(sql, params![section], |r| r.get::<_, String>(0)).optional()?;
    Ok(name.unwrap_or_default())
}

fn cart_item(conn: &Connection, entry: PendingEntry) -> Result<CartItem, StoreError> {
    let lecture_instructor = instructor_name(conn, SectionKind::Lecture, entry.lecture.id)?;
    let quiz_instructor = instructor_name(conn, SectionKind::Quiz, entry.quiz.id)?;
    let confirmation_code = match entry.status {
        RegistrationStatus::Added => None,
        RegistrationStatus::Registered => entry.confirmation_code,
    };
    Ok(CartItem {
        course_name: entry.course.name,
        lecture: CartSectionView::new(entry.lecture.name, lecture_instructor, &entry.lecture.schedule),
        quiz: CartSectionView::new(entry.quiz.name, quiz_instructor, &entry.quiz.schedule),
        confirmation_code,
    })
}

pub fn cart(conn: &Connection, netid: StudentId) -> Result<CartView, StoreError> {
    let added = fetch_pending(conn, netid, Some(RegistrationStatus::Added))?
        .into_iter()
        .map(|e| cart_item(conn, e))
        .collect::<Result<Vec<_>, _>>()?;
    let registered = fetch_pending(conn, netid, Some(RegistrationStatus::Registered))?
        .into_iter()
        .map(|e| cart_item(conn, e))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CartView { added, registered })
}

// --- historial ---

pub fn history_by_term(conn: &Connection, netid: StudentId, years: &[i32]) -> Result<HistoryView, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT c.course_name, c.credit, h.grade FROM history h, courses c \
         WHERE h.course_id = c.courseid AND h.student_id = ?1 AND h.school_year = ?2 \
         AND h.school_quarter = ?3",
    )?;
    let mut out: HistoryView = BTreeMap::new();
    for year in years {
        let mut quarters = BTreeMap::new();
        for quarter in HISTORY_QUARTERS {
            let rows = stmt.query_map(params![netid, year, quarter], |row| {
                Ok(HistoryEntry { course_name: row.get(0)?, credit: row.get(1)?, grade: row.get(2)? })
            })?;
            quarters.insert(quarter.to_string(), rows.collect::<Result<Vec<_>, _>>()?);
        }
        out.insert(year.to_string(), quarters);
    }
    Ok(out)
}

// --- auditoría ---

/// Búsqueda de major sin distinguir mayúsculas (LIKE de SQLite).
pub fn major_id_by_name(conn: &Connection, name: &str) -> Result<Option<MajorId>, StoreError> {
    let id = conn
        .query_row("SELECT majorid FROM majors WHERE major_name LIKE ?1", params![name], |r| {
            r.get::<_, i64>(0)
        })
        .optional()?;
    Ok(id)
}

/// Curso requerido con los campos que muestra la auditoría.
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementRow {
    pub id: CourseId,
    pub name: String,
    pub title: String,
    pub credit: i64,
}

pub fn requirement_courses(conn: &Connection, major: MajorId, minor: bool) -> Result<Vec<RequirementRow>, StoreError> {
    let table = if minor { "minorrequirements" } else { "majorrequirements" };
    let sql = format!(
        "SELECT c.courseid, c.course_name, c.title, c.credit FROM courses c, {} r \
         WHERE c.courseid = r.course_id AND r.major_id = ?1",
        table
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![major], |row| {
        Ok(RequirementRow { id: row.get(0)?, name: row.get(1)?, title: row.get(2)?, credit: row.get(3)? })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn registered_course_ids(conn: &Connection, netid: StudentId) -> Result<HashSet<CourseId>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT l.course FROM nextquarter n, lectures l \
         WHERE n.lecture = l.lectureid AND n.netid = ?1 AND n.registration_status = ?2",
    )?;
    let rows = stmt.query_map(params![netid, RegistrationStatus::Registered.as_str()], |r| {
        r.get::<_, i64>(0)
    })?;
    Ok(rows.collect::<Result<HashSet<_>, _>>()?)
}
