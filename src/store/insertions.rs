use chrono::Utc;
use rusqlite::{Connection, params};

use crate::error::StoreError;
use crate::models::{PendingEntry, RegistrationStatus, StudentId};
use crate::store::queries::{has_pending_course, resolve_section};

/// Marca al estudiante como conectado. Idempotente.
pub fn sign_in(conn: &Connection, netid: StudentId) -> Result<(), StoreError> {
    conn.execute("INSERT OR IGNORE INTO signin (student_id) VALUES (?1)", params![netid])?;
    Ok(())
}

pub fn sign_out(conn: &Connection, netid: StudentId) -> Result<(), StoreError> {
    conn.execute("DELETE FROM signin WHERE student_id = ?1", params![netid])?;
    Ok(())
}

/// Agrega cátedra+quiz al carro. Devuelve false si el trío no existe o si el
/// estudiante ya tiene una fila pendiente (added o registered) de ese curso.
pub fn add_to_cart(
    conn: &Connection,
    netid: StudentId,
    course_name: &str,
    lecture_name: &str,
    quiz_name: &str,
) -> Result<bool, StoreError> {
    let Some(r) = resolve_section(conn, course_name, lecture_name, quiz_name)? else {
        return Ok(false);
    };
    if has_pending_course(conn, netid, r.course)? {
        return Ok(false);
    }
    conn.execute(
        "INSERT INTO nextquarter (netid, lecture, quiz, registration_status) VALUES (?1, ?2, ?3, ?4)",
        params![netid, r.lecture, r.quiz, RegistrationStatus::Added.as_str()],
    )?;
    Ok(true)
}

/// Quita el par del carro; sólo borra filas que sigan en "added".
pub fn remove_from_cart(
    conn: &Connection,
    netid: StudentId,
    course_name: &str,
    lecture_name: &str,
    quiz_name: &str,
) -> Result<(), StoreError> {
    if let Some(r) = resolve_section(conn, course_name, lecture_name, quiz_name)? {
        conn.execute(
            "DELETE FROM nextquarter WHERE netid = ?1 AND lecture = ?2 AND quiz = ?3 \
             AND registration_status = ?4",
            params![netid, r.lecture, r.quiz, RegistrationStatus::Added.as_str()],
        )?;
    }
    Ok(())
}

/// Inserta la fila de `registrations` y devuelve su id, que es el código de
/// confirmación del lote.
pub fn record_registration(
    conn: &Connection,
    netid: StudentId,
    batch: &[&PendingEntry],
) -> Result<i64, StoreError> {
    let sections: Vec<serde_json::Value> = batch
        .iter()
        .map(|e| serde_json::json!({"lecture": e.lecture.id, "quiz": e.quiz.id}))
        .collect();
    let sections_json = serde_json::Value::Array(sections).to_string();
    let ts = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO registrations (netid, ts, sections_json) VALUES (?1, ?2, ?3)",
        params![netid, ts, sections_json],
    )?;
    Ok(conn.last_insert_rowid())
}

/// added -> registered con el código, y +1 en cada cátedra y quiz del lote.
/// Debe correr dentro de la transacción de la inscripción.
pub fn commit_registration(
    conn: &Connection,
    netid: StudentId,
    code: i64,
    batch: &[&PendingEntry],
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE nextquarter SET registration_status = ?1, confirmation_code = ?2 \
         WHERE netid = ?3 AND registration_status = ?4",
        params![
            RegistrationStatus::Registered.as_str(),
            code,
            netid,
            RegistrationStatus::Added.as_str()
        ],
    )?;
    for entry in batch {
        conn.execute(
            "UPDATE lectures SET current_enroll = current_enroll + 1 WHERE lectureid = ?1",
            params![entry.lecture.id],
        )?;
        conn.execute(
            "UPDATE quizzes SET current_enroll = current_enroll + 1 WHERE quizid = ?1",
            params![entry.quiz.id],
        )?;
    }
    Ok(())
}
