use rusqlite::Connection;
use rusqlite::types::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::StoreError;

/// Espera por defecto cuando otra conexión tiene el lock de escritura.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Esquema relacional. `registrations.id` es la fuente de los códigos de confirmación.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS majors (
    majorid INTEGER PRIMARY KEY,
    major_name TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS students (
    netid INTEGER PRIMARY KEY,
    full_name TEXT NOT NULL,
    major INTEGER NOT NULL REFERENCES majors(majorid),
    log_in_password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS courses (
    courseid INTEGER PRIMARY KEY,
    course_name TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    credit INTEGER NOT NULL,
    major INTEGER NOT NULL REFERENCES majors(majorid),
    course_description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS prerequisites (
    course_id INTEGER NOT NULL REFERENCES courses(courseid),
    pre_course_id INTEGER REFERENCES courses(courseid)
);

CREATE TABLE IF NOT EXISTS majorrequirements (
    major_id INTEGER NOT NULL REFERENCES majors(majorid),
    course_id INTEGER NOT NULL REFERENCES courses(courseid)
);

CREATE TABLE IF NOT EXISTS minorrequirements (
    major_id INTEGER NOT NULL REFERENCES majors(majorid),
    course_id INTEGER NOT NULL REFERENCES courses(courseid)
);

CREATE TABLE IF NOT EXISTS instructors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tas (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS lectures (
    lectureid INTEGER PRIMARY KEY,
    section_name TEXT NOT NULL,
    course INTEGER NOT NULL REFERENCES courses(courseid),
    instructor INTEGER NOT NULL REFERENCES instructors(id),
    start_time INTEGER NOT NULL,
    end_time INTEGER NOT NULL,
    day_in_week TEXT NOT NULL,
    capacity INTEGER NOT NULL,
    current_enroll INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS quizzes (
    quizid INTEGER PRIMARY KEY,
    section_name TEXT NOT NULL,
    lecture INTEGER NOT NULL REFERENCES lectures(lectureid),
    instructor INTEGER NOT NULL REFERENCES tas(id),
    start_time INTEGER NOT NULL,
    end_time INTEGER NOT NULL,
    day_in_week TEXT NOT NULL,
    capacity INTEGER NOT NULL,
    current_enroll INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS nextquarter (
    netid INTEGER NOT NULL REFERENCES students(netid),
    lecture INTEGER NOT NULL REFERENCES lectures(lectureid),
    quiz INTEGER NOT NULL REFERENCES quizzes(quizid),
    registration_status TEXT NOT NULL,
    confirmation_code INTEGER
);

CREATE TABLE IF NOT EXISTS history (
    student_id INTEGER NOT NULL REFERENCES students(netid),
    course_id INTEGER NOT NULL REFERENCES courses(courseid),
    grade REAL NOT NULL,
    school_year INTEGER NOT NULL,
    school_quarter TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS signin (
    student_id INTEGER PRIMARY KEY REFERENCES students(netid)
);

CREATE TABLE IF NOT EXISTS registrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    netid INTEGER NOT NULL REFERENCES students(netid),
    ts TEXT NOT NULL,
    sections_json TEXT NOT NULL
);
";

/// Abre una conexión de corta vida, como se hace por cada request.
pub fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Crea el directorio del archivo (si hace falta) y las tablas.
pub fn init_db(path: &Path) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let conn = open_connection(path)?;
    init_schema(&conn)
}

pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// `day_in_week` puede venir guardado como INTEGER (p.ej. 135) o TEXT ("135").
pub(crate) fn value_as_text(v: Value) -> Option<String> {
    match v {
        Value::Text(s) => Some(s),
        Value::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}
