// Fixture compartido: una base SQLite en un directorio temporal con un
// catálogo chico. Se inserta respetando las foreign keys.
#![allow(dead_code)]

use rusqlite::{Connection, params};
use std::path::PathBuf;
use tempfile::TempDir;

use yourplan::store::{init_db, open_connection};

pub const ANA: i64 = 1001; // CS, aprobó CSE 142, reprobó MATH 126
pub const BRUNO: i64 = 1002; // Math, sin historial
pub const CARLA: i64 = 1003; // CS, sin historial

pub const CS: i64 = 1;
pub const MATH: i64 = 2;

pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data").join("yourplan.db");
        init_db(&path).expect("init_db");
        let conn = open_connection(&path).expect("open");
        seed(&conn);
        Fixture { _dir: dir, path }
    }

    pub fn conn(&self) -> Connection {
        open_connection(&self.path).expect("open")
    }
}

/// Las cátedras: (id, nombre, curso, inicio, fin, días, cupo, inscritos).
const LECTURES: [(i64, &str, i64, i64, i64, &str, i64, i64); 8] = [
    (10, "A", 1, 600, 650, "1", -1, 0),
    (11, "B", 1, 600, 650, "2", 30, 0),
    (20, "A", 2, 640, 700, "3", 30, 0),
    (30, "A", 3, 800, 850, "24", 1, 1),
    (31, "B", 3, 700, 750, "135", 30, 0),
    (40, "A", 4, 900, 950, "135", 30, 0),
    (50, "A", 5, 1000, 1050, "1", -1, 0),
    (60, "A", 6, 1100, 1150, "3", -1, 0),
];

fn seed(conn: &Connection) {
    conn.execute_batch(
        "
        INSERT INTO majors (majorid, major_name, category) VALUES
            (1, 'Computer Science', 'CSE'),
            (2, 'Mathematics', 'MATH');

        INSERT INTO students (netid, full_name, major, log_in_password) VALUES
            (1001, 'Ana Perez', 1, 'pw-ana'),
            (1002, 'Bruno Diaz', 2, 'pw-bruno'),
            (1003, 'Carla Soto', 1, 'pw-carla');

        INSERT INTO courses (courseid, course_name, title, credit, major, course_description) VALUES
            (1, 'CSE 142', 'Computer Programming I', 4, 1, 'Basic programming in Java'),
            (2, 'CSE 143', 'Computer Programming II', 5, 1, 'Data structures in Java'),
            (3, 'MATH 126', 'Calculus III', 5, 2, 'Multivariable calculus'),
            (4, 'CSE 311', 'Foundations of Computing', 4, 1, 'Logic and proofs'),
            (5, 'CSE 400', 'Capstone I', 10, 1, 'Large project'),
            (6, 'CSE 401', 'Capstone II', 9, 1, 'Larger project'),
            (7, 'CSE 190', 'Seminar', 1, 1, 'Weekly seminar, no sections');

        INSERT INTO prerequisites (course_id, pre_course_id) VALUES
            (1, NULL),
            (2, 1),
            (4, 2);

        INSERT INTO majorrequirements (major_id, course_id) VALUES
            (1, 1), (1, 2), (1, 3), (1, 4);
        INSERT INTO minorrequirements (major_id, course_id) VALUES
            (1, 1), (1, 2);

        INSERT INTO instructors (id, name) VALUES (1, 'Stuart Reges');
        INSERT INTO tas (id, name) VALUES (1, 'Lee Kim');

        INSERT INTO history (student_id, course_id, grade, school_year, school_quarter) VALUES
            (1001, 1, 3.5, 2023, 'winter'),
            (1001, 3, 1.5, 2022, 'autumn');
        ",
    )
    .expect("seed");

    // CSE 190 (id 7) no tiene cátedras: existe pero no aparece en /allcourses.
    for (k, (id, name, course, start, end, day, cap, enrolled)) in LECTURES.iter().enumerate() {
        conn.execute(
            "INSERT INTO lectures (lectureid, section_name, course, instructor, start_time, end_time, \
             day_in_week, capacity, current_enroll) VALUES (?1, ?2, ?3, 1, ?4, ?5, ?6, ?7, ?8)",
            params![id, name, course, start, end, day, cap, enrolled],
        )
        .expect("lecture");
        // quizzes en franjas propias (día 4) para que no choquen entre sí
        let q_start = 1080 + 30 * k as i64;
        let q_cap = if *id == 30 { 10 } else { -1 };
        conn.execute(
            "INSERT INTO quizzes (quizid, section_name, lecture, instructor, start_time, end_time, \
             day_in_week, capacity, current_enroll) VALUES (?1, ?2, ?3, 1, ?4, ?5, '4', ?6, 0)",
            params![100 + id, format!("{}A", name), id, q_start, q_start + 20, q_cap],
        )
        .expect("quiz");
    }
}

pub fn sign_in(conn: &Connection, netid: i64) {
    yourplan::store::sign_in(conn, netid).expect("sign_in");
}

pub fn add(conn: &Connection, netid: i64, course: &str, lecture: &str, quiz: &str) -> bool {
    yourplan::store::add_to_cart(conn, netid, course, lecture, quiz).expect("add_to_cart")
}

/// Inserta directo en `nextquarter`, saltando la validación del carro.
pub fn insert_pending(conn: &Connection, netid: i64, lecture: i64, status: &str, code: Option<i64>) {
    conn.execute(
        "INSERT INTO nextquarter (netid, lecture, quiz, registration_status, confirmation_code) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![netid, lecture, 100 + lecture, status, code],
    )
    .expect("insert nextquarter");
}

pub fn lecture_enroll(conn: &Connection, lecture: i64) -> i64 {
    conn.query_row("SELECT current_enroll FROM lectures WHERE lectureid = ?1", params![lecture], |r| r.get(0))
        .expect("lecture enroll")
}

pub fn quiz_enroll(conn: &Connection, quiz: i64) -> i64 {
    conn.query_row("SELECT current_enroll FROM quizzes WHERE quizid = ?1", params![quiz], |r| r.get(0))
        .expect("quiz enroll")
}

pub fn statuses(conn: &Connection, netid: i64) -> Vec<(i64, String)> {
    let mut stmt = conn
        .prepare("SELECT lecture, registration_status FROM nextquarter WHERE netid = ?1 ORDER BY rowid")
        .expect("prepare");
    let rows = stmt
        .query_map(params![netid], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))
        .expect("query");
    rows.map(|r| r.expect("row")).collect()
}

pub fn registrations_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM registrations", [], |r| r.get(0)).expect("count")
}
