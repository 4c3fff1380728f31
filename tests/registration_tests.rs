mod common;

use std::time::Duration;

use common::*;
use yourplan::error::StoreError;
use yourplan::registration::{Deadline, register};

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(5))
}

#[test]
fn test_lote_simple_se_inscribe() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    assert!(add(&conn, CARLA, "CSE 142", "A", "AA"));

    let out = register(&mut conn, CARLA, &deadline()).expect("register");
    assert!(out.is_possible);
    assert_eq!(out.note, "Everything Seems Great!");
    assert_eq!(out.code, "OK");
    let code = out.confirmation_code.expect("confirmation code");

    // cupo ilimitado: el contador igual sube en uno
    assert_eq!(lecture_enroll(&conn, 10), 1);
    assert_eq!(quiz_enroll(&conn, 110), 1);
    assert_eq!(statuses(&conn, CARLA), vec![(10, "registered".to_string())]);
    let stored: i64 = conn
        .query_row("SELECT confirmation_code FROM nextquarter WHERE netid = ?1", [CARLA], |r| r.get(0))
        .unwrap();
    assert_eq!(stored, code);
    assert_eq!(registrations_count(&conn), 1);
}

#[test]
fn test_choque_de_horario() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    // 600-650 día 1 vs 640-700 día 3: misma paridad y se solapan
    assert!(add(&conn, CARLA, "CSE 142", "A", "AA"));
    assert!(add(&conn, CARLA, "CSE 143", "A", "AA"));

    let out = register(&mut conn, CARLA, &deadline()).unwrap();
    assert!(!out.is_possible);
    assert_eq!(out.code, "TIME_CONFLICT");
    assert_eq!(out.note, "Time Conflict Exists");
    assert_eq!(out.confirmation_code, None);
}

#[test]
fn test_prerequisito_no_cumplido() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    // CSE 143 pide CSE 142, que Carla no ha aprobado
    assert!(add(&conn, CARLA, "CSE 143", "A", "AA"));

    let out = register(&mut conn, CARLA, &deadline()).unwrap();
    assert_eq!(out.code, "PREREQ_NOT_MET");
    assert_eq!(out.note, "Prerequisites Not Met");
}

#[test]
fn test_prerequisito_aprobado_permite_inscribir() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    // Ana aprobó CSE 142 con 3.5
    assert!(add(&conn, ANA, "CSE 143", "A", "AA"));

    let out = register(&mut conn, ANA, &deadline()).unwrap();
    assert!(out.is_possible, "{:?}", out);
    assert_eq!(lecture_enroll(&conn, 20), 1);
}

#[test]
fn test_curso_duplicado_entre_added_y_registered() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    insert_pending(&conn, CARLA, 10, "registered", Some(77));
    insert_pending(&conn, CARLA, 11, "added", None);

    let out = register(&mut conn, CARLA, &deadline()).unwrap();
    assert_eq!(out.code, "DUPLICATE_COURSE");
    assert_eq!(out.note, "Cannot Enroll in the Same Course Multiple Times");
}

#[test]
fn test_fuera_del_major() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    // Bruno es de Math y CSE 142 no está en sus requisitos
    assert!(add(&conn, BRUNO, "CSE 142", "A", "AA"));

    let out = register(&mut conn, BRUNO, &deadline()).unwrap();
    assert_eq!(out.code, "NOT_ELIGIBLE");
    assert_eq!(out.note, "Not in the major or major requirements");
}

#[test]
fn test_curso_ya_cursado_no_se_repite() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    // Ana reprobó MATH 126: igual cuenta como cursado
    assert!(add(&conn, ANA, "MATH 126", "B", "BA"));

    let out = register(&mut conn, ANA, &deadline()).unwrap();
    assert_eq!(out.code, "NOT_ELIGIBLE");
}

#[test]
fn test_requisito_de_otro_major_es_elegible() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    // MATH 126 es de Math pero está en los requisitos de CS
    assert!(add(&conn, CARLA, "MATH 126", "B", "BA"));

    let out = register(&mut conn, CARLA, &deadline()).unwrap();
    assert!(out.is_possible, "{:?}", out);
}

#[test]
fn test_seccion_llena() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    assert!(add(&conn, CARLA, "MATH 126", "A", "AA"));

    let out = register(&mut conn, CARLA, &deadline()).unwrap();
    assert_eq!(out.code, "NO_SEATS");
    assert_eq!(out.note, "No Section Added to Cart/Cannot Enroll in Full Sections");
}

#[test]
fn test_carro_vacio_es_no_seats() {
    let fx = Fixture::new();
    let mut conn = fx.conn();

    let out = register(&mut conn, CARLA, &deadline()).unwrap();
    assert!(!out.is_possible);
    assert_eq!(out.code, "NO_SEATS");
    assert_eq!(registrations_count(&conn), 0);
}

#[test]
fn test_tope_de_creditos() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    // 10 + 9 = 19 > 18
    assert!(add(&conn, CARLA, "CSE 400", "A", "AA"));
    assert!(add(&conn, CARLA, "CSE 401", "A", "AA"));

    let out = register(&mut conn, CARLA, &deadline()).unwrap();
    assert_eq!(out.code, "CREDIT_EXCEEDED");
    assert_eq!(out.note, "Credits Exceeding 18 in Total");
}

#[test]
fn test_rechazo_no_modifica_la_base() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    assert!(add(&conn, CARLA, "MATH 126", "A", "AA"));

    let out = register(&mut conn, CARLA, &deadline()).unwrap();
    assert!(!out.is_possible);

    assert_eq!(lecture_enroll(&conn, 30), 1);
    assert_eq!(quiz_enroll(&conn, 130), 0);
    assert_eq!(statuses(&conn, CARLA), vec![(30, "added".to_string())]);
    assert_eq!(registrations_count(&conn), 0);
}

#[test]
fn test_codigos_de_confirmacion_distintos() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    assert!(add(&conn, CARLA, "CSE 142", "A", "AA"));
    assert!(add(&conn, BRUNO, "MATH 126", "B", "BA"));

    let a = register(&mut conn, CARLA, &deadline()).unwrap();
    let b = register(&mut conn, BRUNO, &deadline()).unwrap();
    assert!(a.is_possible && b.is_possible);
    assert_ne!(a.confirmation_code, b.confirmation_code);
    assert_eq!(registrations_count(&conn), 2);
}

#[test]
fn test_segundo_lote_no_toca_lo_ya_inscrito() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    assert!(add(&conn, ANA, "CSE 143", "A", "AA"));
    let first = register(&mut conn, ANA, &deadline()).unwrap();
    assert!(first.is_possible);

    // segundo intento sin nada nuevo en el carro
    let second = register(&mut conn, ANA, &deadline()).unwrap();
    assert_eq!(second.code, "NO_SEATS");
    assert_eq!(lecture_enroll(&conn, 20), 1);
}

#[test]
fn test_plazo_vencido_hace_rollback() {
    let fx = Fixture::new();
    let mut conn = fx.conn();
    assert!(add(&conn, CARLA, "CSE 142", "A", "AA"));

    let expired = Deadline::after(Duration::ZERO);
    match register(&mut conn, CARLA, &expired) {
        Err(StoreError::DeadlineExceeded { .. }) => {}
        other => panic!("expected deadline error, got {:?}", other),
    }
    assert_eq!(lecture_enroll(&conn, 10), 0);
    assert_eq!(statuses(&conn, CARLA), vec![(10, "added".to_string())]);
    assert_eq!(registrations_count(&conn), 0);
}

#[test]
fn test_inscripciones_concurrentes_respetan_el_cupo() {
    let fx = Fixture::new();
    {
        let conn = fx.conn();
        // una sola plaza libre en la cátedra 30
        conn.execute("UPDATE lectures SET current_enroll = 0 WHERE lectureid = 30", []).unwrap();
        assert!(add(&conn, CARLA, "MATH 126", "A", "AA"));
        assert!(add(&conn, BRUNO, "MATH 126", "A", "AA"));
    }

    let handles: Vec<_> = [CARLA, BRUNO]
        .into_iter()
        .map(|netid| {
            let path = fx.path.clone();
            std::thread::spawn(move || {
                let mut conn = yourplan::store::open_connection(&path).unwrap();
                register(&mut conn, netid, &Deadline::after(Duration::from_secs(10))).unwrap()
            })
        })
        .collect();
    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let accepted = outcomes.iter().filter(|o| o.is_possible).count();
    assert_eq!(accepted, 1);
    assert!(outcomes.iter().any(|o| o.code == "NO_SEATS"));
    assert_eq!(lecture_enroll(&fx.conn(), 30), 1);
}
