// Decisión pura de la inscripción: seis reglas en orden fijo, corta en la primera falla.
use std::collections::HashSet;

use serde::Serialize;

use crate::models::{Course, CourseId, HistoryRecord, PendingEntry, RegistrationStatus, Student};
use crate::registration::{capacity, conflict, credits, duplicates, eligibility, prerequisites};

pub const SUCCESS_NOTE: &str = "Everything Seems Great!";
pub const SUCCESS_CODE: &str = "OK";

/// Todo lo que las reglas necesitan saber de un estudiante, leído del store
/// dentro de la misma transacción que el commit.
#[derive(Debug, Clone)]
pub struct RegistrationSnapshot {
    pub student: Student,
    pub major_requirements: HashSet<CourseId>,
    /// added + registered
    pub pending: Vec<PendingEntry>,
    pub history: Vec<HistoryRecord>,
}

impl RegistrationSnapshot {
    /// El lote: las filas en estado "added".
    pub fn batch(&self) -> Vec<&PendingEntry> {
        self.pending
            .iter()
            .filter(|e| e.status == RegistrationStatus::Added)
            .collect()
    }

    pub fn taken_courses(&self) -> HashSet<CourseId> {
        self.history.iter().map(|h| h.course).collect()
    }

    pub fn passed_courses(&self) -> HashSet<CourseId> {
        self.history.iter().filter(|h| h.passed()).map(|h| h.course).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    TimeConflict,
    NotEligible,
    NoSeats,
    PrereqNotMet,
    DuplicateCourse,
    CreditExceeded,
}

impl RejectReason {
    /// Mensaje que ve el usuario; forma parte del contrato.
    pub fn note(&self) -> &'static str {
        match self {
            RejectReason::TimeConflict => "Time Conflict Exists",
            RejectReason::NotEligible => "Not in the major or major requirements",
            RejectReason::NoSeats => "No Section Added to Cart/Cannot Enroll in Full Sections",
            RejectReason::PrereqNotMet => "Prerequisites Not Met",
            RejectReason::DuplicateCourse => "Cannot Enroll in the Same Course Multiple Times",
            RejectReason::CreditExceeded => "Credits Exceeding 18 in Total",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::TimeConflict => "TIME_CONFLICT",
            RejectReason::NotEligible => "NOT_ELIGIBLE",
            RejectReason::NoSeats => "NO_SEATS",
            RejectReason::PrereqNotMet => "PREREQ_NOT_MET",
            RejectReason::DuplicateCourse => "DUPLICATE_COURSE",
            RejectReason::CreditExceeded => "CREDIT_EXCEEDED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl CheckOutcome {
    pub fn is_possible(&self) -> bool {
        matches!(self, CheckOutcome::Accepted)
    }

    pub fn note(&self) -> &'static str {
        match self {
            CheckOutcome::Accepted => SUCCESS_NOTE,
            CheckOutcome::Rejected(r) => r.note(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CheckOutcome::Accepted => SUCCESS_CODE,
            CheckOutcome::Rejected(r) => r.code(),
        }
    }
}

/// Corre las seis reglas en orden:
/// 1. choque de horario (pendientes completos)
/// 2. elegibilidad por major (lote)
/// 3. cupos, incluido el lote vacío (lote)
/// 4. prerequisitos (lote)
/// 5. curso duplicado (pendientes completos)
/// 6. tope de créditos (pendientes completos)
pub fn register_check(snapshot: &RegistrationSnapshot) -> CheckOutcome {
    let batch: Vec<PendingEntry> = snapshot.batch().into_iter().cloned().collect();

    if conflict::has_time_conflict(&snapshot.pending) {
        return CheckOutcome::Rejected(RejectReason::TimeConflict);
    }

    let taken = snapshot.taken_courses();
    let eligible = batch.iter().all(|e| {
        eligibility::can_take(
            snapshot.student.major,
            e.course.major,
            e.course.id,
            &snapshot.major_requirements,
            taken.contains(&e.course.id),
        )
    });
    if !eligible {
        return CheckOutcome::Rejected(RejectReason::NotEligible);
    }

    if !capacity::all_sections_have_seats(&batch) {
        return CheckOutcome::Rejected(RejectReason::NoSeats);
    }

    let passed = snapshot.passed_courses();
    if !prerequisites::prerequisites_met(&passed, batch.iter().map(|e| &e.course)) {
        return CheckOutcome::Rejected(RejectReason::PrereqNotMet);
    }

    let pending_ids: Vec<CourseId> = snapshot.pending.iter().map(|e| e.course.id).collect();
    if duplicates::has_duplicate_course(&pending_ids) {
        return CheckOutcome::Rejected(RejectReason::DuplicateCourse);
    }

    let pending_courses: Vec<&Course> = snapshot.pending.iter().map(|e| &e.course).collect();
    if !credits::within_credit_bound(pending_courses) {
        return CheckOutcome::Rejected(RejectReason::CreditExceeded);
    }

    CheckOutcome::Accepted
}
