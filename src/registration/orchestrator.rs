// Check + commit de una inscripción dentro de una sola transacción IMMEDIATE.
//
// BEGIN IMMEDIATE toma el lock de escritura al inicio, así dos inscripciones
// concurrentes se serializan y el chequeo de cupos no puede quedar obsoleto
// antes del incremento de `current_enroll`.
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::error::StoreError;
use crate::models::StudentId;
use crate::registration::pipeline::{CheckOutcome, register_check};
use crate::store::{insertions, queries};

/// Plazo de un request.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Deadline { at: Instant::now() + budget }
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn check(&self, stage: &'static str) -> Result<(), StoreError> {
        if Instant::now() >= self.at {
            return Err(StoreError::DeadlineExceeded { stage });
        }
        Ok(())
    }
}

/// Resultado visible para el cliente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationOutcome {
    pub is_possible: bool,
    pub note: &'static str,
    pub code: &'static str,
    pub confirmation_code: Option<i64>,
}

impl RegistrationOutcome {
    fn from_check(outcome: CheckOutcome, confirmation_code: Option<i64>) -> Self {
        RegistrationOutcome {
            is_possible: outcome.is_possible(),
            note: outcome.note(),
            code: outcome.code(),
            confirmation_code,
        }
    }
}

/// Lee el lote "added" del estudiante, corre las seis reglas y, si pasan,
/// registra el lote. Un rechazo o cualquier error deja la base intacta.
pub fn register(
    conn: &mut Connection,
    netid: StudentId,
    deadline: &Deadline,
) -> Result<RegistrationOutcome, StoreError> {
    deadline.check("begin")?;
    conn.busy_timeout(deadline.remaining())?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    deadline.check("load")?;
    let snapshot = queries::load_registration_snapshot(&tx, netid)?;

    deadline.check("check")?;
    let outcome = register_check(&snapshot);
    if let CheckOutcome::Rejected(reason) = outcome {
        tx.rollback()?;
        tracing::info!(netid, code = reason.code(), "registration rejected");
        return Ok(RegistrationOutcome::from_check(outcome, None));
    }

    let batch = snapshot.batch();
    deadline.check("commit")?;
    let code = insertions::record_registration(&tx, netid, &batch)?;
    insertions::commit_registration(&tx, netid, code, &batch)?;
    tx.commit()?;

    tracing::info!(netid, confirmation_code = code, sections = batch.len(), "registration committed");
    Ok(RegistrationOutcome::from_check(outcome, Some(code)))
}
