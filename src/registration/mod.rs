// Validación de inscripción: reglas independientes + orquestador.
pub mod capacity;
pub mod conflict;
pub mod credits;
pub mod duplicates;
pub mod eligibility;
pub mod orchestrator;
pub mod pipeline;
pub mod prerequisites;

pub use orchestrator::{Deadline, RegistrationOutcome, register};
pub use pipeline::{CheckOutcome, RejectReason, RegistrationSnapshot, register_check};
