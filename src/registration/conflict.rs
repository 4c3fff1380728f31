// Funciones para detectar conflictos de horario entre secciones pendientes.
use crate::models::{Interval, PendingEntry};

/// True si las dos franjas chocan.
///
/// Primero se descarta por paridad del código de días (grupo tipo MWF vs tipo
/// TTH); si la paridad coincide se compara el eje de minutos con el predicado
/// `(a.start ∈ [b.start, b.end]) || (a.start <= b.start && a.end >= b.start)`.
/// Los extremos que se tocan cuentan como choque.
pub fn conflicts(a: &Interval, b: &Interval) -> bool {
    if a.day.parity() != b.day.parity() {
        return false;
    }
    (a.start >= b.start && a.start <= b.end) || (a.start <= b.start && a.end >= b.start)
}

/// Compara dos pares cátedra+quiz: lecture-lecture, lecture-quiz,
/// quiz-lecture y quiz-quiz. Basta un choque.
pub fn pair_conflicts(a: &PendingEntry, b: &PendingEntry) -> bool {
    let a_slots = [&a.lecture.schedule, &a.quiz.schedule];
    let b_slots = [&b.lecture.schedule, &b.quiz.schedule];
    a_slots
        .iter()
        .any(|x| b_slots.iter().any(|y| conflicts(x, y)))
}

/// Revisa todos los pares (i, j), i < j, del conjunto pendiente completo.
pub fn has_time_conflict(pending: &[PendingEntry]) -> bool {
    for (i, a) in pending.iter().enumerate() {
        for b in &pending[i + 1..] {
            if pair_conflicts(a, b) {
                return true;
            }
        }
    }
    false
}
