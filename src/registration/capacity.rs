use crate::models::{Capacity, PendingEntry, Section};

pub fn has_open_seats(section: &Section) -> bool {
    match section.capacity {
        Capacity::Unlimited => true,
        Capacity::Limited(cap) => section.current_enroll < cap,
    }
}

/// Un lote vacío no está disponible: inscribir nada no está permitido.
pub fn all_sections_have_seats(batch: &[PendingEntry]) -> bool {
    !batch.is_empty()
        && batch
            .iter()
            .all(|e| has_open_seats(&e.lecture) && has_open_seats(&e.quiz))
}
