use std::collections::HashSet;

use crate::models::{Course, CourseId};

/// Todos los prerequisitos de todos los cursos objetivo deben estar en
/// `passed` (nota > 2.0, cualquier término). Falta uno y falla el lote.
pub fn prerequisites_met<'a, I>(passed: &HashSet<CourseId>, targets: I) -> bool
where
    I: IntoIterator<Item = &'a Course>,
{
    targets
        .into_iter()
        .all(|c| c.prerequisites.iter().all(|p| passed.contains(p)))
}
