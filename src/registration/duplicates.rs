use std::collections::HashSet;

use crate::models::CourseId;

/// True si algún curso aparece más de una vez en el conjunto pendiente.
pub fn has_duplicate_course(course_ids: &[CourseId]) -> bool {
    let mut seen: HashSet<CourseId> = HashSet::with_capacity(course_ids.len());
    course_ids.iter().any(|id| !seen.insert(*id))
}
