use std::collections::HashSet;

use crate::models::{CourseId, MajorId};

/// Un estudiante puede tomar un curso si nunca lo ha cursado (cualquier nota
/// bloquea el retake) y el curso es de su major o está en los requisitos de
/// su major.
pub fn can_take(
    student_major: MajorId,
    course_major: MajorId,
    course_id: CourseId,
    major_requirements: &HashSet<CourseId>,
    already_taken: bool,
) -> bool {
    if already_taken {
        return false;
    }
    course_major == student_major || major_requirements.contains(&course_id)
}
