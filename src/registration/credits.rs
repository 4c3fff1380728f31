use crate::models::Course;

/// Máximo de créditos por trimestre (added + registered).
pub const CREDIT_BOUND: u64 = 18;

/// Suma en `u64`: cada curso aporta a lo más `u32::MAX`, así que no desborda.
pub fn total_credits<'a, I>(courses: I) -> u64
where
    I: IntoIterator<Item = &'a Course>,
{
    courses.into_iter().map(|c| u64::from(c.credit)).sum()
}

pub fn within_credit_bound<'a, I>(courses: I) -> bool
where
    I: IntoIterator<Item = &'a Course>,
{
    total_credits(courses) <= CREDIT_BOUND
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: i64, credit: u32) -> Course {
        Course { id, name: format!("C {}", id), major: 1, credit, prerequisites: vec![] }
    }

    #[test]
    fn creditos_enormes_no_desbordan() {
        let huge = u32::MAX / 2 + 1;
        let courses = vec![course(1, huge), course(2, huge)];
        assert_eq!(total_credits(&courses), 1u64 << 32);
        assert!(!within_credit_bound(&courses));
    }

    #[test]
    fn tope_inclusivo() {
        assert!(within_credit_bound(&[course(1, 18)]));
        assert!(!within_credit_bound(&[course(1, 18), course(2, 1)]));
    }
}
