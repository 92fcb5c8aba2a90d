use crate::models::PersonalityType;

/// Number of dichotomy axes in a personality code.
const CODE_AXES: usize = 4;

/// Graded similarity between two personality categories, in [0, 1].
///
/// Equal categories score 1.0. Unequal categories score the fraction of
/// matching positions in their four-letter codes, so neighbouring
/// temperaments land between 0 and 1 instead of dropping straight to zero.
/// Symmetric and side-effect free.
#[inline]
pub fn similarity(a: PersonalityType, b: PersonalityType) -> f64 {
    let code_a = a.code().as_bytes();
    let code_b = b.code().as_bytes();

    let matching = code_a
        .iter()
        .zip(code_b.iter())
        .filter(|(x, y)| x == y)
        .count();

    matching as f64 / CODE_AXES as f64
}

/// Similarity with absence handling: a missing type on either side scores 0.
#[inline]
pub fn similarity_opt(a: Option<PersonalityType>, b: Option<PersonalityType>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => similarity(a, b),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_reflexive() {
        for kind in PersonalityType::ALL {
            assert_eq!(similarity(kind, kind), 1.0);
        }
    }

    #[test]
    fn test_similarity_symmetric() {
        for a in PersonalityType::ALL {
            for b in PersonalityType::ALL {
                assert_eq!(similarity(a, b), similarity(b, a));
            }
        }
    }

    #[test]
    fn test_similarity_bounded() {
        for a in PersonalityType::ALL {
            for b in PersonalityType::ALL {
                let s = similarity(a, b);
                assert!((0.0..=1.0).contains(&s));
            }
        }
    }

    #[test]
    fn test_similarity_graded_for_unequal_types() {
        // INTJ vs ENFP share only the N axis.
        let s = similarity(PersonalityType::Analytical, PersonalityType::Creative);
        assert_eq!(s, 0.25);

        // INTJ vs ENTJ share N, T and J.
        let s = similarity(PersonalityType::Analytical, PersonalityType::Leader);
        assert_eq!(s, 0.75);
    }

    #[test]
    fn test_similarity_absent_is_zero() {
        assert_eq!(similarity_opt(None, Some(PersonalityType::Leader)), 0.0);
        assert_eq!(similarity_opt(Some(PersonalityType::Leader), None), 0.0);
        assert_eq!(similarity_opt(None, None), 0.0);
    }
}
