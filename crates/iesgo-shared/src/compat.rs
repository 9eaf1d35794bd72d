//! Cosmetic compatibility badge shown on candidate cards.
//!
//! Nothing here feeds into the match decision.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    pub score: u8,
    pub label: String,
}

impl Compatibility {
    fn new(score: u8, label: impl Into<String>) -> Self {
        Self {
            score,
            label: label.into(),
        }
    }
}

const AGRARIAN: &[&str] = &["Agronomia", "Medicina Veterinária"];
const HEALTH: &[&str] = &[
    "Biomedicina",
    "Enfermagem",
    "Farmácia",
    "Fisioterapia",
    "Medicina Veterinária",
];
const TECH: &[&str] = &["Bacharelado em Sistema de Informação"];

/// Score shown when either side has no course.
pub fn mystery() -> Compatibility {
    Compatibility::new(65, "Match Misterioso")
}

/// Course-pair lookup; unmatched pairs draw a score in `[50, 75]`.
pub fn score<R: Rng + ?Sized>(me: &User, candidate: &User, rng: &mut R) -> Compatibility {
    let (Some(c1), Some(c2)) = (me.course.as_deref(), candidate.course.as_deref()) else {
        return mystery();
    };

    let both_in = |set: &[&str]| set.contains(&c1) && set.contains(&c2);

    if c1 == c2 {
        return Compatibility::new(85, format!("Casal {c1}"));
    }
    if both_in(AGRARIAN) {
        return Compatibility::new(95, "Casal Agro 🚜");
    }
    if both_in(HEALTH) {
        return Compatibility::new(80, "Plantão Juntos 🏥");
    }
    if matches!((c1, c2), ("Direito", "Psicologia") | ("Psicologia", "Direito")) {
        return Compatibility::new(92, "Debate & Terapia 🧠⚖️");
    }
    if both_in(TECH) {
        return Compatibility::new(88, "Debugando o Amor 💻");
    }

    Compatibility::new(rng.gen_range(50..=75), "Opostos se Atraem")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_profile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn with_course(course: Option<&str>) -> User {
        let mut u = default_profile("x@y.z");
        u.course = course.map(String::from);
        u
    }

    fn check(a: &str, b: &str) -> Compatibility {
        let mut rng = StdRng::seed_from_u64(7);
        score(&with_course(Some(a)), &with_course(Some(b)), &mut rng)
    }

    #[test]
    fn test_table_entries() {
        assert_eq!(check("Direito", "Direito"), Compatibility::new(85, "Casal Direito"));
        assert_eq!(check("Agronomia", "Medicina Veterinária").score, 95);
        assert_eq!(check("Enfermagem", "Farmácia").score, 80);
        assert_eq!(check("Psicologia", "Direito").score, 92);
        assert_eq!(check("Direito", "Psicologia").score, 92);
    }

    #[test]
    fn test_agro_wins_over_health() {
        // Medicina Veterinária is in both sets
        assert_eq!(check("Medicina Veterinária", "Agronomia").label, "Casal Agro 🚜");
        assert_eq!(check("Medicina Veterinária", "Biomedicina").label, "Plantão Juntos 🏥");
    }

    #[test]
    fn test_fallback_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let me = with_course(Some("Pedagogia"));
        let other = with_course(Some("Ciências Contábeis"));
        for _ in 0..200 {
            let c = score(&me, &other, &mut rng);
            assert!((50..=75).contains(&c.score));
            assert_eq!(c.label, "Opostos se Atraem");
        }
    }

    #[test]
    fn test_missing_course_is_mystery() {
        let mut rng = StdRng::seed_from_u64(1);
        let c = score(&with_course(None), &with_course(Some("Direito")), &mut rng);
        assert_eq!(c, mystery());
    }
}
