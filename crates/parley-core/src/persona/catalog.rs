//! Static persona catalog.
//!
//! The catalog is a read-only registry of the built-in stakeholder
//! personas, built once on first access. Insertion order is preserved so
//! listings are stable across calls.

use once_cell::sync::Lazy;

use super::model::PersonaDefinition;

static CATALOG: Lazy<Vec<PersonaDefinition>> = Lazy::new(build_catalog);

/// Pure lookup table over the built-in personas.
///
/// Absence of a key is not an error; callers get `None` and decide what
/// that means for them (the prompt composer turns it into an
/// `UnknownPersona` failure, the coordinator silently skips the entry).
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonaCatalog;

impl PersonaCatalog {
    /// Returns all persona definitions in registration order.
    pub fn all() -> &'static [PersonaDefinition] {
        &CATALOG
    }

    /// Looks up a persona by its catalog key.
    pub fn get(key: &str) -> Option<&'static PersonaDefinition> {
        CATALOG.iter().find(|p| p.key == key)
    }
}

fn build_catalog() -> Vec<PersonaDefinition> {
    vec![
        PersonaDefinition::new(
            "CEO",
            "CEO",
            "Chief Executive Officer",
            "Chief Executive Officer",
            &["Visionary", "Demanding", "Impatient", "Strategic", "Big-picture thinker"],
            0.3,
        ),
        PersonaDefinition::new(
            "CTO",
            "CTO",
            "Chief Technology Officer",
            "Chief Technology Officer",
            &["Technical", "Pragmatic", "Skeptical", "Efficiency-focused", "Risk-averse"],
            0.2,
        ),
        PersonaDefinition::new(
            "CFO",
            "CFO",
            "Chief Financial Officer",
            "Chief Financial Officer",
            &["Frugal", "Analytical", "Risk-averse", "ROI-focused", "Detail-oriented"],
            0.4,
        ),
        PersonaDefinition::new(
            "CMO",
            "CMO",
            "Chief Marketing Officer",
            "Chief Marketing Officer",
            &["Creative", "Brand-conscious", "Enthusiastic", "Trend-aware", "Customer-centric"],
            0.2,
        ),
        PersonaDefinition::new(
            "CPO",
            "CPO",
            "Chief Product Officer",
            "Chief Product Officer",
            &["User-focused", "Strategic", "Collaborative", "Visionary", "Prioritization-master"],
            0.2,
        ),
        PersonaDefinition::new(
            "VP_Sales",
            "VP of Sales",
            "Vice President of Sales",
            "Vice President of Sales",
            &["Persuasive", "Revenue-focused", "Urgent", "Relationship-builder", "Quota-driven"],
            0.4,
        ),
        PersonaDefinition::new(
            "VP_Eng",
            "VP of Engineering",
            "Vice President of Engineering",
            "Vice President of Engineering",
            &["Process-oriented", "Team-focused", "Technical", "Reliable", "Structured"],
            0.3,
        ),
        PersonaDefinition::new(
            "VP_Product",
            "VP of Product",
            "Vice President of Product",
            "Vice President of Product",
            &["Strategic", "Analytical", "Market-savvy", "Decisive", "Leader"],
            0.2,
        ),
        PersonaDefinition::new(
            "Head_Design",
            "Head of Design",
            "Head of Design / UX",
            "Head of Design",
            &["Empathetic", "Aesthetic", "User-advocate", "Creative", "Perfectionist"],
            0.2,
        ),
        PersonaDefinition::new(
            "Head_HR",
            "Head of HR",
            "Head of Human Resources",
            "Head of Human Resources",
            &["People-focused", "Diplomatic", "Policy-minded", "Empathetic", "Culture-keeper"],
            0.1,
        ),
        PersonaDefinition::new(
            "Legal_Counsel",
            "Legal Counsel",
            "General Counsel / Legal",
            "Legal Counsel",
            &["Cautious", "Precise", "Risk-averse", "Formal", "Protective"],
            0.5,
        ),
        PersonaDefinition::new(
            "Data_Scientist",
            "Lead Data Scientist",
            "Lead Data Scientist",
            "Lead Data Scientist",
            &["Analytical", "Fact-based", "Logical", "Quiet", "Insightful"],
            0.1,
        ),
        PersonaDefinition::new(
            "Customer_Success",
            "VP of Customer Success",
            "VP of Customer Success",
            "VP of Customer Success",
            &["Customer-champion", "Proactive", "Problem-solver", "Empathetic", "Loyalty-focused"],
            0.3,
        ),
        PersonaDefinition::new(
            "Investor",
            "Lead Investor",
            "Board Member / Investor",
            "Investor",
            &["Results-oriented", "Impatient", "Financial-focus", "Direct", "High-expectations"],
            0.6,
        ),
        PersonaDefinition::new(
            "Angry_Customer",
            "Key Customer",
            "A very important but angry customer",
            "Customer",
            &["Frustrated", "Demanding", "Impatient", "Vocal", "Skeptical"],
            0.9,
        ),
        PersonaDefinition::new(
            "Employee",
            "Senior Employee",
            "A long-time employee",
            "Senior Employee",
            &["Loyal", "Resistant to change", "Experienced", "Vocal", "Union-focused"],
            0.4,
        ),
        PersonaDefinition::new(
            "Intern",
            "Summer Intern",
            "A new intern",
            "Intern",
            &["Eager", "Naive", "Questioning", "Energetic", "Learning"],
            0.1,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_all_builtin_personas() {
        assert_eq!(PersonaCatalog::all().len(), 17);
    }

    #[test]
    fn test_get_known_key() {
        let ceo = PersonaCatalog::get("CEO").unwrap();
        assert_eq!(ceo.name, "CEO");
        assert_eq!(ceo.role, "Chief Executive Officer");
        assert!((ceo.default_frustration - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_get_unknown_key_is_absent_not_error() {
        assert!(PersonaCatalog::get("Janitor").is_none());
    }

    #[test]
    fn test_frustration_within_unit_interval() {
        for persona in PersonaCatalog::all() {
            assert!((0.0..=1.0).contains(&persona.default_frustration), "{}", persona.key);
        }
    }

    #[test]
    fn test_traits_line_joins_with_commas() {
        let intern = PersonaCatalog::get("Intern").unwrap();
        assert_eq!(
            intern.traits_line(),
            "Eager, Naive, Questioning, Energetic, Learning"
        );
    }
}
