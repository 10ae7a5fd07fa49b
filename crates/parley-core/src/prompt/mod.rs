//! Instruction composition.
//!
//! `PromptComposer` is a pure templating layer: it turns persona
//! attributes, scenario text and conversation state into the instruction
//! strings handed to the generative provider. It performs no I/O and holds
//! no mutable state, which keeps persona behavior testable without a real
//! provider.

mod templates;

use minijinja::{context, Environment};
use once_cell::sync::Lazy;

use crate::error::{ParleyError, Result};
use crate::memory::{CustomSetup, PersonaTuning};
use crate::persona::{PersonaCatalog, PersonaDefinition};

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("persona", templates::PERSONA)
        .expect("persona template");
    env.add_template("custom", templates::CUSTOM)
        .expect("custom template");
    env.add_template("coordinator", templates::COORDINATOR)
        .expect("coordinator template");
    env.add_template("feedback", templates::FEEDBACK)
        .expect("feedback template");
    env.add_template("evaluation", templates::EVALUATION)
        .expect("evaluation template");
    env.add_template("summary", templates::SUMMARY)
        .expect("summary template");
    env.add_template("scenario_pair", templates::SCENARIO_PAIR)
        .expect("scenario_pair template");
    env.add_template("scenario_role", templates::SCENARIO_ROLE)
        .expect("scenario_role template");
    env
});

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    let template = ENV
        .get_template(name)
        .map_err(|e| ParleyError::internal(format!("missing template '{}': {}", name, e)))?;
    Ok(template.render(ctx)?)
}

/// Pure composition of provider instructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Catalog-mode persona instruction.
    ///
    /// Fails with `UnknownPersona` when the key does not resolve; empty
    /// goals/motivations get the generic placeholders the personas expect.
    pub fn persona_prompt(
        &self,
        persona_key: &str,
        scenario: &str,
        tuning: &PersonaTuning,
    ) -> Result<String> {
        let persona = PersonaCatalog::get(persona_key)
            .ok_or_else(|| ParleyError::UnknownPersona(persona_key.to_string()))?;
        self.persona_prompt_for(persona, scenario, tuning)
    }

    /// Catalog-mode instruction for an already resolved definition.
    pub fn persona_prompt_for(
        &self,
        persona: &PersonaDefinition,
        scenario: &str,
        tuning: &PersonaTuning,
    ) -> Result<String> {
        let goals = if tuning.goals.trim().is_empty() {
            "Standard role goals"
        } else {
            tuning.goals.as_str()
        };
        let motivations = if tuning.motivations.trim().is_empty() {
            "None specified"
        } else {
            tuning.motivations.as_str()
        };
        render(
            "persona",
            context! {
                name => persona.name,
                role => persona.role,
                description => persona.description,
                scenario => scenario,
                frustration => tuning.frustration,
                goals => goals,
                motivations => motivations,
                traits => persona.traits_line(),
            },
        )
    }

    /// Custom-mode instruction parameterized by free-text personalities.
    pub fn custom_prompt(
        &self,
        setup: &CustomSetup,
        scenario: &str,
        frustration: f64,
    ) -> Result<String> {
        render(
            "custom",
            context! {
                partner_role => setup.partner_role,
                partner_personality => setup.partner_personality,
                user_role => setup.user_role,
                user_personality => setup.user_personality,
                scenario => scenario,
                frustration => frustration,
            },
        )
    }

    /// Decision-request instruction for the turn coordinator.
    ///
    /// Candidates are embedded as a JSON array of key/name/description so
    /// the model answers with one of the listed keys.
    pub fn coordinator_prompt(
        &self,
        candidates: &[&PersonaDefinition],
        scenario: &str,
        user_message: &str,
    ) -> Result<String> {
        let listed: Vec<serde_json::Value> = candidates
            .iter()
            .map(|p| {
                serde_json::json!({
                    "key": p.key,
                    "name": p.name,
                    "description": p.description,
                })
            })
            .collect();
        let candidates_json = serde_json::to_string_pretty(&listed)?;
        render(
            "coordinator",
            context! {
                scenario => scenario,
                candidates => candidates_json,
                user_message => user_message,
            },
        )
    }

    /// Instant-feedback scoring instruction for one user message.
    pub fn feedback_prompt(&self, user_message: &str, scenario: &str) -> Result<String> {
        render(
            "feedback",
            context! { scenario => scenario, user_message => user_message },
        )
    }

    /// End-of-session evaluation instruction over the full transcript.
    pub fn evaluation_prompt(
        &self,
        conversation: &str,
        scenario: &str,
        custom: Option<&CustomSetup>,
    ) -> Result<String> {
        let user_context = match custom {
            Some(setup) => format!(
                "\nUSER CONTEXT:\nRole: {}\nTarget Personality: {}\nEvaluate if they acted according to their role and managed their personality traits effectively.\n",
                setup.user_role, setup.user_personality
            ),
            None => String::new(),
        };
        render(
            "evaluation",
            context! {
                scenario => scenario,
                user_context => user_context,
                conversation => conversation,
            },
        )
    }

    /// Executive-summary instruction over the full transcript.
    pub fn summary_prompt(&self, conversation: &str, scenario: &str) -> Result<String> {
        render(
            "summary",
            context! { scenario => scenario, conversation => conversation },
        )
    }

    /// Scenario-generation instruction, targeted when both roles are known.
    pub fn scenario_prompt(
        &self,
        role: &str,
        difficulty: &str,
        user_role: Option<&str>,
        partner_role: Option<&str>,
    ) -> Result<String> {
        match (user_role, partner_role) {
            (Some(user_role), Some(partner_role)) => render(
                "scenario_pair",
                context! {
                    user_role => user_role,
                    partner_role => partner_role,
                    difficulty => difficulty,
                },
            ),
            _ => render(
                "scenario_role",
                context! { role => role, difficulty => difficulty },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_prompt_embeds_identity_and_frustration() {
        let composer = PromptComposer::new();
        let prompt = composer
            .persona_prompt("CFO", "Quarterly budget review", &PersonaTuning::with_frustration(0.7))
            .unwrap();

        assert!(prompt.contains("You are CFO, a Chief Financial Officer"));
        assert!(prompt.contains("SCENARIO: Quarterly budget review"));
        assert!(prompt.contains("Frustration: 0.7/1.0"));
        assert!(prompt.contains("Frugal, Analytical, Risk-averse, ROI-focused, Detail-oriented"));
        // Frustration-conditioned directives and the tone rules ride along.
        assert!(prompt.contains("If High (>0.5): Be pushy."));
        assert!(prompt.contains("If Low (<0.3): Be helpful."));
        assert!(prompt.contains("LENGTH: 2-4 sentences."));
        assert!(prompt.contains("NO AI-ISMS."));
        assert!(prompt.contains("IF USER IS DISMISSIVE/LAZY"));
    }

    #[test]
    fn test_persona_prompt_defaults_goals_and_motivations() {
        let composer = PromptComposer::new();
        let prompt = composer
            .persona_prompt("CEO", "Launch delay", &PersonaTuning::default())
            .unwrap();

        assert!(prompt.contains("Goals: Standard role goals"));
        assert!(prompt.contains("Motivations: None specified"));
    }

    #[test]
    fn test_persona_prompt_unknown_key() {
        let composer = PromptComposer::new();
        let err = composer
            .persona_prompt("Janitor", "Launch delay", &PersonaTuning::default())
            .unwrap_err();
        assert!(matches!(err, ParleyError::UnknownPersona(key) if key == "Janitor"));
    }

    #[test]
    fn test_custom_prompt_uses_personality_descriptors() {
        let composer = PromptComposer::new();
        let setup = CustomSetup {
            user_role: "PM".to_string(),
            user_personality: "calm".to_string(),
            partner_role: "Sales Director".to_string(),
            partner_personality: "pushy".to_string(),
        };
        let prompt = composer.custom_prompt(&setup, "Renewal talks", 0.4).unwrap();

        assert!(prompt.contains("You are Sales Director in a corporate setting."));
        assert!(prompt.contains("Personality: pushy"));
        assert!(prompt.contains("USER: PM (calm)"));
        assert!(prompt.contains("ACT YOUR PERSONALITY"));
    }

    #[test]
    fn test_coordinator_prompt_lists_candidates() {
        let composer = PromptComposer::new();
        let candidates = vec![
            PersonaCatalog::get("CEO").unwrap(),
            PersonaCatalog::get("CFO").unwrap(),
        ];
        let prompt = composer
            .coordinator_prompt(&candidates, "Budget cut", "We need to slip the date")
            .unwrap();

        assert!(prompt.contains("\"key\": \"CEO\""));
        assert!(prompt.contains("\"key\": \"CFO\""));
        assert!(prompt.contains("USER JUST SAID: We need to slip the date"));
        assert!(prompt.contains("Respond ONLY with a JSON object"));
    }

    #[test]
    fn test_evaluation_prompt_includes_custom_user_context() {
        let composer = PromptComposer::new();
        let setup = CustomSetup {
            user_role: "PM".to_string(),
            user_personality: "assertive".to_string(),
            partner_role: "CTO".to_string(),
            partner_personality: "skeptical".to_string(),
        };
        let prompt = composer
            .evaluation_prompt("User: hi", "Scope cut", Some(&setup))
            .unwrap();
        assert!(prompt.contains("USER CONTEXT:"));
        assert!(prompt.contains("Target Personality: assertive"));

        let plain = composer.evaluation_prompt("User: hi", "Scope cut", None).unwrap();
        assert!(!plain.contains("USER CONTEXT:"));
    }

    #[test]
    fn test_scenario_prompt_modes() {
        let composer = PromptComposer::new();
        let pair = composer
            .scenario_prompt("pm", "hard", Some("PM"), Some("CFO"))
            .unwrap();
        assert!(pair.contains("between a PM (User) and a CFO (Partner)"));

        let generic = composer.scenario_prompt("pm", "easy", None, None).unwrap();
        assert!(generic.contains("involving a pm"));
    }
}
