//! Prompt assembly for the critical advisor.
//!
//! The advisor plays a critical sociologist and ethicist auditing the
//! register project. Two shapes are produced:
//! - an opening analysis of a topic, when the user has not said anything yet
//! - a reply to an interpellation, when there is user text

use crate::topic::{Challenge, FreeformContext, Topic};

/// Persona shared by every prompt.
pub const CRITIC_PERSONA: &str = "You are a critical sociologist and ethicist auditing a public \
reliability register that scores citizens on their debts. You are not here to help the project \
succeed. You expose its systemic risks, its structural blind spots and the power it hands to \
whoever validates the data.";

/// Builds system and user prompts for a topic.
pub struct PromptBuilder;

impl PromptBuilder {
    /// System prompt shared by every request.
    pub fn system_prompt() -> String {
        let mut prompt = String::new();
        prompt.push_str(CRITIC_PERSONA);
        prompt.push_str("\n\n## STYLE\n\n");
        prompt.push_str("- Academic and incisive. No reassurance, no marketing tone.\n");
        prompt.push_str("- Short paragraphs, at most 200 words.\n");
        prompt.push_str("- Name concrete failure modes rather than abstract concerns.\n");
        prompt
    }

    /// User prompt for `topic`, with or without user text.
    pub fn build(topic: &Topic, user_text: Option<&str>) -> String {
        let user_text = user_text.map(str::trim).filter(|t| !t.is_empty());

        match (topic, user_text) {
            (Topic::NamedChallenge(challenge), None) => Self::challenge_analysis(challenge),
            (Topic::Freeform(context), None) => Self::context_analysis(context),
            (topic, Some(text)) => Self::interpellation(topic, text),
        }
    }

    /// Opening analysis of a catalogued challenge.
    ///
    /// The proposed solution is presented as something to dismantle, not to
    /// endorse.
    pub fn challenge_analysis(challenge: &Challenge) -> String {
        let mut prompt = String::new();

        prompt.push_str("# CRITICAL ANALYSIS REQUEST\n\n");
        prompt.push_str(&format!(
            "**Topic** [{}]: {}\n",
            challenge.category.label(),
            challenge.title
        ));
        prompt.push_str(&format!("**Problem**: {}\n", challenge.problem));
        prompt.push_str(&format!("**Open question**: {}\n", challenge.question));
        prompt.push_str(&format!("**Proposed answer**: {}\n\n", challenge.solution));

        prompt.push_str("## Required analysis\n\n");
        prompt.push_str("1. Deconstruct the proposed answer. Why is it insufficient or naive?\n");
        prompt.push_str("2. Identify the perverse effects it would produce in practice.\n");
        prompt.push_str("3. Close with one uncomfortable question the designers avoid.\n");

        prompt
    }

    /// Opening analysis of freeform context.
    pub fn context_analysis(context: &FreeformContext) -> String {
        let mut prompt = String::new();

        prompt.push_str("# CRITICAL ANALYSIS REQUEST\n\n");
        prompt.push_str(&format!("**Context** [{}]: {}\n\n", context.heading, context.text));
        prompt.push_str("## Required analysis\n\n");
        prompt.push_str("1. What does this situation reveal about the register's logic?\n");
        prompt.push_str("2. Who gains power from recording it, and who loses it?\n");

        prompt
    }

    /// Reply to a user interpellation about `topic`.
    pub fn interpellation(topic: &Topic, user_text: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str("# INTERPELLATION\n\n");
        match topic {
            Topic::NamedChallenge(challenge) => {
                prompt.push_str(&format!("**Context**: {}\n", challenge.title));
                prompt.push_str(&format!("**Problem**: {}\n", challenge.problem));
            }
            Topic::Freeform(context) => {
                prompt.push_str(&format!("**Context**: {}\n", context.heading));
                prompt.push_str(&format!("**Problem**: {}\n", context.text));
            }
        }
        prompt.push_str(&format!("**User says**: {}\n\n", user_text));
        prompt.push_str(
            "Answer as the critic. Challenge the assumptions behind the user's words \
             and stay on the register's systemic risks.\n",
        );

        prompt
    }
}
