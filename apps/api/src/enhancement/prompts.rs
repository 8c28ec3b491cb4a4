// Per-field rewrite prompts.

use crate::enhancement::Field;
use crate::llm_client::prompts::NO_INVENTION_INSTRUCTION;
use crate::llm_client::CallOptions;

pub fn build_prompt(field: &Field, text: &str) -> String {
    match field {
        Field::Summary { professional_title } => format!(
            "Rewrite this personal summary for a CV.\n\n\
             Professional title: {professional_title}\n\
             Original summary: \"{text}\"\n\n\
             Guidelines:\n\
             1. Keep it professional but personal.\n\
             2. Highlight strengths and the value the candidate brings to an employer.\n\
             3. Use active, confident language.\n\
             4. At most 3-4 lines.\n\n\
             {NO_INVENTION_INSTRUCTION}"
        ),
        Field::ProfessionalTitle => format!(
            "Rewrite this professional title so it reads well as a CV headline.\n\n\
             Original title: \"{text}\"\n\n\
             Keep it to a few words. Reply with the title only.\n\n\
             {NO_INVENTION_INSTRUCTION}"
        ),
        Field::WorkDescription { position, company } => format!(
            "Rewrite this informal job description as a professional CV entry \
             in the Harvard style.\n\n\
             Position: {position}\n\
             Company: {company}\n\
             Original description: \"{text}\"\n\n\
             Guidelines:\n\
             1. Start sentences with past-tense action verbs (developed, led, optimized).\n\
             2. Focus on results and impact.\n\
             3. Keep a professional but natural tone.\n\
             4. At most 3-4 lines.\n\n\
             {NO_INVENTION_INSTRUCTION}"
        ),
        Field::Degree { institution } => format!(
            "Rewrite this degree name in its formal, conventional form for a CV.\n\n\
             Institution: {institution}\n\
             Original degree: \"{text}\"\n\n\
             Reply with the degree name only.\n\n\
             {NO_INVENTION_INSTRUCTION}"
        ),
        Field::SkillList { category } => format!(
            "Polish this comma-separated list of {category} skills for a CV. \
             Use the conventional spelling of each skill and remove duplicates.\n\n\
             Original list: {text}\n\n\
             Reply with a single comma-separated list and nothing else.\n\n\
             {NO_INVENTION_INSTRUCTION}"
        ),
    }
}

pub fn call_options(field: &Field) -> CallOptions {
    let max_tokens = match field {
        Field::Summary { .. } => 150,
        Field::WorkDescription { .. } => 200,
        Field::SkillList { .. } => 150,
        Field::ProfessionalTitle | Field::Degree { .. } => 40,
    };
    CallOptions {
        max_tokens,
        ..CallOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::SkillCategory;

    #[test]
    fn test_description_prompt_carries_context() {
        let prompt = build_prompt(
            &Field::WorkDescription {
                position: "Engineer".to_string(),
                company: "Acme".to_string(),
            },
            "fixed bugs",
        );
        assert!(prompt.contains("Position: Engineer"));
        assert!(prompt.contains("Company: Acme"));
        assert!(prompt.contains("\"fixed bugs\""));
    }

    #[test]
    fn test_skill_prompt_names_category() {
        let prompt = build_prompt(
            &Field::SkillList {
                category: SkillCategory::Soft,
            },
            "Teamwork, Tact",
        );
        assert!(prompt.contains("soft skills"));
        assert!(prompt.contains("comma-separated"));
    }

    #[test]
    fn test_short_fields_get_small_budgets() {
        assert_eq!(call_options(&Field::ProfessionalTitle).max_tokens, 40);
        assert!(
            call_options(&Field::WorkDescription {
                position: String::new(),
                company: String::new()
            })
            .max_tokens
                > 100
        );
    }
}
