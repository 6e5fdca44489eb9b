use crate::constants::quiz_prompt::{
    OUTPUT_FORMAT_RULES, QUIZ_GENERATOR_ROLE, QUIZ_JSON_SCHEMA, SOURCE_ONLY_RULES,
};

/// Builds the generation instruction for `count` questions over
/// `study_text`. Never fails; rejecting empty text is the caller's job.
pub fn build_quiz_prompt(study_text: &str, count: u32) -> String {
    format!(
        "{role} Based on the study material below, create {count} multiple-choice questions.\n\n\
         Study material: {study_text}\n\n\
         {source_rules}\n\n\
         Answer in the following JSON format:\n\
         {schema}\n\n\
         ### Output Rules:\n\n\
         - Create {count} questions.\n\
         {format_rules}\n\
         - If the study material cannot support {count} distinct questions, create only as many as it can support.",
        role = QUIZ_GENERATOR_ROLE,
        count = count,
        study_text = study_text,
        source_rules = SOURCE_ONLY_RULES,
        schema = QUIZ_JSON_SCHEMA,
        format_rules = OUTPUT_FORMAT_RULES,
    )
}
