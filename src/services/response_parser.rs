use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    errors::{QuizError, QuizResult},
    models::{domain::QuizSet, dto::quiz_dto::RawQuizRecord},
};

static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("OPENING_FENCE is a valid regex pattern")
});

static CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n?```\s*$").expect("CLOSING_FENCE is a valid regex pattern")
});

/// Turns raw model text into a validated quiz set.
///
/// Any invalid quiz element fails the whole parse with `UnexpectedShape`;
/// records are never silently dropped. An empty `quizzes` array is a valid
/// (if unusable) result.
pub fn parse_quiz_response(raw_text: &str) -> QuizResult<QuizSet> {
    let unfenced = strip_code_fence(raw_text.trim());

    let json_text = extract_json_object(unfenced).ok_or_else(|| {
        QuizError::malformed("The AI reply is not JSON: no JSON object was found")
    })?;

    let value: serde_json::Value = serde_json::from_str(json_text)
        .map_err(|e| QuizError::malformed(format!("The AI reply is not valid JSON: {}", e)))?;

    let quizzes = value
        .get("quizzes")
        .and_then(|q| q.as_array())
        .ok_or_else(|| {
            QuizError::unexpected_shape("The AI reply has no \"quizzes\" array")
        })?;

    let records = quizzes
        .iter()
        .enumerate()
        .map(|(position, element)| {
            serde_json::from_value::<RawQuizRecord>(element.clone())
                .map_err(|e| e.to_string())
                .and_then(|raw| raw.into_record(position))
                .map_err(|reason| {
                    QuizError::unexpected_shape(format!("Quiz {} is invalid: {}", position + 1, reason))
                })
        })
        .collect::<QuizResult<Vec<_>>>()?;

    log::debug!("Parsed {} quiz records from AI reply", records.len());
    Ok(QuizSet::new(records))
}

/// Removes a leading code fence (with or without a language tag) and the
/// matching trailing fence. Text without a leading fence is returned as is.
pub fn strip_code_fence(text: &str) -> &str {
    let Some(opening) = OPENING_FENCE.find(text) else {
        return text;
    };
    let body = &text[opening.end()..];
    match CLOSING_FENCE.find(body) {
        Some(closing) => body[..closing.start()].trim(),
        None => body.trim(),
    }
}

/// Slice from the first `{` to the last `}`, tolerating commentary around
/// the object.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
