use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::domain::{OptionExplanations, OptionLabel, QuizOptions, QuizRecord};

/// A quiz element exactly as the model wrote it, before the four-option
/// shape and the correct-answer invariant are checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuizRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub question: String,
    pub options: BTreeMap<String, String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub option_explanations: Option<BTreeMap<String, String>>,
}

impl RawQuizRecord {
    /// Validates the record. `position` is the 0-based index in the reply
    /// and becomes the id when the model omitted a usable one.
    pub fn into_record(self, position: usize) -> Result<QuizRecord, String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }

        if self.options.len() != OptionLabel::ALL.len() {
            return Err(format!(
                "expected exactly four options, found {}",
                self.options.len()
            ));
        }

        let mut slots: [Option<String>; 4] = Default::default();
        for (key, text) in self.options {
            let label: OptionLabel = key.parse().map_err(|e| format!("option label {}", e))?;
            if slots[label.index()].replace(text).is_some() {
                return Err(format!("option {} appears more than once", label));
            }
        }
        let [Some(a), Some(b), Some(c), Some(d)] = slots else {
            return Err("options must be labelled A, B, C and D".to_string());
        };

        let correct_answer: OptionLabel = self
            .correct_answer
            .parse()
            .map_err(|e| format!("correctAnswer {}", e))?;

        let mut option_explanations = OptionExplanations::default();
        for (key, text) in self.option_explanations.unwrap_or_default() {
            match key.parse::<OptionLabel>() {
                Ok(label) => option_explanations.set(label, text),
                Err(_) => log::debug!("Ignoring explanation for unknown option '{}'", key),
            }
        }

        Ok(QuizRecord {
            id: parse_id(self.id.as_ref()).unwrap_or(position as u32 + 1),
            question: self.question,
            options: QuizOptions { a, b, c, d },
            correct_answer,
            explanation: self.explanation,
            option_explanations,
        })
    }
}

fn parse_id(value: Option<&serde_json::Value>) -> Option<u32> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
