use serde::Serialize;

use crate::{
    models::domain::{OptionLabel, QuizRecord},
    session::DisplayMapping,
};

/// What the user picked for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub display_label: OptionLabel,
    pub original_label: OptionLabel,
    pub is_correct: bool,
}

/// 1-based position and running score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub number: usize,
    pub total: usize,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedOption {
    pub label: OptionLabel,
    pub original_label: OptionLabel,
    pub text: String,
}

/// Everything needed to render the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub number: usize,
    pub total: usize,
    pub question: String,
    pub options: Vec<DisplayedOption>,
    pub selected: Option<OptionLabel>,
    pub score: u32,
}

impl QuestionView {
    pub(crate) fn build(
        record: &QuizRecord,
        mapping: &DisplayMapping,
        index: usize,
        total: usize,
        selected: Option<OptionLabel>,
        score: u32,
    ) -> Self {
        let options = mapping
            .entries()
            .map(|(label, original_label)| DisplayedOption {
                label,
                original_label,
                text: record.options.get(original_label).to_string(),
            })
            .collect();

        Self {
            number: index + 1,
            total,
            question: record.question.clone(),
            options,
            selected,
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionExplanationView {
    pub label: OptionLabel,
    pub original_label: OptionLabel,
    pub text: String,
    pub explanation: Option<String>,
    pub is_correct: bool,
    pub was_wrong_choice: bool,
}

/// Result of a submit, with the per-option rationale re-keyed from the
/// model's labels to the labels the user saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub selected: OptionLabel,
    pub correct_label: OptionLabel,
    pub explanation: String,
    pub option_explanations: Vec<OptionExplanationView>,
}

impl AnswerFeedback {
    pub(crate) fn build(record: &QuizRecord, mapping: &DisplayMapping, selected: OptionLabel) -> Self {
        let is_correct = mapping.is_correct(selected);
        let option_explanations = mapping
            .entries()
            .map(|(label, original_label)| OptionExplanationView {
                label,
                original_label,
                text: record.options.get(original_label).to_string(),
                explanation: record
                    .option_explanations
                    .get(original_label)
                    .map(str::to_string),
                is_correct: original_label == record.correct_answer,
                was_wrong_choice: label == selected && !is_correct,
            })
            .collect();

        Self {
            is_correct,
            selected,
            correct_label: mapping.correct_display_label(),
            explanation: record.explanation.clone(),
            option_explanations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewOption {
    pub label: OptionLabel,
    pub text: String,
    pub explanation: Option<String>,
    pub is_correct: bool,
    pub was_chosen: bool,
}

/// One row of the post-quiz answer review, keyed by the original labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub number: usize,
    pub question: String,
    pub chosen_text: Option<String>,
    pub correct_text: String,
    pub is_correct: bool,
    pub explanation: String,
    pub options: Vec<ReviewOption>,
}

impl ReviewItem {
    pub(crate) fn build(index: usize, record: &QuizRecord, answer: Option<&AnswerRecord>) -> Self {
        let chosen = answer.map(|a| a.original_label);
        let options = record
            .options
            .iter()
            .map(|(label, text)| ReviewOption {
                label,
                text: text.to_string(),
                explanation: record.option_explanations.get(label).map(str::to_string),
                is_correct: label == record.correct_answer,
                was_chosen: chosen == Some(label),
            })
            .collect();

        Self {
            number: index + 1,
            question: record.question.clone(),
            chosen_text: chosen.map(|label| record.options.get(label).to_string()),
            correct_text: record.correct_text().to_string(),
            is_correct: answer.is_some_and(|a| a.is_correct),
            explanation: record.explanation.clone(),
            options,
        }
    }
}
