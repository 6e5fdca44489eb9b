#[cfg(test)]
pub mod fixtures {
    use std::sync::Arc;

    use crate::{
        app_state::AppState,
        config::Config,
        models::domain::{OptionExplanations, OptionLabel, QuizOptions, QuizRecord, QuizSet},
        services::gateway::{MockModelTransport, TransportResponse},
    };

    /// State whose transport answers every call with `status` and `body`.
    pub fn state_responding(config: Config, status: u16, body: String) -> AppState {
        let mut transport = MockModelTransport::new();
        transport.expect_post_json().returning(move |_| {
            Ok(TransportResponse {
                status,
                body: body.clone(),
            })
        });
        AppState::with_transport(config, Arc::new(transport))
    }

    /// State whose transport must never be called.
    pub fn in_memory_state(config: Config) -> AppState {
        let mut transport = MockModelTransport::new();
        transport.expect_post_json().never();
        AppState::with_transport(config, Arc::new(transport))
    }

    /// A complete record with distinct option texts and all four rationales.
    pub fn sample_record(id: u32, correct: OptionLabel) -> QuizRecord {
        let mut option_explanations = OptionExplanations::default();
        for label in OptionLabel::ALL {
            let verdict = if label == correct { "Correct" } else { "Incorrect" };
            option_explanations.set(label, format!("{} for question {}.", verdict, id));
        }

        QuizRecord {
            id,
            question: format!("Sample question {}?", id),
            options: QuizOptions::new(
                format!("Option A{}", id),
                format!("Option B{}", id),
                format!("Option C{}", id),
                format!("Option D{}", id),
            ),
            correct_answer: correct,
            explanation: format!("Explanation for question {}.", id),
            option_explanations,
        }
    }

    /// `n` records numbered from 1, cycling the correct label through A..D.
    pub fn sample_quiz_set(n: usize) -> QuizSet {
        (0..n)
            .map(|i| sample_record(i as u32 + 1, OptionLabel::ALL[i % 4]))
            .collect::<Vec<_>>()
            .into()
    }

    /// Model reply for the single-question "The sky is blue." study text.
    pub fn sky_reply_json() -> String {
        r#"{"quizzes":[{"id":1,"question":"What color is the sky?","options":{"A":"Red","B":"Blue","C":"Green","D":"Yellow"},"correctAnswer":"B","explanation":"Stated directly.","optionExplanations":{"A":"Wrong.","B":"Correct.","C":"Wrong.","D":"Wrong."}}]}"#
            .to_string()
    }

    /// Wraps `text` the way the provider returns generated content.
    pub fn gemini_envelope(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": text }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::OptionLabel;

    #[test]
    fn sample_quiz_set_cycles_correct_labels() {
        let set = sample_quiz_set(5);
        let labels: Vec<_> = set.iter().map(|r| r.correct_answer).collect();
        assert_eq!(
            labels,
            vec![OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D, OptionLabel::A]
        );
        assert_eq!(set.get(4).unwrap().id, 5);
    }

    #[test]
    fn sample_record_is_complete() {
        let record = sample_record(2, OptionLabel::C);
        assert!(record.option_explanations.is_complete());
        assert_eq!(record.correct_text(), "Option C2");
    }

    #[test]
    fn gemini_envelope_carries_text() {
        let value: serde_json::Value = serde_json::from_str(&gemini_envelope("hello")).unwrap();
        assert_eq!(value["candidates"][0]["content"]["parts"][0]["text"], "hello");
    }
}
