use rand::Rng;

use crate::models::domain::{OptionLabel, QuizRecord};

/// Bijection between the labels the model wrote and the labels shown on
/// screen for one question. Rebuilt every time a question is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMapping {
    /// `originals[d]` is the original label shown at display position `d`.
    originals: [OptionLabel; 4],
    correct: OptionLabel,
}

impl DisplayMapping {
    /// Fisher-Yates over the four options.
    pub fn shuffled<R: Rng + ?Sized>(record: &QuizRecord, rng: &mut R) -> Self {
        let mut originals = OptionLabel::ALL;
        for i in (1..originals.len()).rev() {
            let j = rng.gen_range(0..=i);
            originals.swap(i, j);
        }
        Self::from_order(originals, record.correct_answer)
    }

    fn from_order(originals: [OptionLabel; 4], correct_original: OptionLabel) -> Self {
        let correct = OptionLabel::ALL
            .into_iter()
            .find(|display| originals[display.index()] == correct_original)
            .expect("display order is a permutation of all four labels");
        Self { originals, correct }
    }

    pub fn original_for(&self, display: OptionLabel) -> OptionLabel {
        self.originals[display.index()]
    }

    pub fn display_for(&self, original: OptionLabel) -> OptionLabel {
        OptionLabel::ALL
            .into_iter()
            .find(|display| self.originals[display.index()] == original)
            .unwrap_or(original)
    }

    pub fn correct_display_label(&self) -> OptionLabel {
        self.correct
    }

    pub fn is_correct(&self, display: OptionLabel) -> bool {
        display == self.correct
    }

    /// `(display, original)` pairs in display order A..D.
    pub fn entries(&self) -> impl Iterator<Item = (OptionLabel, OptionLabel)> + '_ {
        OptionLabel::ALL
            .into_iter()
            .map(move |display| (display, self.original_for(display)))
    }
}
