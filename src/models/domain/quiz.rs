use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::QuizRecord;

/// Questions produced by one generation call. Never mutated after
/// creation; a retry regenerates a new set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct QuizSet(Vec<QuizRecord>);

impl QuizSet {
    pub fn new(records: Vec<QuizRecord>) -> Self {
        QuizSet(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuizRecord> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuizRecord> {
        self.0.iter()
    }

    pub fn into_records(self) -> Vec<QuizRecord> {
        self.0
    }
}

impl From<Vec<QuizRecord>> for QuizSet {
    fn from(records: Vec<QuizRecord>) -> Self {
        QuizSet(records)
    }
}

impl<'a> IntoIterator for &'a QuizSet {
    type Item = &'a QuizRecord;
    type IntoIter = std::slice::Iter<'a, QuizRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
