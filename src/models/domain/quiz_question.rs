use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the four answer labels. Used both for the labels the model wrote
/// and for the labels shown on screen after shuffling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn index(self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
            OptionLabel::D => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not one of A, B, C, D", self.0)
    }
}

impl FromStr for OptionLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(OptionLabel::A),
            "B" => Ok(OptionLabel::B),
            "C" => Ok(OptionLabel::C),
            "D" => Ok(OptionLabel::D),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

/// Exactly four answer texts, keyed by their original label.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl QuizOptions {
    pub fn new(a: impl Into<String>, b: impl Into<String>, c: impl Into<String>, d: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    pub fn get(&self, label: OptionLabel) -> &str {
        match label {
            OptionLabel::A => &self.a,
            OptionLabel::B => &self.b,
            OptionLabel::C => &self.c,
            OptionLabel::D => &self.d,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionLabel, &str)> {
        OptionLabel::ALL.into_iter().map(move |label| (label, self.get(label)))
    }
}

/// Per-option rationale. The model is asked for all four but may skip some.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OptionExplanations {
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,
    #[serde(rename = "B", default, skip_serializing_if = "Option::is_none")]
    pub b: Option<String>,
    #[serde(rename = "C", default, skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
    #[serde(rename = "D", default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

impl OptionExplanations {
    pub fn get(&self, label: OptionLabel) -> Option<&str> {
        match label {
            OptionLabel::A => self.a.as_deref(),
            OptionLabel::B => self.b.as_deref(),
            OptionLabel::C => self.c.as_deref(),
            OptionLabel::D => self.d.as_deref(),
        }
    }

    pub fn set(&mut self, label: OptionLabel, text: impl Into<String>) {
        let slot = match label {
            OptionLabel::A => &mut self.a,
            OptionLabel::B => &mut self.b,
            OptionLabel::C => &mut self.c,
            OptionLabel::D => &mut self.d,
        };
        *slot = Some(text.into());
    }

    pub fn is_complete(&self) -> bool {
        OptionLabel::ALL.iter().all(|label| self.get(*label).is_some())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    pub id: u32, // sequence position, not unique across sessions
    pub question: String,
    pub options: QuizOptions,
    pub correct_answer: OptionLabel,
    pub explanation: String,
    #[serde(default)]
    pub option_explanations: OptionExplanations,
}

impl QuizRecord {
    pub fn correct_text(&self) -> &str {
        self.options.get(self.correct_answer)
    }
}
