pub mod quiz;
pub mod quiz_question;
pub use quiz::QuizSet;
pub use quiz_question::{OptionExplanations, OptionLabel, QuizOptions, QuizRecord};
