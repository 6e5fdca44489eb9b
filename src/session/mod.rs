pub mod display_mapping;
pub mod feedback;
pub mod quiz_session;
pub mod summary;

pub use display_mapping::DisplayMapping;
pub use feedback::{
    AnswerFeedback, AnswerRecord, DisplayedOption, OptionExplanationView, Progress, QuestionView,
    ReviewItem, ReviewOption,
};
pub use quiz_session::{QuizSession, SessionPhase};
pub use summary::{ResultBand, ResultSummary};
