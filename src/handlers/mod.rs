pub mod quiz_handler;

pub use quiz_handler::{generate_quiz, health_check, json_config, JSON_LIMIT_BYTES};
