pub mod gateway;
pub mod prompt_builder;
pub mod quiz_service;
pub mod response_parser;
