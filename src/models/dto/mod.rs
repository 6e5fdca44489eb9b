pub mod gemini;
pub mod quiz_dto;
pub mod request;
pub mod response;
