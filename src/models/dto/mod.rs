pub mod quiz_dto;
pub mod request;
pub mod response;
pub use quiz_dto::QuizDocument;
pub use request::QuizRequestDto;
pub use response::{ErrorRecord, QuizPayload, ResultEnvelope};
