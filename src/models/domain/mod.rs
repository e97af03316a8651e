pub mod chat;
pub mod completion_params;
pub mod quiz;
pub mod quiz_question;
pub mod quiz_request;
pub mod sentence;
pub use chat::{ChatMessage, ChatRole};
pub use completion_params::CompletionParams;
pub use quiz::Quiz;
pub use quiz_question::{Question, QuestionType};
pub use quiz_request::QuizRequest;
pub use sentence::{Difficulty, Sentence};
