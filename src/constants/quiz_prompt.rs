pub const QUIZ_SYSTEM_PROMPT: &str = "You are a helpful Spanish language tutor. Create simple Spanish sentences and respond in JSON format. Respond only with the JSON object, no additional text.";

pub const QUIZ_SENTENCE_COUNT: usize = 3;
pub const QUIZ_OPTION_COUNT: usize = 4;

/// Literal example of the document the model must return.
pub const QUIZ_JSON_TEMPLATE: &str = r#"{
  "quiz": {
    "id": "quiz_1",
    "title": "Quiz: <short title>",
    "sentences": [
      {
        "id": "sentence_1",
        "spanish": "Spanish sentence",
        "english": "English translation",
        "difficulty": "beginner",
        "topic": "<topic>"
      }
    ],
    "questions": [
      {
        "id": "q_1",
        "question": "Translate: [English sentence]",
        "correctAnswer": "Spanish sentence",
        "options": ["Spanish sentence", "Wrong option 1", "Wrong option 2", "Wrong option 3"],
        "type": "translation"
      }
    ]
  }
}"#;

pub const QUIZ_CONSTRAINTS: &str = "Rules:
- Write exactly 3 sentences. Every Spanish sentence must naturally use the requested word or grammar point.
- Write exactly 1 question per sentence. Each question has exactly 4 options.
- The correctAnswer must be the Spanish sentence, copied verbatim, and must appear exactly once in options.
- The other 3 options are plausible but wrong Spanish sentences.
- \"difficulty\" is one of: beginner, intermediate, advanced.
- \"type\" is one of: translation, fill-blank, multiple-choice.";
