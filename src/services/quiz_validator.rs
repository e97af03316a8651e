use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Difficulty, QuestionType, Quiz};

const QUIZ_KEY: &str = "quiz";

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuiz {
    pub quiz: Quiz,
    /// One entry per question whose answer does not reuse a sentence.
    pub warnings: Vec<String>,
}

/// Turns extracted JSON text into a [`Quiz`].
///
/// The document is first walked field by field so the first missing or mistyped
/// field can be named with its full path (`quiz.sentences[1].difficulty`), then
/// deserialized and checked against the `validator` rules on the domain types.
pub struct QuizValidator;

impl QuizValidator {
    pub fn validate(json_text: &str) -> AppResult<ValidatedQuiz> {
        let document: Value = serde_json::from_str(json_text)?;
        let (root, body) = locate_quiz(&document)?;

        check_quiz(&root, body)?;

        let quiz: Quiz = serde_json::from_value(body.clone())
            .map_err(|e| AppError::schema(field_or_root(&root), e.to_string()))?;

        quiz.validate().map_err(|errors| {
            let (field, reason) = first_violation(&root, &errors);
            AppError::schema(field, reason)
        })?;

        let warnings: Vec<String> = quiz
            .unmatched_answers()
            .into_iter()
            .map(|(index, question)| {
                format!(
                    "{}[{}].correctAnswer \"{}\" does not match any sentence",
                    join(&root, "questions"),
                    index,
                    question.correct_answer
                )
            })
            .collect();

        for warning in &warnings {
            log::warn!("{}", warning);
        }

        Ok(ValidatedQuiz { quiz, warnings })
    }
}

// `{"quiz": {...}}` is the requested shape; a bare quiz object is tolerated.
fn locate_quiz(document: &Value) -> AppResult<(String, &Value)> {
    let obj = document
        .as_object()
        .ok_or_else(|| AppError::schema(QUIZ_KEY, format!("expected an object, found {}", type_name(document))))?;

    if let Some(body) = obj.get(QUIZ_KEY) {
        return Ok((QUIZ_KEY.to_string(), body));
    }

    if obj.contains_key("sentences") || obj.contains_key("questions") {
        log::debug!("Accepting bare quiz object without `quiz` wrapper");
        return Ok((String::new(), document));
    }

    Err(AppError::schema(QUIZ_KEY, "missing required field"))
}

fn check_quiz(path: &str, value: &Value) -> AppResult<()> {
    let obj = as_object(path, value)?;

    require_string(path, obj, "id")?;
    require_string(path, obj, "title")?;

    let (sentences_path, sentences) = require_non_empty_array(path, obj, "sentences")?;
    for (i, sentence) in sentences.iter().enumerate() {
        check_sentence(&format!("{}[{}]", sentences_path, i), sentence)?;
    }

    let (questions_path, questions) = require_non_empty_array(path, obj, "questions")?;
    for (i, question) in questions.iter().enumerate() {
        check_question(&format!("{}[{}]", questions_path, i), question)?;
    }

    Ok(())
}

fn check_sentence(path: &str, value: &Value) -> AppResult<()> {
    let obj = as_object(path, value)?;

    require_string(path, obj, "id")?;
    require_string(path, obj, "spanish")?;
    require_string(path, obj, "english")?;

    let (difficulty_path, difficulty) = require_string(path, obj, "difficulty")?;
    if Difficulty::parse(difficulty).is_none() {
        let allowed: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
        return Err(AppError::schema(
            difficulty_path,
            format!("unknown value \"{}\", expected one of {}", difficulty, allowed.join(", ")),
        ));
    }

    require_string(path, obj, "topic")?;
    Ok(())
}

fn check_question(path: &str, value: &Value) -> AppResult<()> {
    let obj = as_object(path, value)?;

    require_string(path, obj, "id")?;
    require_string(path, obj, "question")?;
    require_string(path, obj, "correctAnswer")?;

    let (options_path, options) = required(path, obj, "options")?;
    let options = options.as_array().ok_or_else(|| {
        AppError::schema(&options_path, format!("expected an array, found {}", type_name(options)))
    })?;
    for (i, option) in options.iter().enumerate() {
        if !option.is_string() {
            return Err(AppError::schema(
                format!("{}[{}]", options_path, i),
                format!("expected a string, found {}", type_name(option)),
            ));
        }
    }

    let (type_path, question_type) = require_string(path, obj, "type")?;
    if QuestionType::parse(question_type).is_none() {
        let allowed: Vec<&str> = QuestionType::ALL.iter().map(|t| t.as_str()).collect();
        return Err(AppError::schema(
            type_path,
            format!("unknown value \"{}\", expected one of {}", question_type, allowed.join(", ")),
        ));
    }

    Ok(())
}

fn as_object<'a>(path: &str, value: &'a Value) -> AppResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        AppError::schema(
            field_or_root(path),
            format!("expected an object, found {}", type_name(value)),
        )
    })
}

// A `null` counts as missing.
fn required<'a>(
    path: &str,
    obj: &'a Map<String, Value>,
    key: &str,
) -> AppResult<(String, &'a Value)> {
    let field_path = join(path, key);
    match obj.get(key) {
        None | Some(Value::Null) => Err(AppError::schema(field_path, "missing required field")),
        Some(value) => Ok((field_path, value)),
    }
}

fn require_string<'a>(
    path: &str,
    obj: &'a Map<String, Value>,
    key: &str,
) -> AppResult<(String, &'a str)> {
    let (field_path, value) = required(path, obj, key)?;
    match value.as_str() {
        Some(s) => Ok((field_path, s)),
        None => Err(AppError::schema(
            field_path,
            format!("expected a string, found {}", type_name(value)),
        )),
    }
}

fn require_non_empty_array<'a>(
    path: &str,
    obj: &'a Map<String, Value>,
    key: &str,
) -> AppResult<(String, &'a Vec<Value>)> {
    let (field_path, value) = required(path, obj, key)?;
    let items = value.as_array().ok_or_else(|| {
        AppError::schema(&field_path, format!("expected an array, found {}", type_name(value)))
    })?;

    if items.is_empty() {
        return Err(AppError::schema(field_path, "must not be empty"));
    }

    Ok((field_path, items))
}

// Reports the alphabetically first failing field, descending into nested structs and lists.
fn first_violation(path: &str, errors: &ValidationErrors) -> (String, String) {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by_key(|(key, _)| key.to_string());

    let Some((key, kind)) = entries.into_iter().next() else {
        return (field_or_root(path), "invalid value".to_string());
    };
    let key = key.to_string();

    match kind {
        ValidationErrorsKind::Field(field_errors) => {
            let Some(error) = field_errors.first() else {
                return (join(path, &key), "invalid value".to_string());
            };
            let field = if key == "__all__" {
                match &*error.code {
                    "correct_answer_in_options" => join(path, "correctAnswer"),
                    _ => field_or_root(path),
                }
            } else {
                join(path, &key)
            };
            (field, describe(error))
        }
        ValidationErrorsKind::Struct(inner) => first_violation(&join(path, &key), inner),
        ValidationErrorsKind::List(items) => match items.iter().next() {
            Some((index, inner)) => {
                first_violation(&format!("{}[{}]", join(path, &key), index), inner)
            }
            None => (join(path, &key), "invalid value".to_string()),
        },
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match (&*error.code, error.params.get("min")) {
        ("length", Some(min)) => format!("length must be at least {}", min),
        (code, _) => format!("failed `{}` check", code),
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn field_or_root(path: &str) -> String {
    if path.is_empty() {
        QUIZ_KEY.to_string()
    } else {
        path.to_string()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
