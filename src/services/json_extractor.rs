/// How a JSON object is located inside free-form model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionPolicy {
    /// First `{` through last `}`, inclusive.
    Naive,
    /// First top-level balanced object that parses as JSON, else the naive range.
    #[default]
    Balanced,
}

impl ExtractionPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "naive" => Some(ExtractionPolicy::Naive),
            "balanced" => Some(ExtractionPolicy::Balanced),
            _ => None,
        }
    }
}

/// Which rule produced an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    Balanced,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedJson<'a> {
    pub text: &'a str,
    pub strategy: ExtractionStrategy,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor {
    policy: ExtractionPolicy,
}

impl JsonExtractor {
    pub fn new(policy: ExtractionPolicy) -> Self {
        Self { policy }
    }

    /// Returns `None` when `raw` has no `{`, or no `}` after the first `{`.
    pub fn extract<'a>(&self, raw: &'a str) -> Option<ExtractedJson<'a>> {
        if self.policy == ExtractionPolicy::Balanced {
            if let Some(text) = first_parsable_object(raw) {
                return Some(ExtractedJson {
                    text,
                    strategy: ExtractionStrategy::Balanced,
                });
            }
        }

        naive_range(raw).map(|text| ExtractedJson {
            text,
            strategy: ExtractionStrategy::Range,
        })
    }
}

fn naive_range(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

// Scans top-level objects left to right. String and escape state is only tracked
// inside an object, so quotes and apostrophes in surrounding prose are ignored.
fn first_parsable_object(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if depth == 0 {
            if b == b'{' {
                depth = 1;
                start = i;
                in_string = false;
                escaped = false;
            }
            continue;
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &raw[start..=i];
                    if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                        return Some(candidate);
                    }
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const FENCED: &str = "Here you go:\n```json\n{\"quiz\":{\"id\":\"q1\"}}\n```\nHope that helps!";

    fn balanced() -> JsonExtractor {
        JsonExtractor::new(ExtractionPolicy::Balanced)
    }

    fn naive() -> JsonExtractor {
        JsonExtractor::new(ExtractionPolicy::Naive)
    }

    #[test]
    fn fenced_output_yields_first_to_last_brace() {
        let expected = "{\"quiz\":{\"id\":\"q1\"}}";

        for extractor in [balanced(), naive()] {
            let extracted = extractor.extract(FENCED).expect("object should be found");
            assert_eq!(extracted.text, expected);
            assert!(!extracted.text.contains("```"));
        }
    }

    #[test]
    fn no_braces_is_not_found() {
        assert_eq!(balanced().extract("I can't help with that."), None);
        assert_eq!(naive().extract("I can't help with that."), None);
    }

    #[test]
    fn closing_brace_before_opening_is_not_found() {
        assert_eq!(balanced().extract("} oops {"), None);
        assert_eq!(naive().extract("only an opening { brace"), None);
    }

    #[test]
    fn extraction_is_idempotent() {
        let extractor = balanced();
        let first = extractor.extract(FENCED);
        let second = extractor.extract(FENCED);
        assert_eq!(first, second);
    }

    #[test]
    fn balanced_skips_prose_braces_before_real_object() {
        let raw = "Use a placeholder like {example} here.\n{\"quiz\":{\"id\":\"q1\"}}";

        let extracted = balanced().extract(raw).expect("object should be found");
        assert_eq!(extracted.text, "{\"quiz\":{\"id\":\"q1\"}}");
        assert_eq!(extracted.strategy, ExtractionStrategy::Balanced);

        // The naive range swallows the placeholder too.
        let extracted = naive().extract(raw).expect("range should be found");
        assert!(extracted.text.starts_with("{example}"));
        assert_eq!(extracted.strategy, ExtractionStrategy::Range);
    }

    #[test]
    fn balanced_ignores_trailing_prose_braces() {
        let raw = "{\"quiz\":{\"id\":\"q1\"}}\nLet me know if you want more {examples}.";

        let extracted = balanced().extract(raw).expect("object should be found");
        assert_eq!(extracted.text, "{\"quiz\":{\"id\":\"q1\"}}");
    }

    #[test]
    fn braces_inside_strings_do_not_affect_depth() {
        let raw = r#"Result: {"title": "use } and { freely", "n": "a \" quote"} done"#;

        let extracted = balanced().extract(raw).expect("object should be found");
        assert_eq!(
            extracted.text,
            r#"{"title": "use } and { freely", "n": "a \" quote"}"#
        );
    }

    #[test]
    fn truncated_output_falls_back_to_range() {
        let raw = "{\"quiz\": {\"id\": \"q1\", \"sentences\": [{\"id\": \"s1\"}";

        let extracted = balanced().extract(raw).expect("range should be found");
        assert_eq!(extracted.strategy, ExtractionStrategy::Range);
        assert_eq!(extracted.text, raw);
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        let raw = "¿Qué tal? {\"spanish\": \"¿Cómo estás?\"} ¡Adiós!";

        let extracted = balanced().extract(raw).expect("object should be found");
        assert_eq!(extracted.text, "{\"spanish\": \"¿Cómo estás?\"}");
    }

    #[test]
    fn policy_parses_from_config_value() {
        assert_eq!(ExtractionPolicy::parse("NAIVE"), Some(ExtractionPolicy::Naive));
        assert_eq!(ExtractionPolicy::parse("balanced"), Some(ExtractionPolicy::Balanced));
        assert_eq!(ExtractionPolicy::parse("greedy"), None);
    }
}
