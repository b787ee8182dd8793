//! Golden-case evaluation.
//!
//! Cases come from a JSON array, JSON Lines, or a concatenated JSON text
//! sequence. Each case is classified with heuristics only and every key under
//! `expected` is compared with the serialised record.

use std::fmt;
use std::path::Path;

use cryptonews_core::{EvalCase, ParseInput};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::classifier::Classifier;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse cases from any of the accepted layouts. Non-object values are skipped.
pub fn parse_cases(raw: &str) -> Result<Vec<EvalCase>, EvalError> {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        // Handles one object per line as well as back-to-back objects.
        serde_json::Deserializer::from_str(trimmed)
            .into_iter::<Value>()
            .collect::<Result<_, _>>()?
    };

    let mut cases = Vec::with_capacity(values.len());
    for value in values {
        if value.is_object() {
            cases.push(serde_json::from_value(value)?);
        }
    }
    Ok(cases)
}

pub fn load_cases(path: &Path) -> Result<Vec<EvalCase>, EvalError> {
    let raw = std::fs::read_to_string(path)?;
    let cases = parse_cases(&raw)?;
    info!(path = %path.display(), count = cases.len(), "loaded eval cases");
    Ok(cases)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub field: String,
    pub expected: Value,
    pub actual: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    pub id: String,
    pub mismatches: Vec<Mismatch>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl EvalReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            if outcome.passed() {
                writeln!(f, "PASS {}", outcome.id)?;
                continue;
            }
            writeln!(f, "FAIL {}", outcome.id)?;
            for m in &outcome.mismatches {
                writeln!(f, "  {}: expected {} got {}", m.field, m.expected, m.actual)?;
            }
        }
        write!(f, "{}/{} passed", self.passed(), self.total())
    }
}

/// Classify every case deterministically and compare expected fields.
pub fn run_cases(classifier: &Classifier, cases: &[EvalCase]) -> Result<EvalReport, EvalError> {
    let mut report = EvalReport::default();
    for case in cases {
        let mismatches = match ParseInput::new(&case.text, true) {
            Ok(input) => {
                let record = serde_json::to_value(classifier.classify_heuristic(&input))?;
                compare(&case.expected, &record)
            }
            Err(e) => vec![Mismatch {
                field: "text".into(),
                expected: Value::from("valid input"),
                actual: Value::from(e.to_string()),
            }],
        };
        report.outcomes.push(CaseOutcome {
            id: case.id.clone(),
            mismatches,
        });
    }
    info!(passed = report.passed(), total = report.total(), "eval complete");
    Ok(report)
}

fn compare(expected: &serde_json::Map<String, Value>, record: &Value) -> Vec<Mismatch> {
    expected
        .iter()
        .filter_map(|(field, want)| {
            let got = record.get(field).cloned().unwrap_or(Value::Null);
            (got != *want).then(|| Mismatch {
                field: field.clone(),
                expected: want.clone(),
                actual: got,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::classifier::ClassifierConfig;

    #[test]
    fn parses_array_lines_and_sequences() {
        let array = r#"[{"id":"a","text":"x"},{"id":"b","text":"y","expected":{}}]"#;
        assert_eq!(parse_cases(array).unwrap().len(), 2);

        let lines = "{\"id\":\"a\",\"text\":\"x\"}\n\n{\"id\":\"b\",\"text\":\"y\"}\n";
        assert_eq!(parse_cases(lines).unwrap().len(), 2);

        let sequence = "{\"id\":\"a\",\n \"text\":\"x\"}{\"id\":\"b\",\"text\":\"y\"}";
        let cases = parse_cases(sequence).unwrap();
        assert_eq!(cases[1].id, "b");
    }

    #[test]
    fn non_objects_skipped_and_empty_ok() {
        assert_eq!(parse_cases(r#"[1, "two", {"id":"c","text":"z"}]"#).unwrap().len(), 1);
        assert!(parse_cases("   \n").unwrap().is_empty());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(matches!(parse_cases("{\"id\": "), Err(EvalError::Json(_))));
    }

    #[test]
    fn report_counts_mismatches() {
        let cases = parse_cases(
            r#"
            {"id": "ok", "text": "I ate breakfast and went for a walk.", "expected": {"event_type": "UNKNOWN", "jurisdiction": "GLOBAL"}}
            {"id": "bad", "text": "I ate breakfast and went for a walk.", "expected": {"event_type": "FUND_RAISE"}}
            {"id": "blank", "text": "   ", "expected": {}}
            "#,
        )
        .unwrap();
        let classifier = Classifier::new(ClassifierConfig::default());
        let report = run_cases(&classifier, &cases).unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.passed(), 1);
        assert!(!report.all_passed());
        let bad = &report.outcomes[1];
        assert_eq!(bad.mismatches[0].field, "event_type");
        assert_eq!(bad.mismatches[0].actual, Value::from("UNKNOWN"));
        assert_eq!(report.outcomes[2].mismatches[0].field, "text");

        let printed = report.to_string();
        assert!(printed.contains("PASS ok"));
        assert!(printed.contains("FAIL bad"));
        assert!(printed.ends_with("1/3 passed"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"id":"f1","text":"Bitcoin fell","expected":{{"assets":["BTC"]}}}}"#
        )
        .unwrap();
        let cases = load_cases(file.path()).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].expected["assets"], serde_json::json!(["BTC"]));
    }
}
