use crate::record::{FieldValue, Record};
use crate::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A set of field patterns an entry must satisfy
///
/// All conditions are combined with AND logic. A condition holds when the
/// entry has the field and the field's text form fully matches the pattern.
/// A missing field is a non-match, never an error.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    conditions: Vec<(String, Regex)>,
}

impl Predicate {
    /// Compile field patterns, anchored at both ends
    pub fn new<I, K, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<str>,
    {
        let mut conditions = Vec::new();
        for (field, pattern) in patterns {
            let field = field.into();
            let regex = Regex::new(&format!("^(?:{})$", pattern.as_ref())).map_err(|e| {
                Error::InvalidPattern(format!(
                    "Invalid regex for field '{}' ('{}'): {}",
                    field,
                    pattern.as_ref(),
                    e
                ))
            })?;
            conditions.push((field, regex));
        }
        Ok(Self { conditions })
    }

    /// Check if an entry satisfies every condition
    pub fn matches(&self, entry: &Record) -> bool {
        self.conditions.iter().all(|(field, pattern)| match entry.get(field) {
            None => false,
            Some(FieldValue::Text(text)) => pattern.is_match(text),
            Some(other) => pattern.is_match(&other.to_string()),
        })
    }

    /// Field names this predicate inspects
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|(field, _)| field.as_str())
    }
}

/// A named action bounded by a first and a last request
#[derive(Debug, Clone)]
pub struct ActionRule {
    pub name: String,
    pub first_request: Predicate,
    pub last_request: Predicate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    name: String,
    first_request: Map<String, Value>,
    last_request: Map<String, Value>,
}

impl RawRule {
    fn compile(self) -> Result<ActionRule> {
        let first_request = compile_predicate(&self.name, "firstRequest", &self.first_request)?;
        let last_request = compile_predicate(&self.name, "lastRequest", &self.last_request)?;
        Ok(ActionRule {
            name: self.name,
            first_request,
            last_request,
        })
    }
}

fn compile_predicate(rule: &str, side: &str, raw: &Map<String, Value>) -> Result<Predicate> {
    let mut patterns = Vec::with_capacity(raw.len());
    for (field, value) in raw {
        let pattern = match value {
            Value::Array(_) | Value::Object(_) => {
                return Err(Error::InvalidPattern(format!(
                    "Rule '{}' {}.{} must be a string pattern",
                    rule, side, field
                )));
            }
            // Scalars such as `"status": 200` match their text form
            scalar => FieldValue::from(scalar).to_string(),
        };
        patterns.push((field.clone(), pattern));
    }
    Predicate::new(patterns).map_err(|e| match e {
        Error::InvalidPattern(msg) => {
            Error::InvalidPattern(format!("Rule '{}' {}: {}", rule, side, msg))
        }
        other => other,
    })
}

/// Ordered list of action rules loaded from a JSON array
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ActionRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ActionRule>) -> Self {
        Self { rules }
    }

    /// Read rules from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading action rules from: {}", path.display());

        let file = File::open(path)?;
        let raw: Vec<RawRule> = serde_json::from_reader(BufReader::new(file))?;
        let rules = Self::compile(raw)?;

        tracing::info!("Loaded {} action rules", rules.len());
        Ok(rules)
    }

    /// Parse rules from a JSON string
    pub fn from_str(content: &str) -> Result<Self> {
        let raw: Vec<RawRule> = serde_json::from_str(content)?;
        Self::compile(raw)
    }

    fn compile(raw: Vec<RawRule>) -> Result<Self> {
        let rules = raw
            .into_iter()
            .map(RawRule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
