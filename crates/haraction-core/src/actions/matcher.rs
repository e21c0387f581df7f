use super::{ActionRule, RuleSet};
use crate::record::{FieldValue, Record, fields};
use crate::{Error, Result};

/// One detected occurrence of an action rule
#[derive(Debug, Clone, PartialEq)]
pub struct ActionInstance {
    pub name: String,
    /// `endMs_rel` of the last request minus `startMs_rel` of the first
    pub duration: i64,
    pub page_ref: FieldValue,
    pub started_date_time: FieldValue,
    /// Index distance between the first and the last request
    pub calls: usize,
}

impl ActionInstance {
    /// Flatten into a report row
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.set("name", self.name.as_str());
        record.set("duration", self.duration);
        record.set(fields::PAGE_REF, self.page_ref.clone());
        record.set(fields::STARTED_DATE_TIME, self.started_date_time.clone());
        record.set("calls", self.calls);
        record
    }
}

/// Find the first occurrence of `rule` in `entries`.
///
/// The first entry matching `firstRequest` opens the window; the first entry at
/// or after it matching `lastRequest` closes it. Scanning stops there, so later
/// repetitions of the same pattern are not reported. Entries must already carry
/// relative timing.
pub fn find_action(rule: &ActionRule, entries: &[Record]) -> Result<Option<ActionInstance>> {
    let Some(start_idx) = entries
        .iter()
        .position(|entry| rule.first_request.matches(entry))
    else {
        return Ok(None);
    };

    let Some(offset) = entries[start_idx..]
        .iter()
        .position(|entry| rule.last_request.matches(entry))
    else {
        tracing::debug!("Action {} started but never completed", rule.name);
        return Ok(None);
    };
    let end_idx = start_idx + offset;

    let start = &entries[start_idx];
    let end = &entries[end_idx];
    let duration = relative_ms(end, fields::END_MS_REL)? - relative_ms(start, fields::START_MS_REL)?;

    tracing::info!("Found action {}, duration {}ms", rule.name, duration);

    Ok(Some(ActionInstance {
        name: rule.name.clone(),
        duration,
        page_ref: start.get(fields::PAGE_REF).cloned().unwrap_or(FieldValue::Null),
        started_date_time: start
            .get(fields::STARTED_DATE_TIME)
            .cloned()
            .unwrap_or(FieldValue::Null),
        calls: end_idx - start_idx,
    }))
}

/// Apply every rule to one file's entries, collecting instances in rule order
pub fn identify_actions(rules: &RuleSet, entries: &[Record]) -> Result<Vec<ActionInstance>> {
    let mut instances = Vec::new();
    for rule in rules.iter() {
        if let Some(instance) = find_action(rule, entries)? {
            instances.push(instance);
        }
    }
    Ok(instances)
}

fn relative_ms(entry: &Record, key: &str) -> Result<i64> {
    entry
        .get(key)
        .and_then(FieldValue::as_i64)
        .ok_or_else(|| {
            Error::InvalidStructure(format!("entry has no '{}'; normalize timing first", key))
        })
}
