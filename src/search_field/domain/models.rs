use crate::search_field::constants::*;
use crate::search_field::error::LookupResult;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single record offered as a selectable match
///
/// Accepts both camelCase and snake_case field names; optional fields that are
/// missing or malformed are left empty and simply not displayed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCandidate")]
pub struct Candidate {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<u32>,
    pub phone: Option<String>,
}

// Wire shape of a record. The id may arrive under any of three keys, so each
// gets its own slot instead of an alias.
#[derive(Deserialize)]
struct RawCandidate {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    patient_id: Option<Value>,
    #[serde(default, rename = "_id")]
    underscore_id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text", alias = "firstName")]
    first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", alias = "lastName")]
    last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", alias = "tcNumber", alias = "tc_number")]
    national_id: Option<String>,
    #[serde(default, alias = "dateOfBirth", deserialize_with = "lenient_date")]
    date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_age")]
    age: Option<u32>,
    #[serde(default, deserialize_with = "lenient_text")]
    phone: Option<String>,
}

impl TryFrom<RawCandidate> for Candidate {
    type Error = String;

    fn try_from(raw: RawCandidate) -> Result<Self, Self::Error> {
        // `id` wins over `patient_id`, which wins over `_id`.
        let id = match [raw.id, raw.patient_id, raw.underscore_id]
            .into_iter()
            .flatten()
            .find(|value| !value.is_null())
        {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => return Err(format!("invalid candidate id: {other}")),
            None => return Err("missing candidate id".to_string()),
        };

        Ok(Self {
            id,
            first_name: raw.first_name,
            last_name: raw.last_name,
            national_id: raw.national_id,
            date_of_birth: raw.date_of_birth,
            age: raw.age,
            phone: raw.phone,
        })
    }
}

impl Candidate {
    pub fn new(id: impl Into<String>, first_name: &str, last_name: &str) -> Self {
        Self {
            id: id.into(),
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            national_id: None,
            date_of_birth: None,
            age: None,
            phone: None,
        }
    }

    pub fn with_national_id(mut self, national_id: &str) -> Self {
        self.national_id = Some(national_id.to_string());
        self
    }

    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }

    /// "First Last", skipping whichever half is missing
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{first} {last}").trim().to_string()
    }

    /// Label written back into the input after a commit
    pub fn display_label(&self) -> String {
        format!(
            "{} {} (ID: {})",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or(""),
            self.national_id.as_deref().unwrap_or("")
        )
    }

    /// Age in whole years on `today`; `None` when unknown or zero
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.age
            .filter(|&age| age > 0)
            .or_else(|| self.date_of_birth.map(|dob| years_between(dob, today)))
            .filter(|&age| age > 0)
    }

    pub fn years_old(&self) -> Option<u32> {
        self.age_on(Local::now().date_naive())
    }

    /// Case-insensitive match against name, national id, phone and id.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.full_name().to_lowercase().contains(needle)
            || self
                .national_id
                .as_deref()
                .is_some_and(|id| id.to_lowercase().contains(needle))
            || self.phone.as_deref().is_some_and(|p| p.contains(needle))
            || self.id.to_lowercase() == needle
    }
}

fn years_between(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

// Strings as given, numbers as their text (ids are often numeric); anything else becomes None.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// Accepts "YYYY-MM-DD" and full ISO timestamps; anything else becomes None.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => {
            let date_part = s.get(..10).unwrap_or(&s);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
        }
        _ => None,
    })
}

// Non-negative whole numbers, as a number or a numeric string; anything else becomes None.
fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|age| u32::try_from(age).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Keys the field reacts to while the candidate list is open
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Tunables for one field instance
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub minimum_query_length: usize,
    pub debounce_ms: u64,
    pub max_results: usize,
    pub blur_grace_ms: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            minimum_query_length: DEFAULT_MINIMUM_QUERY_LENGTH,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_results: DEFAULT_MAX_RESULTS,
            blur_grace_ms: DEFAULT_BLUR_GRACE_MS,
        }
    }
}

// Lookup request and response for async communication
#[derive(Clone, Debug, PartialEq)]
pub struct LookupRequest {
    pub generation: u64,
    pub query: String,
    pub limit: usize,
}

#[derive(Clone, Debug)]
pub struct LookupResponse {
    pub generation: u64,
    pub outcome: LookupResult<Vec<Candidate>>,
}
