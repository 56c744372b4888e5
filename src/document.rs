use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DocumentError, ReconstructResult, ValidationError};

/// Reserved top-level key holding `n` and `k`.
pub const KEYS_FIELD: &str = "keys";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    pub n: u64,
    pub k: u64,
}

/// A share value as written in the document, not yet decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedShare {
    #[serde(deserialize_with = "radix_from_json")]
    pub base: u32,
    #[serde(deserialize_with = "digits_from_json")]
    pub value: String,
}

impl EncodedShare {
    pub fn new(base: u32, value: impl Into<String>) -> Self {
        EncodedShare {
            base,
            value: value.into(),
        }
    }
}

/// One test case: metadata plus share entries in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub keys: Keys,
    pub shares: Vec<(i64, EncodedShare)>,
}

impl TestCase {
    pub fn new(n: u64, k: u64) -> Self {
        TestCase {
            keys: Keys { n, k },
            shares: Vec::new(),
        }
    }

    pub fn with_share(mut self, x: i64, base: u32, value: impl Into<String>) -> Self {
        self.shares.push((x, EncodedShare::new(base, value)));
        self
    }

    pub fn from_json_str(text: &str) -> ReconstructResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(DocumentError::from)?;
        Self::from_value(&value)
    }

    /// Share entries are only looked at once `n >= k` holds.
    pub fn from_value(value: &Value) -> ReconstructResult<Self> {
        let object = value.as_object().ok_or(DocumentError::NotAnObject)?;
        let keys = parse_keys(object)?;
        if keys.n < keys.k {
            return Err(ValidationError::ThresholdExceedsTotal {
                n: keys.n,
                k: keys.k,
            }
            .into());
        }

        let mut shares = Vec::new();
        for (key, entry) in object {
            if key == KEYS_FIELD {
                continue;
            }
            let Some(x) = share_index(key)? else {
                debug!(key = key.as_str(), "skipping non-numeric key");
                continue;
            };
            let share = EncodedShare::deserialize(entry).map_err(|e| {
                DocumentError::InvalidShareEntry {
                    key: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            shares.push((x, share));
        }

        Ok(TestCase { keys, shares })
    }
}

fn parse_keys(object: &Map<String, Value>) -> Result<Keys, DocumentError> {
    let raw = object.get(KEYS_FIELD).ok_or(DocumentError::MissingKeys)?;
    Keys::deserialize(raw).map_err(|e| DocumentError::InvalidKeys(e.to_string()))
}

/// `None` for keys that do not look like numbers at all.
fn share_index(key: &str) -> Result<Option<i64>, DocumentError> {
    let trimmed = key.trim();
    if let Ok(x) = trimmed.parse::<i64>() {
        return Ok(Some(x));
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Err(DocumentError::InvalidShareIndex(key.to_string())),
        _ => Ok(None),
    }
}

/// Values may be written as bare JSON numbers.
fn digits_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Digits {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Digits::deserialize(deserializer)? {
        Digits::Text(text) => text,
        Digits::Number(number) => number.to_string(),
    })
}

/// Bases show up both as JSON numbers and as numeric strings.
fn radix_from_json<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Radix {
        Number(u32),
        Text(String),
    }

    match Radix::deserialize(deserializer)? {
        Radix::Number(base) => Ok(base),
        Radix::Text(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| serde::de::Error::custom(format!("invalid base {text:?}"))),
    }
}
