//! Lightspeed `Unit` endpoint response types.
//!
//! ## Observed shape
//!
//! `GET {base}/Unit` returns a JSON array of flat objects, one per major unit.
//! Keys are PascalCase (`Make`, `Model`, `StockNumber`, `WebPrice`, `VIN`,
//! `ModelYear`, `Condition`, `Color`, `Length`, `Width`, `OnHold`,
//! `CodeName`, ...). Most values are strings, but `ModelYear`, `WebPrice`,
//! `Length` and `Width` have been seen as bare numbers on some dealer feeds,
//! so records are kept untyped and fields are read through
//! [`RawUnitRecord::text`].
//!
//! ### `OnHold`
//! An empty string when the unit is available. Any other value (a customer
//! name, a deal number) means the unit is held. The field may be absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status and body of one `Unit` request, before any validation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// A single unit object exactly as Lightspeed sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawUnitRecord(pub Map<String, Value>);

impl RawUnitRecord {
    /// Returns `true` when `key` exists and is not `null`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_null())
    }

    /// Returns the value of `key` as text.
    ///
    /// Strings are returned verbatim, numbers and booleans as their JSON
    /// text, nested arrays/objects as compact JSON. `null` and missing keys
    /// yield `None`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Returns the raw JSON value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Compact JSON rendering, used when logging a rejected record.
    #[must_use]
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for RawUnitRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
