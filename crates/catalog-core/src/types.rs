//! Value and lifecycle types shared by the loader, the graph adapter, and the
//! portal clients.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Scalars ───────────────────────────────────────────────────────

/// A literal value that can be stored as a vertex property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Convert a JSON leaf into a scalar. Returns `None` for null, arrays and objects.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Boolean(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Integer(i)),
                None => n.as_f64().map(Self::Float),
            },
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }

    fn kind(&self) -> u8 {
        match self {
            Self::Boolean(_) => 0,
            Self::Integer(_) => 1,
            Self::Float(_) => 2,
            Self::String(_) => 3,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

// ── Property values ───────────────────────────────────────────────

/// A value written to a vertex property: one scalar or a homogeneous list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl PropertyValue {
    /// Build the property value for the literal items of one field.
    ///
    /// A single item is stored as a scalar. Several items become a list; if the
    /// items are of mixed kinds they are all rendered as strings so the list
    /// stays homogeneous. Returns `None` for an empty input.
    pub fn from_scalars(mut values: Vec<Scalar>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(Self::Scalar),
            _ => {
                let kind = values[0].kind();
                if values.iter().all(|v| v.kind() == kind) {
                    Some(Self::List(values))
                } else {
                    Some(Self::List(
                        values
                            .into_iter()
                            .map(|v| Scalar::String(v.to_string()))
                            .collect(),
                    ))
                }
            }
        }
    }
}

// ── Reload mode ───────────────────────────────────────────────────

/// How much of the graph a run rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadMode {
    /// Clear the entire graph and reload every record.
    Full,
    /// Keep vertices of the stable type, reload everything else.
    Quick,
}

impl fmt::Display for ReloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Quick => f.write_str("quick"),
        }
    }
}

impl FromStr for ReloadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "quick" => Ok(Self::Quick),
            _ => Err(format!("Invalid reload mode: {s}. Choose: full, quick")),
        }
    }
}

// ── Run lifecycle ─────────────────────────────────────────────────

/// Lifecycle of a single load run.
///
/// `Fetching -> Clearing -> NodePass -> PropertyPass -> Done`; any failure
/// moves the run to `Failed`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Fetching,
    Clearing,
    NodePass,
    PropertyPass,
    Done,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}
