use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Boolean,
    Integer,
    Float,
    String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScalarValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot coerce {raw:?} to {target:?}")]
pub struct CoercionError {
    pub raw: String,
    pub target: ScalarType,
}

impl ScalarType {
    pub fn coerce(self, raw: &str) -> Result<ScalarValue, CoercionError> {
        let failed = || CoercionError {
            raw: raw.to_owned(),
            target: self,
        };
        match self {
            Self::Boolean => match raw {
                "true" => Ok(ScalarValue::Boolean(true)),
                "false" => Ok(ScalarValue::Boolean(false)),
                _ => Err(failed()),
            },
            Self::Integer => raw
                .parse::<i64>()
                .map(ScalarValue::Integer)
                .map_err(|_| failed()),
            Self::Float => raw
                .parse::<f64>()
                .map(ScalarValue::Float)
                .map_err(|_| failed()),
            Self::String => Ok(ScalarValue::String(raw.to_owned())),
        }
    }

    #[must_use]
    pub fn coerce_or_raw(self, raw: &str) -> ScalarValue {
        self.coerce(raw)
            .unwrap_or_else(|_| ScalarValue::String(raw.to_owned()))
    }
}

#[must_use]
pub fn infer_type(raw: Option<&str>) -> Option<ScalarType> {
    let raw = raw?;
    if matches!(raw, "true" | "false") {
        return Some(ScalarType::Boolean);
    }
    if raw.parse::<i64>().is_ok() {
        return Some(ScalarType::Integer);
    }
    if raw.parse::<f64>().is_ok() {
        return Some(ScalarType::Float);
    }
    Some(ScalarType::String)
}

#[must_use]
pub fn infer_value(raw: Option<&str>) -> Option<ScalarValue> {
    let raw = raw?;
    infer_type(Some(raw)).map(|scalar_type| scalar_type.coerce_or_raw(raw))
}

impl ScalarValue {
    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Boolean(_) => ScalarType::Boolean,
            Self::Integer(_) => ScalarType::Integer,
            Self::Float(_) => ScalarType::Float,
            Self::String(_) => ScalarType::String,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to floats.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Boolean(_) | Self::String(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}
