//! Route parameter tables and the decoding step that applies them.
//!
//! Every route declares its parameters up front as a [`RouteParams`] table:
//! name, where the value comes from, what it coerces to and its default. The
//! table is applied to the raw request values before a handler runs, so
//! handlers only ever see typed arguments.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSource {
    Path,
    Query,
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSource::Path => f.write_str("path"),
            ParamSource::Query => f.write_str("query"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Integer,
    Boolean,
    Float,
}

impl ParamKind {
    /// JSON schema type name used in the OpenAPI document.
    pub fn schema_type(self) -> &'static str {
        match self {
            ParamKind::Text => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::Float => "number",
        }
    }

    fn error_type(self) -> &'static str {
        match self {
            ParamKind::Text => "string_type",
            ParamKind::Integer => "int_parsing",
            ParamKind::Boolean => "bool_parsing",
            ParamKind::Float => "float_parsing",
        }
    }

    fn expectation(self) -> &'static str {
        match self {
            ParamKind::Text => "Input should be a valid string",
            ParamKind::Integer => {
                "Input should be a valid integer, unable to parse string as an integer"
            }
            ParamKind::Boolean => "Input should be a valid boolean, unable to interpret input",
            ParamKind::Float => "Input should be a valid number, unable to parse string as a number",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i128),
    Boolean(bool),
    Float(f64),
}

impl ParamValue {
    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Text(value) => json!(value),
            ParamValue::Integer(value) => i64::try_from(*value)
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(value.to_string())),
            ParamValue::Boolean(value) => json!(value),
            ParamValue::Float(value) => json!(value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub source: ParamSource,
    pub kind: ParamKind,
    /// `None` marks the parameter as required.
    pub default: Option<ParamValue>,
}

impl ParamSpec {
    pub fn required(name: &'static str, source: ParamSource, kind: ParamKind) -> Self {
        Self {
            name,
            source,
            kind,
            default: None,
        }
    }

    pub fn optional(
        name: &'static str,
        source: ParamSource,
        kind: ParamKind,
        default: ParamValue,
    ) -> Self {
        Self {
            name,
            source,
            kind,
            default: Some(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("missing required {location} parameter `{name}`")]
    Missing {
        location: ParamSource,
        name: &'static str,
    },
    #[error("invalid {location} parameter `{name}` ({input:?}): {}", .kind.expectation())]
    Invalid {
        location: ParamSource,
        name: &'static str,
        kind: ParamKind,
        input: String,
    },
}

/// One entry of the 422 `detail` array. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: &'static str,
    pub loc: (ParamSource, &'static str),
    pub msg: &'static str,
    pub input: Option<String>,
}

impl ParamError {
    pub fn detail(&self) -> ErrorDetail {
        match self {
            ParamError::Missing { location, name } => ErrorDetail {
                error_type: "missing",
                loc: (*location, *name),
                msg: "Field required",
                input: None,
            },
            ParamError::Invalid {
                location,
                name,
                kind,
                input,
            } => ErrorDetail {
                error_type: kind.error_type(),
                loc: (*location, *name),
                msg: kind.expectation(),
                input: Some(input.clone()),
            },
        }
    }
}

/// Raw, still-untyped values a request carries.
#[cfg_attr(test, automock)]
pub trait ParamLookup {
    fn path(&self, name: &str) -> Option<String>;
    fn query(&self, name: &str) -> Option<String>;
}

/// Path captures and query pairs as the router hands them over.
#[derive(Debug, Default, Clone)]
pub struct RawParams {
    pub path: HashMap<String, String>,
    pub query: Vec<(String, String)>,
}

impl ParamLookup for RawParams {
    fn path(&self, name: &str) -> Option<String> {
        self.path.get(name).cloned()
    }

    // Repeated keys: the last occurrence wins.
    fn query(&self, name: &str) -> Option<String> {
        self.query
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }
}

/// Coerces one raw token. `None` means the token does not fit `kind`.
pub fn coerce(kind: ParamKind, input: &str) -> Option<ParamValue> {
    match kind {
        ParamKind::Text => Some(ParamValue::Text(input.to_string())),
        ParamKind::Integer => parse_integer(input).map(ParamValue::Integer),
        ParamKind::Boolean => match input.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Some(ParamValue::Boolean(true)),
            "false" | "0" | "no" | "off" | "f" | "n" => Some(ParamValue::Boolean(false)),
            _ => None,
        },
        // inf and nan parse fine but have no JSON representation
        ParamKind::Float => input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(ParamValue::Float),
    }
}

/// Whole numbers, also when written with a zero fraction (`42.0`).
fn parse_integer(input: &str) -> Option<i128> {
    let input = input.trim();
    input.parse().ok().or_else(|| {
        let (whole, fraction) = input.split_once('.')?;
        if fraction.is_empty() || fraction.bytes().any(|digit| digit != b'0') {
            return None;
        }
        whole.parse().ok()
    })
}

#[derive(Debug, Clone)]
pub struct RouteParams {
    pub operation_id: &'static str,
    /// Template in `{name}` form.
    pub path: &'static str,
    pub specs: Vec<ParamSpec>,
}

impl RouteParams {
    /// The template in the router's `:name` capture syntax.
    pub fn router_path(&self) -> String {
        self.path
            .split('/')
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                {
                    Some(name) => format!(":{name}"),
                    None => segment.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Applies the table. Every failing parameter is reported, not only the
    /// first one.
    pub fn decode(&self, lookup: &impl ParamLookup) -> Result<DecodedParams, Vec<ParamError>> {
        let mut values = HashMap::with_capacity(self.specs.len());
        let mut errors = Vec::new();

        for spec in &self.specs {
            let raw = match spec.source {
                ParamSource::Path => lookup.path(spec.name),
                ParamSource::Query => lookup.query(spec.name),
            };

            let missing = ParamError::Missing {
                location: spec.source,
                name: spec.name,
            };

            match raw {
                Some(input) if spec.kind == ParamKind::Text && input.is_empty() => {
                    errors.push(missing)
                }
                Some(input) => match coerce(spec.kind, &input) {
                    Some(value) => {
                        values.insert(spec.name, value);
                    }
                    None => errors.push(ParamError::Invalid {
                        location: spec.source,
                        name: spec.name,
                        kind: spec.kind,
                        input,
                    }),
                },
                None => match &spec.default {
                    Some(default) => {
                        values.insert(spec.name, default.clone());
                    }
                    None => errors.push(missing),
                },
            }
        }

        if errors.is_empty() {
            Ok(DecodedParams { values })
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedParams {
    values: HashMap<&'static str, ParamValue>,
}

impl DecodedParams {
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name)? {
            ParamValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i128> {
        match self.values.get(name)? {
            ParamValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            ParamValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            ParamValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}
