//! Request parameter extraction.
//!
//! [`values_from_request`] resolves each described field from an HTTP-like
//! [`Request`], probing the four locations in strict priority order
//! (path parameters, body, query, headers), optionally coercing to a number
//! and running the rule evaluator. [`page_window_from_request`] is the
//! companion that derives an `offset`/`limit` window from the query.

use std::collections::BTreeMap;

use vouch_value::{Kind, Value};

use crate::check::{check_value, value_conforms};
use crate::error::CheckResult;
use crate::rule::Rule;

/// A named collection of request values.
pub type ValueMap = BTreeMap<String, Value>;

/// The request shape the extractor reads from: four optional named
/// sub-mappings. Construct with the fluent helpers or fill the maps
/// directly; missing locations are simply empty.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Path parameters. Highest priority.
    pub params: ValueMap,
    /// Parsed request body.
    pub body: ValueMap,
    /// Query string parameters.
    pub query: ValueMap,
    /// Headers; keys are stored lowercased, matching the case-insensitive
    /// lookup.
    pub headers: ValueMap,
}

impl Request {
    /// An empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Adds a body field.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_body(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Adds a header. The name is lowercased on insertion.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into().to_lowercase(), value.into());
        self
    }
}

/// How to extract, coerce, and validate one named field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) field: String,
    pub(crate) kind: Kind,
    pub(crate) rule: Option<Rule>,
    pub(crate) convert: bool,
}

impl FieldSpec {
    /// Describes a field of the given name and kind, with no rule and no
    /// coercion.
    pub fn new(field: impl Into<String>, kind: Kind) -> Self {
        Self {
            field: field.into(),
            kind,
            rule: None,
            convert: false,
        }
    }

    /// Validates the extracted value against the given rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Coerces the raw value to a number before validation. Only meaningful
    /// for `Kind::Number` fields.
    #[must_use = "builder methods must be chained or built"]
    pub fn convert(mut self) -> Self {
        self.convert = true;
        self
    }
}

/// Extracts every described field into a `field -> value` map.
///
/// Fields absent from all four locations land in the map as
/// [`Value::Undefined`]; whether that is acceptable is the rule's decision.
///
/// # Errors
///
/// The first failing rule stops extraction; the error carries the
/// originating field name.
pub fn values_from_request(request: &Request, specs: &[FieldSpec]) -> CheckResult<ValueMap> {
    tracing::debug!(fields = specs.len(), "extracting request values");

    let mut values = ValueMap::new();
    for spec in specs {
        let mut value = resolve(request, &spec.field);

        if spec.convert && spec.kind == Kind::Number && value.is_present() {
            value = coerce_number(value);
        }

        if let Some(rule) = &spec.rule {
            check_value(&value, spec.kind, rule).map_err(|e| e.with_field(spec.field.clone()))?;
        }

        values.insert(spec.field.clone(), value);
    }
    Ok(values)
}

/// Lenient form of [`values_from_request`]: any failure yields an empty map.
#[must_use]
pub fn values_from_request_lenient(request: &Request, specs: &[FieldSpec]) -> ValueMap {
    values_from_request(request, specs).unwrap_or_default()
}

/// Probes the four locations in priority order; the first defined value
/// wins. Header lookup lowercases the field name.
fn resolve(request: &Request, field: &str) -> Value {
    for source in [&request.params, &request.body, &request.query] {
        if let Some(value) = source.get(field) {
            if !value.is_undefined() {
                return value.clone();
            }
        }
    }
    if let Some(value) = request.headers.get(&field.to_lowercase()) {
        if !value.is_undefined() {
            return value.clone();
        }
    }
    Value::Undefined
}

/// Numeric coercion for raw (typically string) request values. Unparseable
/// input becomes NaN so the subsequent number type check reports it.
fn coerce_number(value: Value) -> Value {
    match value {
        Value::String(s) => Value::Number(s.trim().parse::<f64>().unwrap_or(f64::NAN)),
        other => other,
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

/// An `offset`/`limit` pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PageWindow {
    /// Number of records to skip.
    pub offset: u64,
    /// Maximum number of records to return, at least 1.
    pub limit: u64,
}

/// Derives a pagination window from a request's query parameters.
///
/// Two shapes are accepted: explicit `offset` (≥ 0) + `limit` (≥ 1), or
/// `page` (≥ 1) + `size` (≥ 1) converted via `offset = (page - 1) * size`.
/// The offset/limit form wins when both are independently valid. `None`
/// when neither shape validates; this helper never fails.
#[must_use]
pub fn page_window_from_request(request: &Request) -> Option<PageWindow> {
    let fetch = |name: &str| -> Value {
        match request.query.get(name) {
            Some(value) if !value.is_undefined() => coerce_number(value.clone()),
            _ => Value::Undefined,
        }
    };

    let offset = fetch("offset");
    let limit = fetch("limit");
    let page = fetch("page");
    let size = fetch("size");
    tracing::debug!(
        offset = %offset, limit = %limit, page = %page, size = %size,
        "resolving pagination window"
    );

    if value_conforms(&offset, Kind::Number, &Rule::unsigned_bigint())
        && value_conforms(&limit, Kind::Number, &Rule::positive_bigint())
    {
        return Some(PageWindow {
            offset: offset.as_number()? as u64,
            limit: limit.as_number()? as u64,
        });
    }

    if value_conforms(&page, Kind::Number, &Rule::positive_bigint())
        && value_conforms(&size, Kind::Number, &Rule::positive_bigint())
    {
        let page = page.as_number()? as u64;
        let size = size.as_number()? as u64;
        return Some(PageWindow {
            offset: (page - 1) * size,
            limit: size,
        });
    }

    None
}

// ============================================================================
// TESTS
// ============================================================================
