// ── Field mapping ──
//
// Two steps turn a registry payload into records:
// - `flatten`: one `dane` element -> ordered map of normalized field name to
//   raw text
// - `project`: pick, rename and cast a fixed list of fields, tolerating
//   missing ones (sandbox and production differ by a field or two)

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use regon_api::Element;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::CoreError;
use crate::model::Record;

static UPPER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("upper-run pattern is valid"));
static LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("lower-upper pattern is valid"));

/// Underscored, lowercase form of a CamelCase / PascalCase tag.
///
/// `KodPocztowy` -> `kod_pocztowy`, `SilosID` -> `silos_id`,
/// `HTTPServer` -> `http_server`. Hyphens become underscores.
pub fn underscore(word: &str) -> String {
    let word = UPPER_RUN.replace_all(word, "${1}_${2}");
    let word = LOWER_UPPER.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

/// Drop the report prefix the service puts in front of every field.
///
/// `praw_regon9` -> `regon9`; without an underscore the first CamelCase word
/// goes (`PublNazwa` -> `nazwa`). A tag with no boundary is kept whole.
pub fn strip_prefix(tag: &str) -> Cow<'_, str> {
    if let Some((_, rest)) = tag.split_once('_') {
        return Cow::Borrowed(rest);
    }
    match underscore(tag).split_once('_') {
        Some((_, rest)) => Cow::Owned(rest.to_owned()),
        None => Cow::Borrowed(tag),
    }
}

/// Map each immediate child of `element` to its text.
///
/// Children are not required to be leaves: a nested element contributes its
/// own direct text (often just formatting whitespace) and its descendants
/// are ignored. Registry `dane` elements are flat in practice.
pub fn flatten(element: &Element, strip: bool) -> Record {
    element
        .children
        .iter()
        .map(|field| {
            let name = if strip {
                underscore(&strip_prefix(&field.name))
            } else {
                underscore(&field.name)
            };
            (name, field.text.clone())
        })
        .collect()
}

/// Conversion applied to a present, non-null value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    /// Keep as string.
    Text,
    /// Integer string to boolean, non-zero meaning `true`.
    Flag,
}

impl Cast {
    fn apply(self, field: &str, value: &str) -> Result<Value, CoreError> {
        match self {
            Self::Text => Ok(Value::String(value.to_owned())),
            Self::Flag => value
                .trim()
                .parse::<i64>()
                .map(|n| Value::Bool(n != 0))
                .map_err(|_| CoreError::InvalidFieldValue {
                    field: field.to_owned(),
                    value: value.to_owned(),
                }),
        }
    }
}

/// One entry of a field map: source field, optional output name, optional cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub source: &'static str,
    pub alias: Option<&'static str>,
    pub cast: Option<Cast>,
}

impl FieldSpec {
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            alias: None,
            cast: None,
        }
    }

    pub const fn renamed(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub const fn cast(mut self, cast: Cast) -> Self {
        self.cast = Some(cast);
        self
    }

    /// Key the value is stored under in the output.
    pub fn output_name(&self) -> &'static str {
        self.alias.unwrap_or(self.source)
    }
}

/// Select, rename and cast `specs` out of `record`.
///
/// A field missing from `record` is logged and mapped to `null`; it never
/// stops the remaining fields from being processed.
pub fn project(record: &Record, specs: &[FieldSpec]) -> Result<Map<String, Value>, CoreError> {
    let mut out = Map::with_capacity(specs.len());
    for spec in specs {
        let value = match record.get(spec.source) {
            Some(value) => value.as_deref(),
            None => {
                warn!(
                    field = spec.source,
                    available = ?record.keys().collect::<Vec<_>>(),
                    "missing field in result"
                );
                None
            }
        };
        let value = match (value, spec.cast) {
            (None, _) => Value::Null,
            (Some(v), Some(cast)) => cast.apply(spec.source, v)?,
            (Some(v), None) => Value::String(v.to_owned()),
        };
        out.insert(spec.output_name().to_owned(), value);
    }
    Ok(out)
}

/// [`project`], then deserialize the result into a typed record.
pub fn project_into<T: DeserializeOwned>(
    record: &Record,
    specs: &[FieldSpec],
) -> Result<T, CoreError> {
    let projected = project(record, specs)?;
    serde_json::from_value(Value::Object(projected))
        .map_err(|e| CoreError::Internal(format!("projected record does not fit: {e}")))
}
