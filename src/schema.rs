//! Field declarations and the [`Schema`] capability the codec consumes.
//!
//! The codec itself only asks a schema three things: what kind a field is,
//! whether it is an array, and whether a finished mapping is acceptable.
//! [`ObjectSchema`] is a ready-made implementation; anything else that can
//! answer those questions can implement [`Schema`] directly.

use indexmap::IndexMap;

use crate::error::{Issue, IssueCode, ValidationError};
use crate::value::{Filters, Value};

/// A field's primitive kind, with any optional/nullable wrappers removed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Date,
    Array(Box<Kind>),
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Date => "date",
            Kind::Array(_) => "array",
        }
    }
}

/// A declared field type, possibly wrapped as optional and/or nullable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Array(Box<FieldType>),
    Optional(Box<FieldType>),
    Nullable(Box<FieldType>),
}

impl FieldType {
    pub fn array(element: FieldType) -> Self {
        FieldType::Array(Box::new(element))
    }

    #[must_use]
    pub fn optional(self) -> Self {
        FieldType::Optional(Box::new(self))
    }

    #[must_use]
    pub fn nullable(self) -> Self {
        FieldType::Nullable(Box::new(self))
    }

    /// The type with every outer wrapper removed.
    pub fn unwrapped(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) | FieldType::Nullable(inner) => inner.unwrapped(),
            other => other,
        }
    }

    /// The underlying kind, unwrapping at every level including array
    /// elements.
    pub fn kind(&self) -> Kind {
        match self {
            FieldType::String => Kind::String,
            FieldType::Number => Kind::Number,
            FieldType::Boolean => Kind::Boolean,
            FieldType::Date => Kind::Date,
            FieldType::Array(element) => Kind::Array(Box::new(element.kind())),
            FieldType::Optional(inner) | FieldType::Nullable(inner) => inner.kind(),
        }
    }

    pub fn is_optional(&self) -> bool {
        match self {
            FieldType::Optional(_) => true,
            FieldType::Nullable(inner) => inner.is_optional(),
            _ => false,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            FieldType::Nullable(_) => true,
            FieldType::Optional(inner) => inner.is_nullable(),
            _ => false,
        }
    }
}

/// The schema capability consumed by the parser and builder.
pub trait Schema {
    /// Kind of the named field, or `None` if the schema does not declare it.
    fn field_kind(&self, name: &str) -> Option<Kind>;

    fn is_array(&self, name: &str) -> bool {
        matches!(self.field_kind(name), Some(Kind::Array(_)))
    }

    /// Element kind of an array field.
    fn element_kind(&self, name: &str) -> Option<Kind> {
        match self.field_kind(name) {
            Some(Kind::Array(element)) => Some(*element),
            _ => None,
        }
    }

    /// Checks a cleaned mapping, returning the conforming mapping.
    fn validate(&self, filters: Filters) -> Result<Filters, ValidationError>;
}

impl<S: Schema + ?Sized> Schema for &S {
    fn field_kind(&self, name: &str) -> Option<Kind> {
        (**self).field_kind(name)
    }

    fn validate(&self, filters: Filters) -> Result<Filters, ValidationError> {
        (**self).validate(filters)
    }
}

/// A constraint checked after a field's type is accepted.
#[derive(Clone, Debug, PartialEq)]
pub enum Check {
    /// Numbers must be at least this value.
    Min(f64),
    /// Numbers must be at most this value.
    Max(f64),
    /// Numbers must have no fractional part.
    Integer,
    /// Strings (in characters) and arrays must have at least this length.
    MinLen(usize),
    /// Strings (in characters) and arrays must have at most this length.
    MaxLen(usize),
    /// Strings must be one of these values.
    OneOf(Vec<String>),
}

/// A single field declaration of an [`ObjectSchema`].
///
/// ```
/// use qs_filters::{Field, FieldType};
///
/// let page = Field::number().integer().min(1.0).default_value(1);
/// let tags = Field::array(FieldType::String).optional();
/// assert!(tags.field_type().is_optional());
/// # let _ = page;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    ty: FieldType,
    default: Option<Value>,
    checks: Vec<Check>,
}

impl Field {
    pub fn new(ty: FieldType) -> Self {
        Self {
            ty,
            default: None,
            checks: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn date() -> Self {
        Self::new(FieldType::Date)
    }

    pub fn array(element: FieldType) -> Self {
        Self::new(FieldType::array(element))
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.ty = self.ty.optional();
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.ty = self.ty.nullable();
        self
    }

    /// Value filled in during validation when the field is absent.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    #[must_use]
    pub fn min(self, min: f64) -> Self {
        self.check(Check::Min(min))
    }

    #[must_use]
    pub fn max(self, max: f64) -> Self {
        self.check(Check::Max(max))
    }

    #[must_use]
    pub fn integer(self) -> Self {
        self.check(Check::Integer)
    }

    #[must_use]
    pub fn min_len(self, len: usize) -> Self {
        self.check(Check::MinLen(len))
    }

    #[must_use]
    pub fn max_len(self, len: usize) -> Self {
        self.check(Check::MaxLen(len))
    }

    #[must_use]
    pub fn one_of<I, T>(self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.check(Check::OneOf(values.into_iter().map(Into::into).collect()))
    }

    pub fn field_type(&self) -> &FieldType {
        &self.ty
    }

    pub fn declared_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}

impl From<FieldType> for Field {
    fn from(ty: FieldType) -> Self {
        Self::new(ty)
    }
}

/// What [`ObjectSchema`] does with keys it does not declare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Remove them from the validated output.
    #[default]
    Strip,
    /// Keep them, unvalidated, after the declared fields.
    Passthrough,
    /// Report each one as an [`IssueCode::UnrecognizedKey`] issue.
    Strict,
}

/// A schema of named fields, built up field by field.
///
/// ```
/// use qs_filters::{Field, FieldType, ObjectSchema, Schema, Kind, filters};
///
/// let schema = ObjectSchema::new()
///     .field("search", Field::string().optional())
///     .field("page", Field::number().integer().min(1.0).optional())
///     .field("tags", Field::array(FieldType::String).optional());
///
/// assert_eq!(schema.field_kind("page"), Some(Kind::Number));
/// assert!(schema.is_array("tags"));
/// assert!(schema.validate(filters! { "page" => 0 }).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectSchema {
    fields: IndexMap<String, Field>,
    unknown_keys: UnknownKeys,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.fields.insert(name.into(), field.into());
        self
    }

    #[must_use]
    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// The declared default of every field that has one.
    pub fn defaults(&self) -> Filters {
        self.fields
            .iter()
            .filter_map(|(name, field)| Some((name.clone(), field.default.clone()?)))
            .collect()
    }
}

impl Schema for ObjectSchema {
    fn field_kind(&self, name: &str) -> Option<Kind> {
        self.fields.get(name).map(|field| field.ty.kind())
    }

    fn validate(&self, mut filters: Filters) -> Result<Filters, ValidationError> {
        let mut issues = Vec::new();
        let mut output = Filters::with_capacity(filters.len());

        for (name, field) in &self.fields {
            match filters.shift_remove(name) {
                Some(value) => {
                    if let Some(value) = check_field(name, field, value, &mut issues) {
                        output.insert(name.clone(), value);
                    }
                }
                None => {
                    if let Some(default) = &field.default {
                        output.insert(name.clone(), default.clone());
                    } else if !field.ty.is_optional() {
                        issues.push(Issue::new(name.as_str(), IssueCode::Required, "required"));
                    }
                }
            }
        }

        match self.unknown_keys {
            UnknownKeys::Strip => {}
            UnknownKeys::Passthrough => output.extend(filters),
            UnknownKeys::Strict => issues.extend(filters.into_keys().map(|key| {
                let message = format!("unrecognized key `{key}`");
                Issue::new(key, IssueCode::UnrecognizedKey, message)
            })),
        }

        if issues.is_empty() {
            Ok(output)
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

fn check_field(name: &str, field: &Field, value: Value, issues: &mut Vec<Issue>) -> Option<Value> {
    let before = issues.len();
    let value = check_type(name, name, &field.ty, value, issues)?;
    if !value.is_null() {
        for check in &field.checks {
            if let Some(failure) = failed_check(check, &value) {
                issues.push(failure.into_issue(name));
            }
        }
    }
    (issues.len() == before).then_some(value)
}

/// Checks `value` against `ty`, reporting under `field` at `path`.
fn check_type(
    field: &str,
    path: &str,
    ty: &FieldType,
    value: Value,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    match (ty, value) {
        (FieldType::Nullable(_), Value::Null) => Some(Value::Null),
        (FieldType::Optional(inner) | FieldType::Nullable(inner), value) => {
            check_type(field, path, inner, value, issues)
        }
        (FieldType::String, value @ Value::String(_))
        | (FieldType::Boolean, value @ Value::Bool(_))
        | (FieldType::Date, value @ Value::Date(_)) => Some(value),
        (FieldType::Number, Value::Number(n)) if n.is_finite() => Some(Value::Number(n)),
        (FieldType::Array(element), Value::Array(items)) => {
            let before = issues.len();
            let items: Vec<Value> = items
                .into_iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    check_type(field, &format!("{path}.{i}"), element, item, issues)
                })
                .collect();
            (issues.len() == before).then_some(Value::Array(items))
        }
        (ty, value) => {
            let expected = ty.kind();
            let message = format!("expected {}, received {}", expected.name(), value.type_name());
            issues.push(Issue::new(field, IssueCode::InvalidType, message).at(path));
            None
        }
    }
}

struct Failure {
    code: IssueCode,
    message: String,
}

fn fail(code: IssueCode, message: String) -> Option<Failure> {
    Some(Failure { code, message })
}

impl Failure {
    fn into_issue(self, field: &str) -> Issue {
        Issue::new(field, self.code, self.message)
    }
}

fn failed_check(check: &Check, value: &Value) -> Option<Failure> {
    let len = match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    };
    match (check, value) {
        (Check::Min(min), Value::Number(n)) if n < min => {
            fail(IssueCode::TooSmall, format!("must be at least {min}"))
        }
        (Check::Max(max), Value::Number(n)) if n > max => {
            fail(IssueCode::TooBig, format!("must be at most {max}"))
        }
        (Check::Integer, Value::Number(n)) if n.fract() != 0.0 => {
            fail(IssueCode::NotInteger, "expected integer, received float".into())
        }
        (Check::MinLen(min), _) if len.is_some_and(|len| len < *min) => {
            fail(IssueCode::TooSmall, format!("must contain at least {min} item(s)"))
        }
        (Check::MaxLen(max), _) if len.is_some_and(|len| len > *max) => {
            fail(IssueCode::TooBig, format!("must contain at most {max} item(s)"))
        }
        (Check::OneOf(allowed), Value::String(s)) if !allowed.contains(s) => fail(
            IssueCode::InvalidEnumValue,
            format!("expected one of {}, received `{s}`", allowed.join(" | ")),
        ),
        _ => None,
    }
}
