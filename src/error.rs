use std::fmt;

/// The kind of problem a single validation [`Issue`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// A required field was missing.
    Required,
    /// The value had the wrong type for the field.
    InvalidType,
    /// A number, string or array fell below its lower bound.
    TooSmall,
    /// A number, string or array exceeded its upper bound.
    TooBig,
    /// A number was required to be an integer.
    NotInteger,
    /// A string was not one of the allowed values.
    InvalidEnumValue,
    /// A key not declared by a strict schema was present.
    UnrecognizedKey,
}

/// A single failed check, located by its field and path.
///
/// `field` is the schema field name as declared, dots included. `path` is
/// the field name for top-level values and `field.index` for array
/// elements, e.g. `tags.1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub field: String,
    pub path: String,
    pub code: IssueCode,
    pub message: String,
}

impl Issue {
    /// An issue on the field value itself; the path is the field name.
    pub fn new(field: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            path: field.clone(),
            field,
            code,
            message: message.into(),
        }
    }

    /// Relocates the issue to `path` within its field.
    #[must_use]
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Structured failure reported by a [`Schema`](crate::Schema) when a mapping
/// does not conform.
///
/// This is the only error that leaves [`parse_query`](crate::parse_query);
/// it is returned exactly as the schema produced it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", DisplayIssues(.issues))]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Shorthand for an error with exactly one issue.
    pub fn single(field: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(vec![Issue::new(field, code, message)])
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Names of the offending top-level fields, deduplicated, in report order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::with_capacity(self.issues.len());
        for issue in &self.issues {
            let field = issue.field.as_str();
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        fields
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

struct DisplayIssues<'a>(&'a [Issue]);

impl fmt::Display for DisplayIssues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Error type for the typed helpers in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The query did not satisfy the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Converting between filters and a user type failed.
    #[error("failed to convert filters: {0}")]
    Convert(#[from] serde_json::Error),

    /// A user type did not serialize to a keyed mapping.
    #[error("cannot build filters from {0}; expected a struct or map")]
    NotAMap(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
