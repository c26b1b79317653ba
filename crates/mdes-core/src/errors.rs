use thiserror::Error;

/// Fallible result of reading or comparing a specification
pub type Result<T> = std::result::Result<T, ExError>;

/// What went wrong, independent of where
///
/// Only the fatal tier lands here. Data anomalies found while loading or
/// resolving a specification are reported through a
/// [`WarningSink`](crate::warnings::WarningSink) and never become errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    InvalidSchema,

    // Specification
    UnsupportedVersion,
    UnsupportedRestrictionBase,

    // Diff configuration
    InvalidCriterion,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Stable machine-readable code, e.g. `ERR_UNSUPPORTED_VERSION`
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidSchema => "ERR_INVALID_SCHEMA",
            ExErrorKind::UnsupportedVersion => "ERR_UNSUPPORTED_VERSION",
            ExErrorKind::UnsupportedRestrictionBase => "ERR_UNSUPPORTED_RESTRICTION_BASE",
            ExErrorKind::InvalidCriterion => "ERR_INVALID_CRITERION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Error returned by every fallible MDES operation
///
/// Built with the `with_*` methods; the optional parts locate the problem
/// in a schema or document set.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    line: Option<u32>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            line: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the name of the table, variable, type or version involved
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add the schema line the error refers to
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Chain a lower-level failure
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add the accepted alternatives (supported versions, known criterion names)
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = self.op() {
            write!(f, " {op}")?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        match (self.entity(), self.line) {
            (Some(entity), Some(line)) => write!(f, " ({entity}, line: {line})")?,
            (Some(entity), None) => write!(f, " ({entity})")?,
            (None, Some(line)) => write!(f, " (line: {line})")?,
            (None, None) => {}
        }
        match &self.source {
            Some(source) => write!(f, "; caused by {source}"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &ExError = self.source.as_deref()?;
        Some(source)
    }
}

/// Fatal conditions raised while reading or comparing specifications
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MdesError {
    /// No source documents are known for the requested version
    #[error("MDES {version} is not supported by this version of ncs-mdes")]
    UnsupportedVersion { version: String },

    /// An `xs:simpleType` restricts something other than `xs:string`
    #[error("Unsupported restriction base in simpleType on line {line}")]
    UnsupportedRestrictionBase { line: u32 },

    /// A diff comparator was requested by a name that is not registered
    #[error("Unknown comparator {name:?}")]
    UnknownComparator { name: String },

    /// A diff value extractor was requested by a name that is not registered
    #[error("Unknown extractor {name:?}")]
    UnknownValueExtractor { name: String },

    /// Lookup by exact table name failed
    #[error("Table not found: {name}")]
    TableNotFound { name: String },
}

impl From<MdesError> for ExError {
    fn from(err: MdesError) -> Self {
        let message = err.to_string();
        match err {
            MdesError::UnsupportedVersion { version } => {
                ExError::new(ExErrorKind::UnsupportedVersion)
                    .with_op("source_documents")
                    .with_entity(version)
                    .with_message(message)
            }

            MdesError::UnsupportedRestrictionBase { line } => {
                ExError::new(ExErrorKind::UnsupportedRestrictionBase)
                    .with_op("load_simple_type")
                    .with_line(line)
                    .with_message(message)
            }

            MdesError::UnknownComparator { name } => ExError::new(ExErrorKind::InvalidCriterion)
                .with_op("select_comparator")
                .with_entity(name)
                .with_candidates(vec!["equality".into(), "predicate".into()])
                .with_message(message),

            MdesError::UnknownValueExtractor { name } => {
                ExError::new(ExErrorKind::InvalidCriterion)
                    .with_op("select_value_extractor")
                    .with_entity(name)
                    .with_candidates(vec!["identity".into(), "word_chars_downcase".into()])
                    .with_message(message)
            }

            MdesError::TableNotFound { name } => ExError::new(ExErrorKind::NotFound)
                .with_op("table")
                .with_entity(name)
                .with_message(message),
        }
    }
}

impl From<roxmltree::Error> for ExError {
    fn from(err: roxmltree::Error) -> Self {
        ExError::new(ExErrorKind::InvalidSchema)
            .with_op("parse_document")
            .with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_stable() {
        let cases = [
            (ExErrorKind::UnsupportedVersion, "ERR_UNSUPPORTED_VERSION"),
            (
                ExErrorKind::UnsupportedRestrictionBase,
                "ERR_UNSUPPORTED_RESTRICTION_BASE",
            ),
            (ExErrorKind::InvalidCriterion, "ERR_INVALID_CRITERION"),
            (ExErrorKind::InvalidSchema, "ERR_INVALID_SCHEMA"),
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_unsupported_version_message() {
        let err: ExError = MdesError::UnsupportedVersion {
            version: "1.0".into(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::UnsupportedVersion);
        assert_eq!(
            err.message(),
            "MDES 1.0 is not supported by this version of ncs-mdes"
        );
        assert_eq!(err.entity(), Some("1.0"));
    }

    #[test]
    fn test_unknown_comparator_carries_candidates() {
        let err: ExError = MdesError::UnknownComparator {
            name: "fuzzy".into(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InvalidCriterion);
        let candidates = err.candidates().expect("candidates should be Some");
        assert!(candidates.contains(&"predicate".to_string()));
    }

    #[test]
    fn test_display_includes_line() {
        let err: ExError = MdesError::UnsupportedRestrictionBase { line: 7 }.into();
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_UNSUPPORTED_RESTRICTION_BASE]"));
        assert!(rendered.contains("(line: 7)"));
    }

    #[test]
    fn test_candidates_none_by_default() {
        let err = ExError::new(ExErrorKind::NotFound);
        assert!(err.candidates().is_none());
    }
}
