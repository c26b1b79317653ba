use regex::Regex;
use std::fmt;

use super::code_list::CodeList;

/// An anchored facet pattern.
///
/// Compares and prints by its source text, which is the pattern as
/// written in the schema before anchoring.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `^(?:source)$`.
    ///
    /// # Errors
    ///
    /// Returns the regex error when the source does not compile.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/^{}$/", self.source)
    }
}

/// Restrictions on the content of a variable.
///
/// A type is either a reference (only `name` is meaningful, the definition
/// lives among the specification's named types) or fully defined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableType {
    /// Absent for anonymous types embedded in a variable
    pub name: Option<String>,

    /// XML Schema base type without its prefix (`string`, `int`, `decimal`, ...)
    pub base_type: Option<String>,

    pub pattern: Option<Pattern>,
    pub max_length: Option<i64>,
    pub min_length: Option<i64>,
    pub code_list: Option<CodeList>,

    /// True when this is only a by-name reference to a named type
    pub reference: bool,
}

impl VariableType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A by-name reference such as `ncs:confirm_type_cl2`.
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            reference: true,
            ..Self::named(name)
        }
    }

    /// A built-in XML Schema type, given without its `xs:` prefix.
    pub fn xml_schema_type(base_type: impl Into<String>) -> Self {
        Self {
            base_type: Some(base_type.into()),
            ..Self::default()
        }
    }

    pub fn is_reference(&self) -> bool {
        self.reference
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Brief one-line description for diagnostics.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = &self.name {
            parts.push(format!("name={:?}", name));
        }
        if let Some(base) = &self.base_type {
            parts.push(format!("base_type={}", base));
        }
        parts.push(format!("reference={}", self.reference));
        if let Some(list) = &self.code_list {
            parts.push(format!("code_list=<{} entries>", list.len()));
        }
        format!("#<VariableType {}>", parts.join(" "))
    }
}
