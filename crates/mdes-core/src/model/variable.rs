use std::fmt;
use std::sync::Arc;

use super::variable_type::VariableType;

/// PII category of a variable as marked in the schema.
///
/// Unexpected markers are kept verbatim in `Other` so callers can inspect
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pii {
    /// `Y`: definitely PII
    Yes,
    /// empty marker: definitely not PII
    No,
    /// `P`: flagged for manual review
    Possible,
    /// no marker at all
    Unknown,
    Other(String),
}

impl Pii {
    /// Maps the raw `ncsdoc:pii` attribute value.
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some("Y") => Pii::Yes,
            Some("P") => Pii::Possible,
            Some("") => Pii::No,
            None => Pii::Unknown,
            Some(other) => Pii::Other(other.to_string()),
        }
    }

    /// Everything except an explicit "not PII" has to be treated as
    /// possibly sensitive.
    pub fn may_be_pii(&self) -> bool {
        !matches!(self, Pii::No)
    }
}

impl fmt::Display for Pii {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pii::Yes => f.write_str("true"),
            Pii::No => f.write_str("false"),
            Pii::Possible => f.write_str("possible"),
            Pii::Unknown => f.write_str("unknown"),
            Pii::Other(raw) => write!(f, "{:?}", raw),
        }
    }
}

/// Lifecycle status of a variable in this version of the MDES.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Active,
    New,
    Modified,
    Retired,
    Other(String),
}

impl Status {
    /// Maps the raw `ncsdoc:status` attribute value. An absent marker has
    /// no status at all.
    pub fn from_marker(marker: Option<&str>) -> Option<Self> {
        marker.map(|m| match m {
            "1" => Status::Active,
            "2" => Status::New,
            "3" => Status::Modified,
            "4" => Status::Retired,
            other => Status::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => f.write_str("active"),
            Status::New => f.write_str("new"),
            Status::Modified => f.write_str("modified"),
            Status::Retired => f.write_str("retired"),
            Status::Other(raw) => write!(f, "{:?}", raw),
        }
    }
}

/// A single field (column) of a transmission table.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Unique within the owning table
    pub name: String,

    pub pii: Pii,
    pub status: Option<Status>,

    /// Named types are shared with the specification's type list once
    /// resolved; embedded types are owned here alone.
    pub variable_type: Option<Arc<VariableType>>,

    /// May be left out of a submission entirely
    pub omittable: bool,

    /// May be submitted as an explicit null
    pub nillable: bool,

    /// Name of the parent table this foreign key points at, once resolved
    pub table_reference: Option<String>,

    required: Option<bool>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pii: Pii::Unknown,
            status: None,
            variable_type: None,
            omittable: false,
            nillable: false,
            table_reference: None,
            required: None,
        }
    }

    pub fn with_type(mut self, variable_type: VariableType) -> Self {
        self.variable_type = Some(Arc::new(variable_type));
        self
    }

    /// Is a value mandatory for a valid submission?
    ///
    /// An explicit override wins; otherwise a variable is required when it
    /// may neither be omitted nor nil.
    pub fn is_required(&self) -> bool {
        self.required
            .unwrap_or(!(self.omittable || self.nillable))
    }

    /// Pins [`is_required`](Self::is_required). `None` restores the
    /// derived value.
    pub fn set_required(&mut self, required: Option<bool>) {
        self.required = required;
    }

    pub fn required_override(&self) -> Option<bool> {
        self.required
    }

    /// Name of the current type, reference or not.
    pub fn type_name(&self) -> Option<&str> {
        self.variable_type.as_deref().and_then(VariableType::name)
    }
}
