use std::fmt;
use std::ops::Index;

/// A single entry in a code list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeListEntry {
    value: Option<String>,

    /// Human-readable label
    pub label: Option<String>,

    /// The MDES's globally-unique identifier for this coded value
    pub global_value: Option<String>,

    /// Name of the master code list this value derives from
    pub master_cl: Option<String>,
}

impl CodeListEntry {
    /// Create an entry for the given local code value. Surrounding
    /// whitespace is stripped; inner whitespace is kept as is.
    pub fn new(value: Option<&str>) -> Self {
        Self {
            value: value.map(|v| v.trim().to_string()),
            ..Self::default()
        }
    }

    /// The local code value, absent only when the schema omitted it.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl fmt::Display for CodeListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value().unwrap_or(""))
    }
}

/// The ordered, fixed list of values valid for a type.
///
/// Order is the declaration order of the enumeration facets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeList {
    entries: Vec<CodeListEntry>,
    description: Option<String>,
}

impl CodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CodeListEntry) {
        self.entries.push(entry);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CodeListEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CodeListEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CodeListEntry] {
        &self.entries
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }
}

impl Index<usize> for CodeList {
    type Output = CodeListEntry;

    fn index(&self, index: usize) -> &CodeListEntry {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a CodeList {
    type Item = &'a CodeListEntry;
    type IntoIter = std::slice::Iter<'a, CodeListEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<CodeListEntry> for CodeList {
    fn from_iter<I: IntoIterator<Item = CodeListEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            description: None,
        }
    }
}
