use std::fmt;

/// A coded concept from a DICOM code sequence item
///
/// Identifies a controlled-vocabulary concept such as a measurement unit,
/// a quantity, or a radiotracer. Equality is defined by `code` and
/// `scheme_designator` only; `meaning` is human-readable display text and
/// is not authoritative for matching.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CodedValue {
    /// Code value, e.g. "C-B1031"
    pub code: String,

    /// Coding scheme designator, e.g. "SRT" or "UCUM"
    pub scheme_designator: String,

    /// Human-readable code meaning, e.g. "Standardized Uptake Value body weight"
    pub meaning: String,
}

impl CodedValue {
    /// Creates a new coded value
    pub fn new(
        code: impl Into<String>,
        scheme_designator: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            scheme_designator: scheme_designator.into(),
            meaning: meaning.into(),
        }
    }

    /// Checks whether this value carries the given code, ignoring the scheme
    ///
    /// Radiotracer dispatch matches on the bare code value, as the same
    /// tracer code appears under both SRT and SNOMED scheme designators.
    pub fn has_code(&self, code: &str) -> bool {
        self.code == code
    }
}

impl PartialEq for CodedValue {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.scheme_designator == other.scheme_designator
    }
}

impl fmt::Display for CodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.meaning.is_empty() {
            write!(f, "{} ({})", self.code, self.scheme_designator)
        } else {
            write!(f, "{}", self.meaning)
        }
    }
}
