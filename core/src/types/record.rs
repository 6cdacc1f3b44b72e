use crate::types::CodedValue;

/// One real-world-value mapping entry extracted from an RWVM object
///
/// A single RWVM instance may carry several independent mapping entries
/// (e.g. multiple quantities derived from the same source series); each one
/// becomes its own record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RwvmRecord {
    /// Linear conversion factor applied voxel-wise to the referenced pixels
    pub slope: f64,

    /// Physical quantity the mapped values represent, when declared
    pub quantity: Option<CodedValue>,

    /// Measurement units of the mapped values, when declared
    pub units: Option<CodedValue>,

    /// Series Instance UID of the referenced image series
    pub referenced_series_uid: String,

    /// Referenced SOP Instance UIDs, in mapping-sequence order
    pub referenced_instance_uids: Vec<String>,
}

impl RwvmRecord {
    /// Whether this record references at least one instance
    pub fn is_usable(&self) -> bool {
        !self.referenced_instance_uids.is_empty()
    }

    /// Display meaning of the units, or "unknown" when absent
    pub fn units_meaning(&self) -> &str {
        self.units
            .as_ref()
            .map(|u| u.meaning.as_str())
            .unwrap_or("unknown")
    }
}
