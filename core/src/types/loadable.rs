use crate::types::{CodedValue, RwvmRecord};
use std::path::PathBuf;

/// Confidence assigned to RWVM interpretations
///
/// The modality match is unambiguous, so all RWVM loadables share the same
/// high confidence.
pub const RWVM_CONFIDENCE: f32 = 0.90;

/// One candidate interpretation of an RWVM object
///
/// Produced by candidate discovery with the referenced instances still
/// unresolved; the series resolver derives a new loadable with resolved,
/// geometrically sorted files, the referenced modality and (for PET) the
/// radiotracer filled in. Consumed by the volume reconstructor.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RwvmLoadable {
    /// The RWVM source file this interpretation was extracted from
    pub rwvm_file: PathBuf,

    /// Resolved referenced image files; empty until resolution
    pub files: Vec<PathBuf>,

    /// Display name: patient, readable study date, units meaning
    pub name: String,

    /// Tooltip shown alongside the name
    pub tooltip: String,

    /// Confidence in [0, 1]
    pub confidence: f32,

    /// Whether this interpretation is pre-selected for loading
    pub selected: bool,

    /// The mapping entry backing this interpretation
    pub record: RwvmRecord,

    /// Modality of the referenced series, filled in by the resolver
    pub referenced_modality: Option<String>,

    /// Radiotracer code of the referenced PET series, when found
    pub radiotracer: Option<CodedValue>,

    /// Patient name from the RWVM instance
    pub patient_name: Option<String>,

    /// Patient ID from the RWVM instance
    pub patient_id: Option<String>,

    /// Study date from the RWVM instance, as stored (YYYYMMDD)
    pub study_date: Option<String>,
}

impl RwvmLoadable {
    /// Whether the referenced series is positron-emission tomography
    pub fn is_pet(&self) -> bool {
        self.referenced_modality.as_deref() == Some("PT")
    }

    /// Volume name derived from the display name, with spaces replaced
    /// by underscores
    pub fn volume_name(&self) -> String {
        self.name.replace(' ', "_")
    }
}
