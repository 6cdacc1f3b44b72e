use crate::types::{CodedValue, PresentationPolicy};

/// Radiopharmaceutical code for fludeoxyglucose (FDG)
pub const FDG_CODE: &str = "C-B1031";

/// Radiopharmaceutical code for fluorothymidine (FLT)
pub const FLT_CODE: &str = "C-B1036";

/// Derives the display policy from modality and radiotracer
///
/// Non-PET volumes use automatic window/level. PET volumes get a fixed
/// tracer-specific window with the inverted grey table. An unknown or
/// absent tracer falls back to the FDG window: FDG is by far the most
/// common PET tracer, so a missing code is more likely a missing-metadata
/// FDG study than an exotic tracer.
pub fn derive_presentation(
    modality: Option<&str>,
    radiotracer: Option<&CodedValue>,
) -> PresentationPolicy {
    if modality != Some("PT") {
        return PresentationPolicy::auto();
    }
    match radiotracer {
        Some(code) if code.has_code(FDG_CODE) => PresentationPolicy::fixed(6.0, 3.0),
        Some(code) if code.has_code(FLT_CODE) => PresentationPolicy::fixed(4.0, 2.0),
        _ => PresentationPolicy::fixed(6.0, 3.0),
    }
}
