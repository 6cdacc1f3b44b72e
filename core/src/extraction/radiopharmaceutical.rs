use crate::types::CodedValue;
use dicom_object::InMemDicomObject;
use log::{debug, warn};

use super::rwvm::extract_coded_value;
use super::tags::{
    first_item, RADIONUCLIDE_CODE_SEQUENCE, RADIOPHARMACEUTICAL_CODE_SEQUENCE,
    RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE,
};

/// Reads the radiotracer code from a PET instance
///
/// Looks at the first radiopharmaceutical-information item. The
/// radiopharmaceutical code is preferred; many PET series omit it, in which
/// case the radionuclide code is used instead. Returns `None` when neither
/// is present; absence is a diagnostic, not an error, and the caller falls
/// back to default presentation.
pub fn extract_radiotracer(dcm: &InMemDicomObject) -> Option<CodedValue> {
    let info = first_item(dcm, RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE)?;

    if let Some(code) =
        first_item(info, RADIOPHARMACEUTICAL_CODE_SEQUENCE).and_then(extract_coded_value)
    {
        debug!("found radiopharmaceutical code {}", code.code);
        return Some(code);
    }
    warn!("series does not have a radiopharmaceutical code sequence");

    if let Some(code) = first_item(info, RADIONUCLIDE_CODE_SEQUENCE).and_then(extract_coded_value) {
        debug!("found radionuclide code {}", code.code);
        return Some(code);
    }
    warn!("cannot find radionuclide info for PET series");

    None
}
