use crate::error::Result;
use dicom_object::{open_file, DefaultDicomObject};
use std::path::Path;

/// Decodes a single DICOM file into an attribute tree
///
/// Pure function of the file content. Sequence attributes keep their item
/// order, which downstream code relies on for mapping-entry indexing and
/// frame ordering.
///
/// # Errors
///
/// Returns [`crate::SuvmapError::MalformedInput`] if the byte stream is not
/// a valid DICOM instance.
pub fn read_instance(path: impl AsRef<Path>) -> Result<DefaultDicomObject> {
    Ok(open_file(path.as_ref())?)
}
