use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Patient Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);

// Study/Series Identification Tags
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);

// Referenced-Series / Referenced-Image Tags
pub const REFERENCED_SERIES_SEQUENCE: Tag = Tag(0x0008, 0x1115);
pub const REFERENCED_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x1140);
pub const REFERENCED_SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x1155);

// Real World Value Mapping Tags
pub const REFERENCED_IMAGE_RWVM_SEQUENCE: Tag = Tag(0x0040, 0x9094);
pub const REAL_WORLD_VALUE_MAPPING_SEQUENCE: Tag = Tag(0x0040, 0x9096);
pub const REAL_WORLD_VALUE_SLOPE: Tag = Tag(0x0040, 0x9225);
pub const MEASUREMENT_UNITS_CODE_SEQUENCE: Tag = Tag(0x0040, 0x08EA);
pub const QUANTITY_DEFINITION_SEQUENCE: Tag = Tag(0x0040, 0x9220);

// Code Sequence Item Tags
pub const CODE_VALUE: Tag = Tag(0x0008, 0x0100);
pub const CODING_SCHEME_DESIGNATOR: Tag = Tag(0x0008, 0x0102);
pub const CODE_MEANING: Tag = Tag(0x0008, 0x0104);
pub const CONCEPT_NAME_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA043);
pub const CONCEPT_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA168);

// PET Radiopharmaceutical Tags
pub const RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE: Tag = Tag(0x0054, 0x0016);
pub const RADIOPHARMACEUTICAL_CODE_SEQUENCE: Tag = Tag(0x0054, 0x0304);
pub const RADIONUCLIDE_CODE_SEQUENCE: Tag = Tag(0x0054, 0x0300);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get f64 value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to f64
pub fn get_f64_value(dcm: &InMemDicomObject, tag: Tag) -> Option<f64> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_float64().ok())
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

/// Helper to get the ordered items of a sequence tag
///
/// Returns `None` if the tag is not present or is not a sequence
pub fn sequence_items<'a>(
    dcm: &'a InMemDicomObject,
    tag: Tag,
) -> Option<&'a [InMemDicomObject]> {
    dcm.element(tag).ok().and_then(|elem| elem.items())
}

/// Helper to get the first item of a sequence tag
///
/// Returns `None` if the tag is not present, is not a sequence, or is empty
pub fn first_item(dcm: &InMemDicomObject, tag: Tag) -> Option<&InMemDicomObject> {
    sequence_items(dcm, tag).and_then(|items| items.first())
}
