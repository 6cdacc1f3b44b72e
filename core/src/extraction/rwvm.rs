use crate::types::{CodedValue, RwvmRecord};
use dicom_object::InMemDicomObject;
use log::warn;

use super::tags::{
    first_item, get_f64_value, get_string_value, sequence_items, CODE_MEANING, CODE_VALUE,
    CODING_SCHEME_DESIGNATOR, CONCEPT_CODE_SEQUENCE, CONCEPT_NAME_CODE_SEQUENCE,
    MEASUREMENT_UNITS_CODE_SEQUENCE, MODALITY, QUANTITY_DEFINITION_SEQUENCE,
    REAL_WORLD_VALUE_MAPPING_SEQUENCE, REAL_WORLD_VALUE_SLOPE, REFERENCED_IMAGE_RWVM_SEQUENCE,
    REFERENCED_IMAGE_SEQUENCE, REFERENCED_SERIES_SEQUENCE, REFERENCED_SOP_INSTANCE_UID,
    SERIES_INSTANCE_UID,
};

/// Modality value identifying Real World Value Mapping instances
pub const RWVM_MODALITY: &str = "RWV";

/// Concept name meaning that marks the quantity item in a
/// quantity-definition sequence
const QUANTITY_CONCEPT_NAME: &str = "Quantity";

/// Checks whether the instance is a Real World Value Mapping object
pub fn is_rwvm_instance(dcm: &InMemDicomObject) -> bool {
    get_string_value(dcm, MODALITY).as_deref() == Some(RWVM_MODALITY)
}

/// Reads a coded value from a code sequence item
///
/// The code value itself is required; scheme designator and meaning degrade
/// to empty strings when absent.
pub fn extract_coded_value(item: &InMemDicomObject) -> Option<CodedValue> {
    let code = get_string_value(item, CODE_VALUE)?;
    Some(CodedValue::new(
        code,
        get_string_value(item, CODING_SCHEME_DESIGNATOR).unwrap_or_default(),
        get_string_value(item, CODE_MEANING).unwrap_or_default(),
    ))
}

/// Extracts one record per referenced-image real-world-value-mapping entry
///
/// An RWVM instance may carry several independent mapping entries; each one
/// is surfaced as its own record, never merged or limited to the first.
/// Entries without a mapping sequence or without a slope are skipped with a
/// warning; missing quantity/units degrade to `None` rather than dropping
/// the record.
pub fn extract_mapping_records(dcm: &InMemDicomObject) -> Vec<RwvmRecord> {
    let entries = match sequence_items(dcm, REFERENCED_IMAGE_RWVM_SEQUENCE) {
        Some(entries) => entries,
        None => return Vec::new(),
    };
    let referenced_series_uid = extract_referenced_series_uid(dcm).unwrap_or_default();

    let mut records = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let mapping_item = match first_item(entry, REAL_WORLD_VALUE_MAPPING_SEQUENCE) {
            Some(item) => item,
            None => {
                warn!("mapping entry {} has no real-world-value mapping item", index);
                continue;
            }
        };
        let slope = match get_f64_value(mapping_item, REAL_WORLD_VALUE_SLOPE) {
            Some(slope) => slope,
            None => {
                warn!("mapping entry {} has no value slope", index);
                continue;
            }
        };
        if slope == 0.0 {
            warn!("mapping entry {} has a zero value slope", index);
        }

        let (quantity, units) = extract_quantity_and_units(mapping_item);

        records.push(RwvmRecord {
            slope,
            quantity,
            units,
            referenced_series_uid: referenced_series_uid.clone(),
            referenced_instance_uids: extract_referenced_instances(dcm, index),
        });
    }
    records
}

/// Reads quantity and units from one real-world-value mapping item
///
/// Units come from the first measurement-units code sequence entry. The
/// quantity is found by scanning the quantity-definition sequence for the
/// item whose concept name means "Quantity" and taking its concept code.
/// Either may independently be absent.
pub fn extract_quantity_and_units(
    mapping_item: &InMemDicomObject,
) -> (Option<CodedValue>, Option<CodedValue>) {
    let units =
        first_item(mapping_item, MEASUREMENT_UNITS_CODE_SEQUENCE).and_then(extract_coded_value);

    let quantity = sequence_items(mapping_item, QUANTITY_DEFINITION_SEQUENCE)
        .into_iter()
        .flatten()
        .find(|item| {
            first_item(item, CONCEPT_NAME_CODE_SEQUENCE)
                .and_then(|name| get_string_value(name, CODE_MEANING))
                .as_deref()
                == Some(QUANTITY_CONCEPT_NAME)
        })
        .and_then(|item| first_item(item, CONCEPT_CODE_SEQUENCE))
        .and_then(extract_coded_value);

    (quantity, units)
}

/// Collects the referenced SOP instance UIDs of the mapping entry at
/// `mapping_index`, preserving order and skipping items without a UID
pub fn extract_referenced_instances(dcm: &InMemDicomObject, mapping_index: usize) -> Vec<String> {
    sequence_items(dcm, REFERENCED_IMAGE_RWVM_SEQUENCE)
        .and_then(|entries| entries.get(mapping_index))
        .and_then(|entry| sequence_items(entry, REFERENCED_IMAGE_SEQUENCE))
        .into_iter()
        .flatten()
        .filter_map(|item| get_string_value(item, REFERENCED_SOP_INSTANCE_UID))
        .collect()
}

/// Series instance UID of the first referenced-series sequence entry
pub fn extract_referenced_series_uid(dcm: &InMemDicomObject) -> Option<String> {
    first_item(dcm, REFERENCED_SERIES_SEQUENCE)
        .and_then(|item| get_string_value(item, SERIES_INSTANCE_UID))
}
