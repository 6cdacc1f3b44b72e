use crate::extraction::rwvm::{extract_mapping_records, is_rwvm_instance, RWVM_MODALITY};
use crate::extraction::tags::{MODALITY, PATIENT_ID, PATIENT_NAME, STUDY_DATE};
use crate::index::DicomIndex;
use crate::reader;
use crate::types::{RwvmLoadable, RWVM_CONFIDENCE};
use log::warn;
use std::path::PathBuf;

/// Produces candidate interpretations for every RWVM object in the groups
///
/// A group whose first file does not carry the RWVM modality contributes no
/// loadables. An RWVM series is expected to hold exactly one instance, so
/// only the first file of a larger group is considered (with a warning).
/// Each mapping entry in an RWVM file becomes its own loadable.
///
/// Pure function of the group contents; callers may memoize results by
/// file-group identity.
pub fn examine<I: DicomIndex>(file_groups: &[Vec<PathBuf>], index: &I) -> Vec<RwvmLoadable> {
    let mut loadables = Vec::new();
    for group in file_groups {
        let rwvm_file = match group.first() {
            Some(file) => file,
            None => continue,
        };
        if index.file_value(rwvm_file, MODALITY).as_deref() != Some(RWVM_MODALITY) {
            continue;
        }
        if group.len() > 1 {
            warn!(
                "series contains {} RWVM instances; only the first is considered",
                group.len()
            );
        }
        loadables.extend(loadables_from_rwvm_file(rwvm_file, index));
    }
    loadables
}

/// Builds one loadable per mapping record of a single RWVM file
fn loadables_from_rwvm_file<I: DicomIndex>(rwvm_file: &PathBuf, index: &I) -> Vec<RwvmLoadable> {
    let dcm = match reader::read_instance(rwvm_file) {
        Ok(dcm) => dcm,
        Err(e) => {
            warn!("cannot read RWVM file {}: {}", rwvm_file.display(), e);
            return Vec::new();
        }
    };
    if !is_rwvm_instance(&dcm) {
        warn!(
            "{} is indexed as RWVM but does not carry the RWVM modality",
            rwvm_file.display()
        );
        return Vec::new();
    }

    let patient_name = index.file_value(rwvm_file, PATIENT_NAME);
    let patient_id = index.file_value(rwvm_file, PATIENT_ID);
    let study_date = index.file_value(rwvm_file, STUDY_DATE);

    extract_mapping_records(&dcm)
        .into_iter()
        .map(|record| {
            let name = display_name(
                patient_name.as_deref(),
                study_date.as_deref(),
                record.units.as_ref().map(|u| u.meaning.as_str()),
            );
            RwvmLoadable {
                rwvm_file: rwvm_file.clone(),
                files: Vec::new(),
                tooltip: name.clone(),
                name,
                confidence: RWVM_CONFIDENCE,
                selected: true,
                record,
                referenced_modality: None,
                radiotracer: None,
                patient_name: patient_name.clone(),
                patient_id: patient_id.clone(),
                study_date: study_date.clone(),
            }
        })
        .collect()
}

/// Joins the present name parts: patient, readable study date, units meaning
fn display_name(patient: Option<&str>, study_date: Option<&str>, units: Option<&str>) -> String {
    let date = study_date.map(readable_study_date);
    [patient, date.as_deref(), units]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reformats a DICOM date (YYYYMMDD) into YYYY-MM-DD
///
/// Anything that is not eight characters long is returned unchanged.
pub fn readable_study_date(study_date: &str) -> String {
    if study_date.len() == 8 {
        format!(
            "{}-{}-{}",
            &study_date[..4],
            &study_date[4..6],
            &study_date[6..]
        )
    } else {
        study_date.to_string()
    }
}
