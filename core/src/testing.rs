//! Shared fixtures and stub collaborators for tests

use crate::decoder::{DecodedVolume, ScalarVolumeDecoder, VolumeCandidate};
use crate::error::{Result, SuvmapError};
use crate::extraction::tags::{
    CODE_MEANING, CODE_VALUE, CODING_SCHEME_DESIGNATOR, CONCEPT_CODE_SEQUENCE,
    CONCEPT_NAME_CODE_SEQUENCE, MEASUREMENT_UNITS_CODE_SEQUENCE, MODALITY,
    QUANTITY_DEFINITION_SEQUENCE, RADIOPHARMACEUTICAL_CODE_SEQUENCE,
    RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE, REAL_WORLD_VALUE_MAPPING_SEQUENCE,
    REAL_WORLD_VALUE_SLOPE, REFERENCED_IMAGE_RWVM_SEQUENCE, REFERENCED_IMAGE_SEQUENCE,
    REFERENCED_SERIES_SEQUENCE, REFERENCED_SOP_INSTANCE_UID, SERIES_INSTANCE_UID,
    SOP_INSTANCE_UID,
};
use crate::index::DicomIndex;
use crate::types::{RwvmLoadable, RwvmRecord, VolumeGeometry, RWVM_CONFIDENCE};
use dicom_core::value::DataSetSequence;
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use ndarray::{s, Array3};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Writes an in-memory object to disk as an explicit-VR DICOM file
pub fn write_instance(
    dir: &Path,
    name: &str,
    obj: InMemDicomObject,
    sop_instance_uid: &str,
) -> PathBuf {
    let file_obj = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax("1.2.840.10008.1.2.1")
                .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.67")
                .media_storage_sop_instance_uid(sop_instance_uid),
        )
        .expect("build file meta table");
    let path = dir.join(name);
    file_obj.write_to_file(&path).expect("write test instance");
    path
}

pub fn code_item(code: &str, scheme: &str, meaning: &str) -> InMemDicomObject {
    InMemDicomObject::from_element_iter([
        DataElement::new(CODE_VALUE, VR::SH, PrimitiveValue::from(code)),
        DataElement::new(
            CODING_SCHEME_DESIGNATOR,
            VR::SH,
            PrimitiveValue::from(scheme),
        ),
        DataElement::new(CODE_MEANING, VR::LO, PrimitiveValue::from(meaning)),
    ])
}

pub fn sequence(tag: Tag, items: Vec<InMemDicomObject>) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, VR::SQ, DataSetSequence::from(items))
}

/// One referenced-image RWVM entry: slope, units, SUVbw quantity and the
/// referenced instances
pub fn rwvm_entry(slope: f64, units_meaning: &str, uids: &[&str]) -> InMemDicomObject {
    let quantity_definition = InMemDicomObject::from_element_iter([
        sequence(
            CONCEPT_NAME_CODE_SEQUENCE,
            vec![code_item("246205007", "SCT", "Quantity")],
        ),
        sequence(CONCEPT_CODE_SEQUENCE, vec![code_item("126401", "DCM", "SUVbw")]),
    ]);
    let mapping_item = InMemDicomObject::from_element_iter([
        DataElement::new(REAL_WORLD_VALUE_SLOPE, VR::FD, PrimitiveValue::from(slope)),
        sequence(
            MEASUREMENT_UNITS_CODE_SEQUENCE,
            vec![code_item("{SUVbw}g/ml", "UCUM", units_meaning)],
        ),
        sequence(QUANTITY_DEFINITION_SEQUENCE, vec![quantity_definition]),
    ]);
    let referenced_images = uids
        .iter()
        .map(|uid| {
            InMemDicomObject::from_element_iter([DataElement::new(
                REFERENCED_SOP_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from(*uid),
            )])
        })
        .collect();
    InMemDicomObject::from_element_iter([
        sequence(REAL_WORLD_VALUE_MAPPING_SEQUENCE, vec![mapping_item]),
        sequence(REFERENCED_IMAGE_SEQUENCE, referenced_images),
    ])
}

/// A full RWVM instance wrapping the given mapping entries
pub fn rwvm_object(entries: Vec<InMemDicomObject>, series_uid: &str) -> InMemDicomObject {
    let series_item = InMemDicomObject::from_element_iter([DataElement::new(
        SERIES_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(series_uid),
    )]);
    InMemDicomObject::from_element_iter([
        DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("RWV")),
        sequence(REFERENCED_IMAGE_RWVM_SEQUENCE, entries),
        sequence(REFERENCED_SERIES_SEQUENCE, vec![series_item]),
    ])
}

/// A minimal PET image instance, optionally with a radiopharmaceutical code
pub fn pet_instance(
    sop_instance_uid: &str,
    series_uid: &str,
    tracer_code: Option<&str>,
) -> InMemDicomObject {
    let mut elements = vec![
        DataElement::new(SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(sop_instance_uid)),
        DataElement::new(SERIES_INSTANCE_UID, VR::UI, PrimitiveValue::from(series_uid)),
        DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("PT")),
    ];
    if let Some(code) = tracer_code {
        let info = InMemDicomObject::from_element_iter([sequence(
            RADIOPHARMACEUTICAL_CODE_SEQUENCE,
            vec![code_item(code, "SRT", "tracer")],
        )]);
        elements.push(sequence(RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE, vec![info]));
    }
    InMemDicomObject::from_element_iter(elements)
}

/// A discovered loadable referencing the given instance UIDs
pub fn test_loadable(uids: &[&str], series_uid: &str) -> RwvmLoadable {
    let name = "DOE^JOHN 2011-05-03 SUVbw".to_string();
    RwvmLoadable {
        rwvm_file: PathBuf::from("rwvm.dcm"),
        files: Vec::new(),
        tooltip: name.clone(),
        name,
        confidence: RWVM_CONFIDENCE,
        selected: true,
        record: RwvmRecord {
            slope: 1.0,
            quantity: None,
            units: None,
            referenced_series_uid: series_uid.to_string(),
            referenced_instance_uids: uids.iter().map(|uid| uid.to_string()).collect(),
        },
        referenced_modality: None,
        radiotracer: None,
        patient_name: None,
        patient_id: None,
        study_date: None,
    }
}

/// Map-backed index that never touches the filesystem
#[derive(Debug, Default)]
pub struct StubIndex {
    instances: HashMap<String, PathBuf>,
    series: HashMap<String, Vec<PathBuf>>,
    values: HashMap<(PathBuf, Tag), String>,
}

impl StubIndex {
    pub fn with_instance(mut self, uid: &str, path: &str) -> Self {
        self.instances.insert(uid.to_string(), PathBuf::from(path));
        self
    }

    pub fn with_series<P: AsRef<Path>>(mut self, uid: &str, files: &[P]) -> Self {
        self.series.insert(
            uid.to_string(),
            files.iter().map(|f| f.as_ref().to_path_buf()).collect(),
        );
        self
    }

    pub fn with_value<P: AsRef<Path>>(mut self, path: P, tag: Tag, value: &str) -> Self {
        self.values
            .insert((path.as_ref().to_path_buf(), tag), value.to_string());
        self
    }
}

impl DicomIndex for StubIndex {
    fn file_for_instance(&self, sop_instance_uid: &str) -> Option<PathBuf> {
        self.instances.get(sop_instance_uid).cloned()
    }

    fn files_for_series(&self, series_uid: &str) -> Vec<PathBuf> {
        self.series.get(series_uid).cloned().unwrap_or_default()
    }

    fn file_value(&self, path: &Path, tag: Tag) -> Option<String> {
        self.values.get(&(path.to_path_buf(), tag)).cloned()
    }
}

/// Deterministic decoder stub
///
/// `examine` sorts the files lexically (standing in for geometric order);
/// `load` synthesizes a `(files, 2, 2)` volume whose slice `i` is filled
/// with `seed + i`, where the seed is the number embedded in the chunk's
/// first file name. That makes frame content a function of chunk position.
#[derive(Debug, Default)]
pub struct StubDecoder {
    reject: bool,
    fail_on_file: Option<PathBuf>,
    alt_geometry_on_file: Option<PathBuf>,
}

impl StubDecoder {
    pub fn sorting() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn failing_on_file(mut self, name: &str) -> Self {
        self.fail_on_file = Some(PathBuf::from(name));
        self
    }

    pub fn alt_geometry_on_file(mut self, name: &str) -> Self {
        self.alt_geometry_on_file = Some(PathBuf::from(name));
        self
    }
}

fn file_seed(path: &Path) -> usize {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.chars().filter(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

fn same_file_name(a: &Path, b: &Path) -> bool {
    a.file_name() == b.file_name()
}

impl ScalarVolumeDecoder for StubDecoder {
    fn examine(&self, files: &[PathBuf]) -> Vec<VolumeCandidate> {
        if self.reject || files.is_empty() {
            return Vec::new();
        }
        let mut sorted = files.to_vec();
        sorted.sort();
        vec![VolumeCandidate {
            files: sorted,
            warning: None,
        }]
    }

    fn load(&self, candidate: &VolumeCandidate) -> Result<DecodedVolume> {
        if let Some(bad) = &self.fail_on_file {
            if candidate.files.iter().any(|f| same_file_name(f, bad)) {
                return Err(SuvmapError::InvalidSeries("stub decode failure".to_string()));
            }
        }
        let seed = candidate.files.first().map(|f| file_seed(f)).unwrap_or(0);
        let slices = candidate.files.len();
        let mut data = Array3::zeros((slices, 2, 2));
        for i in 0..slices {
            data.slice_mut(s![i, .., ..]).fill((seed + i) as f32);
        }
        let spacing = match (&self.alt_geometry_on_file, candidate.files.first()) {
            (Some(marker), Some(first)) if same_file_name(first, marker) => (2.0, 2.0, 2.0),
            _ => (1.0, 1.0, 1.0),
        };
        Ok(DecodedVolume {
            data,
            geometry: VolumeGeometry::axis_aligned(spacing),
            parent_transform: None,
        })
    }
}
