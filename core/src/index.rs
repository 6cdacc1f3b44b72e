use crate::extraction::tags::{
    get_string_value, MODALITY, PATIENT_ID, PATIENT_NAME, SERIES_INSTANCE_UID, SOP_INSTANCE_UID,
    STUDY_DATE,
};
use crate::reader;
use dicom_core::Tag;
use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// File/instance indexing store the pipeline reads through
///
/// Implementations are expected to be safe for concurrent read access.
/// Hosts embedding this crate supply their own index; [`InMemoryIndex`] is
/// the reference implementation used by the CLI and tests.
pub trait DicomIndex {
    /// Path of the instance with the given SOP instance UID, if indexed
    fn file_for_instance(&self, sop_instance_uid: &str) -> Option<PathBuf>;

    /// Ordered files of the series with the given series instance UID
    fn files_for_series(&self, series_uid: &str) -> Vec<PathBuf>;

    /// String value of `tag` in the given file, if present
    fn file_value(&self, path: &Path, tag: Tag) -> Option<String>;
}

/// Tag values cached per file at scan time
const PREFETCH_TAGS: [Tag; 6] = [
    MODALITY,
    SOP_INSTANCE_UID,
    SERIES_INSTANCE_UID,
    PATIENT_NAME,
    PATIENT_ID,
    STUDY_DATE,
];

/// Index built by scanning DICOM files up front
///
/// Commonly queried tags are cached during the scan; any other tag is read
/// from the file on demand. Immutable after construction, so shared read
/// access needs no synchronization.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    instances: HashMap<String, PathBuf>,
    series: BTreeMap<String, Vec<PathBuf>>,
    values: HashMap<PathBuf, HashMap<Tag, String>>,
}

impl InMemoryIndex {
    /// Builds an index over the given files, skipping unreadable ones with
    /// a warning
    pub fn from_files(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut index = Self::default();
        for path in paths {
            let dcm = match reader::read_instance(&path) {
                Ok(dcm) => dcm,
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            let mut cached = HashMap::new();
            for tag in PREFETCH_TAGS {
                if let Some(value) = get_string_value(&dcm, tag) {
                    cached.insert(tag, value);
                }
            }
            if let Some(sop_uid) = cached.get(&SOP_INSTANCE_UID) {
                index.instances.insert(sop_uid.clone(), path.clone());
            }
            if let Some(series_uid) = cached.get(&SERIES_INSTANCE_UID) {
                index
                    .series
                    .entry(series_uid.clone())
                    .or_default()
                    .push(path.clone());
            }
            index.values.insert(path, cached);
        }
        index
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the index holds no files
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Indexed files grouped by series, ordered by series UID
    ///
    /// This is the file-group shape candidate discovery consumes.
    pub fn series_groups(&self) -> Vec<Vec<PathBuf>> {
        self.series.values().cloned().collect()
    }
}

impl DicomIndex for InMemoryIndex {
    fn file_for_instance(&self, sop_instance_uid: &str) -> Option<PathBuf> {
        self.instances.get(sop_instance_uid).cloned()
    }

    fn files_for_series(&self, series_uid: &str) -> Vec<PathBuf> {
        self.series.get(series_uid).cloned().unwrap_or_default()
    }

    fn file_value(&self, path: &Path, tag: Tag) -> Option<String> {
        if let Some(cached) = self.values.get(path).and_then(|tags| tags.get(&tag)) {
            return Some(cached.clone());
        }
        // not prefetched: read the file again rather than keeping a partial
        // cache that could go stale
        let dcm = reader::read_instance(path).ok()?;
        get_string_value(&dcm, tag)
    }
}
