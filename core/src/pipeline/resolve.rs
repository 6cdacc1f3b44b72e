use crate::decoder::ScalarVolumeDecoder;
use crate::error::{Result, SuvmapError};
use crate::extraction::radiopharmaceutical::extract_radiotracer;
use crate::extraction::tags::MODALITY;
use crate::index::DicomIndex;
use crate::reader;
use crate::types::RwvmLoadable;
use log::{info, warn};

/// Options controlling reference resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Abort on the first referenced UID missing from the index instead of
    /// proceeding with the resolved subset
    pub strict: bool,
}

/// Resolves a discovered loadable into one ready for reconstruction
///
/// Maps referenced instance UIDs to files, determines the referenced
/// series' modality, reads the radiotracer for PET series, and re-orders
/// the files geometrically through the decoder.
pub fn resolve<I: DicomIndex, D: ScalarVolumeDecoder>(
    loadable: RwvmLoadable,
    index: &I,
    decoder: &D,
    options: &ResolveOptions,
) -> Result<RwvmLoadable> {
    let loadable = resolve_references(loadable, index, options)?;
    sort_files(loadable, decoder)
}

/// Resolves referenced UIDs to files and fills in modality and radiotracer
///
/// Returns a new loadable; the input is consumed, never mutated in place.
/// Unresolved UIDs are logged and omitted by default; `options.strict`
/// turns the first one into [`SuvmapError::UnresolvedReference`].
pub fn resolve_references<I: DicomIndex>(
    loadable: RwvmLoadable,
    index: &I,
    options: &ResolveOptions,
) -> Result<RwvmLoadable> {
    let mut files = Vec::with_capacity(loadable.record.referenced_instance_uids.len());
    for uid in &loadable.record.referenced_instance_uids {
        match index.file_for_instance(uid) {
            Some(path) => files.push(path),
            None if options.strict => {
                return Err(SuvmapError::UnresolvedReference { uid: uid.clone() })
            }
            None => warn!("referenced instance not found in index: {}", uid),
        }
    }

    // modality is a series-level attribute; any member of the referenced
    // series is authoritative
    let series_files = index.files_for_series(&loadable.record.referenced_series_uid);
    let mut referenced_modality = None;
    let mut radiotracer = None;
    match series_files.first() {
        Some(series_file) => {
            referenced_modality = index.file_value(series_file, MODALITY);
            if referenced_modality.as_deref() == Some("PT") {
                info!("found referenced PET series");
                match reader::read_instance(series_file) {
                    Ok(dcm) => radiotracer = extract_radiotracer(&dcm),
                    Err(e) => warn!(
                        "cannot read referenced series file {}: {}",
                        series_file.display(),
                        e
                    ),
                }
            }
        }
        None => warn!(
            "no files indexed for referenced series {}",
            loadable.record.referenced_series_uid
        ),
    }

    Ok(RwvmLoadable {
        files,
        referenced_modality,
        radiotracer,
        ..loadable
    })
}

/// Replaces the loadable's files with the decoder's geometric ordering
///
/// The decoder's sorting-by-spatial-position logic is reused, not
/// duplicated. A series the decoder cannot interpret as a scalar volume
/// cannot be reconstructed, so zero candidates is a hard error.
pub fn sort_files<D: ScalarVolumeDecoder>(
    loadable: RwvmLoadable,
    decoder: &D,
) -> Result<RwvmLoadable> {
    let mut candidates = decoder.examine(&loadable.files);
    if candidates.is_empty() {
        return Err(SuvmapError::InvalidSeries(format!(
            "no scalar volume candidates for '{}'",
            loadable.name
        )));
    }
    let candidate = candidates.remove(0);
    if let Some(warning) = &candidate.warning {
        warn!("decoder warning for '{}': {}", loadable.name, warning);
    }
    Ok(RwvmLoadable {
        files: candidate.files,
        ..loadable
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        pet_instance, rwvm_entry, rwvm_object, test_loadable, write_instance, StubDecoder,
        StubIndex,
    };
    use std::path::PathBuf;

    #[test]
    fn test_unresolved_uid_is_omitted_by_default() {
        let index = StubIndex::default()
            .with_instance("1.1", "a.dcm")
            .with_instance("1.3", "c.dcm");
        let loadable = test_loadable(&["1.1", "1.2", "1.3"], "2.1");

        let resolved = resolve_references(loadable, &index, &ResolveOptions::default()).unwrap();
        assert_eq!(
            resolved.files,
            vec![PathBuf::from("a.dcm"), PathBuf::from("c.dcm")]
        );
    }

    #[test]
    fn test_strict_mode_aborts_on_unresolved_uid() {
        let index = StubIndex::default().with_instance("1.1", "a.dcm");
        let loadable = test_loadable(&["1.1", "1.2"], "2.1");

        let err =
            resolve_references(loadable, &index, &ResolveOptions { strict: true }).unwrap_err();
        match err {
            SuvmapError::UnresolvedReference { uid } => assert_eq!(uid, "1.2"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_modality_from_series_member() {
        let index = StubIndex::default()
            .with_instance("1.1", "a.dcm")
            .with_series("2.1", &["s0.dcm", "s1.dcm"])
            .with_value(&PathBuf::from("s0.dcm"), MODALITY, "CT");
        let loadable = test_loadable(&["1.1"], "2.1");

        let resolved = resolve_references(loadable, &index, &ResolveOptions::default()).unwrap();
        assert_eq!(resolved.referenced_modality.as_deref(), Some("CT"));
        assert_eq!(resolved.radiotracer, None);
    }

    #[test]
    fn test_pet_series_radiotracer_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let series_file = write_instance(
            dir.path(),
            "pet0.dcm",
            pet_instance("3.1", "2.1", Some("C-B1036")),
            "3.1",
        );
        let index = StubIndex::default()
            .with_instance("1.1", "a.dcm")
            .with_series("2.1", std::slice::from_ref(&series_file))
            .with_value(&series_file, MODALITY, "PT");
        let loadable = test_loadable(&["1.1"], "2.1");

        let resolved = resolve_references(loadable, &index, &ResolveOptions::default()).unwrap();
        assert_eq!(resolved.referenced_modality.as_deref(), Some("PT"));
        assert_eq!(resolved.radiotracer.as_ref().unwrap().code, "C-B1036");
    }

    #[test]
    fn test_pet_series_without_tracer_still_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let series_file = write_instance(
            dir.path(),
            "pet0.dcm",
            pet_instance("3.1", "2.1", None),
            "3.1",
        );
        let index = StubIndex::default()
            .with_instance("1.1", "a.dcm")
            .with_series("2.1", std::slice::from_ref(&series_file))
            .with_value(&series_file, MODALITY, "PT");
        let loadable = test_loadable(&["1.1"], "2.1");

        let resolved = resolve_references(loadable, &index, &ResolveOptions::default()).unwrap();
        assert_eq!(resolved.referenced_modality.as_deref(), Some("PT"));
        assert_eq!(resolved.radiotracer, None);
    }

    #[test]
    fn test_sort_files_takes_decoder_ordering() {
        let decoder = StubDecoder::sorting();
        let mut loadable = test_loadable(&[], "2.1");
        loadable.files = vec![
            PathBuf::from("c.dcm"),
            PathBuf::from("a.dcm"),
            PathBuf::from("b.dcm"),
        ];

        let sorted = sort_files(loadable, &decoder).unwrap();
        assert_eq!(
            sorted.files,
            vec![
                PathBuf::from("a.dcm"),
                PathBuf::from("b.dcm"),
                PathBuf::from("c.dcm")
            ]
        );
    }

    #[test]
    fn test_sort_files_without_candidates_is_invalid_series() {
        let decoder = StubDecoder::rejecting();
        let loadable = test_loadable(&[], "2.1");
        assert!(matches!(
            sort_files(loadable, &decoder),
            Err(SuvmapError::InvalidSeries(_))
        ));
    }

    #[test]
    fn test_resolve_chains_reference_resolution_and_sorting() {
        let index = StubIndex::default()
            .with_instance("1.2", "b.dcm")
            .with_instance("1.1", "a.dcm");
        let decoder = StubDecoder::sorting();
        let loadable = test_loadable(&["1.2", "1.1"], "2.1");

        let resolved = resolve(loadable, &index, &decoder, &ResolveOptions::default()).unwrap();
        assert_eq!(
            resolved.files,
            vec![PathBuf::from("a.dcm"), PathBuf::from("b.dcm")]
        );
    }

    // fixture sanity: the rwvm builders produce what discovery consumes
    #[test]
    fn test_fixture_roundtrip() {
        let obj = rwvm_object(vec![rwvm_entry(1.0, "SUVbw", &["1.1"])], "2.1");
        let records = crate::extraction::extract_mapping_records(&obj);
        assert_eq!(records.len(), 1);
    }
}
