use crate::decoder::{ScalarVolumeDecoder, VolumeCandidate};
use crate::error::{Result, SuvmapError};
use crate::extraction::tags::SOP_INSTANCE_UID;
use crate::index::DicomIndex;
use crate::pipeline::presentation::derive_presentation;
use crate::types::{CodedValue, PresentationPolicy, RwvmLoadable, VolumeGeometry};
use log::{debug, warn};
use ndarray::{s, Array3, Array4};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Options controlling multi-frame reconstruction
#[derive(Debug, Clone, Copy)]
pub struct ReconstructOptions {
    /// Verify that every frame shares frame 0's geometry
    ///
    /// Off by default: source data is trusted and a mismatch silently
    /// produces a geometrically inconsistent volume, matching the
    /// historical behavior this flag exists to tighten.
    pub geometry_check: bool,

    /// Tolerance for the geometry comparison
    pub geometry_epsilon: f64,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            geometry_check: false,
            geometry_epsilon: 0.01,
        }
    }
}

/// Cooperative cancellation handle checked between frames
///
/// Cancelling mid-operation aborts the reconstruction with
/// [`SuvmapError::Cancelled`]; no partial output is ever handed out.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; takes effect at the next frame boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A scaled, annotated scalar volume ready for the scene/storage sink
#[derive(Debug, Clone)]
pub struct ReconstructedVolume {
    /// Scaled voxel values, slice-major
    pub data: Array3<f32>,

    /// Spatial mapping taken from the decoded volume
    pub geometry: VolumeGeometry,

    /// Physical quantity of the voxel values, when declared
    pub quantity: Option<CodedValue>,

    /// Units of the voxel values, when declared
    pub units: Option<CodedValue>,

    /// SOP instance UIDs of the source files, in file order
    pub source_instance_uids: Vec<String>,

    /// SOP instance UID of the RWVM object this volume was derived from
    pub rwvm_instance_uid: Option<String>,

    /// Modality of the referenced series
    pub referenced_modality: Option<String>,

    /// Radiotracer of the referenced PET series, when found
    pub radiotracer: Option<CodedValue>,

    /// Derived display policy
    pub presentation: PresentationPolicy,

    /// Volume name, derived from the loadable's display name
    pub name: String,
}

impl ReconstructedVolume {
    /// Attribute map handed to the scene/storage sink together with the
    /// volume
    pub fn attributes(&self) -> Vec<(String, String)> {
        volume_attributes(
            &self.source_instance_uids,
            &self.rwvm_instance_uid,
            &self.referenced_modality,
            &self.radiotracer,
        )
    }
}

/// A reconstructed time/parametric series of volumes sharing one geometry
///
/// This is the "volume sequence" representation; use
/// [`FrameSeries::into_multi_volume`] for the combined-array
/// representation with a trailing frame axis. The two hold the same
/// content.
#[derive(Debug, Clone)]
pub struct FrameSeries {
    /// Scaled frames in increasing frame-index order
    pub frames: Vec<Array3<f32>>,

    /// Geometry of frame 0, asserted for all frames
    pub geometry: VolumeGeometry,

    /// Number of source files folded into each frame
    pub files_per_frame: usize,

    /// SOP instance UIDs of all source files, in file order
    pub source_instance_uids: Vec<String>,

    /// SOP instance UID of the RWVM object this series was derived from
    pub rwvm_instance_uid: Option<String>,

    /// Physical quantity of the voxel values, when declared
    pub quantity: Option<CodedValue>,

    /// Units of the voxel values, when declared
    pub units: Option<CodedValue>,

    /// Modality of the referenced series
    pub referenced_modality: Option<String>,

    /// Radiotracer of the referenced PET series, when found
    pub radiotracer: Option<CodedValue>,

    /// Derived display policy
    pub presentation: PresentationPolicy,

    /// Series name, derived from the loadable's display name
    pub name: String,
}

impl FrameSeries {
    pub fn number_of_frames(&self) -> usize {
        self.frames.len()
    }

    /// Attribute map handed to the scene/storage sink together with the
    /// series
    pub fn attributes(&self) -> Vec<(String, String)> {
        volume_attributes(
            &self.source_instance_uids,
            &self.rwvm_instance_uid,
            &self.referenced_modality,
            &self.radiotracer,
        )
    }

    /// Combines the frames into one array with a trailing frame dimension
    ///
    /// # Errors
    ///
    /// Returns [`SuvmapError::InvalidSeries`] when the series is empty or
    /// the frames disagree in shape.
    pub fn into_multi_volume(self) -> Result<Array4<f32>> {
        let first_dim = self
            .frames
            .first()
            .ok_or_else(|| SuvmapError::InvalidSeries("empty frame series".to_string()))?
            .dim();
        let mut combined = Array4::zeros((first_dim.0, first_dim.1, first_dim.2, self.frames.len()));
        for (frame_index, frame) in self.frames.iter().enumerate() {
            if frame.dim() != first_dim {
                return Err(SuvmapError::InvalidSeries(format!(
                    "frame {} shape {:?} does not match frame 0 shape {:?}",
                    frame_index,
                    frame.dim(),
                    first_dim
                )));
            }
            combined.slice_mut(s![.., .., .., frame_index]).assign(frame);
        }
        Ok(combined)
    }
}

/// Reconstructs one spatial volume from a resolved loadable
pub fn reconstruct_single<I: DicomIndex, D: ScalarVolumeDecoder>(
    loadable: &RwvmLoadable,
    index: &I,
    decoder: &D,
) -> Result<ReconstructedVolume> {
    let candidate = best_candidate(decoder, &loadable.files, &loadable.name)?;
    let mut volume = decoder.load(&candidate)?;
    volume.harden_parent_transform();

    Ok(ReconstructedVolume {
        data: apply_slope(volume.data, loadable.record.slope),
        geometry: volume.geometry,
        quantity: loadable.record.quantity.clone(),
        units: loadable.record.units.clone(),
        source_instance_uids: instance_uids(&candidate.files, index),
        rwvm_instance_uid: index.file_value(&loadable.rwvm_file, SOP_INSTANCE_UID),
        referenced_modality: loadable.referenced_modality.clone(),
        radiotracer: loadable.radiotracer.clone(),
        presentation: derive_presentation(
            loadable.referenced_modality.as_deref(),
            loadable.radiotracer.as_ref(),
        ),
        name: loadable.volume_name(),
    })
}

/// Reconstructs a time/parametric series of `number_of_frames` volumes
///
/// The loadable's files are split into contiguous equal-size chunks, one
/// per frame; each chunk is decoded independently, its acquisition
/// transform hardened, and the conversion factor applied before the frame
/// is folded into the output. Geometry is taken from frame 0. Any frame
/// failure, or cancellation between frames, aborts the whole
/// reconstruction; nothing partial is returned.
pub fn reconstruct_series<I: DicomIndex, D: ScalarVolumeDecoder>(
    loadable: &RwvmLoadable,
    number_of_frames: usize,
    index: &I,
    decoder: &D,
    options: &ReconstructOptions,
    cancel: &CancelToken,
) -> Result<FrameSeries> {
    let total_files = loadable.files.len();
    if number_of_frames == 0 || total_files % number_of_frames != 0 {
        return Err(SuvmapError::FrameCountMismatch {
            files: total_files,
            frames: number_of_frames,
        });
    }
    let files_per_frame = total_files / number_of_frames;

    let mut frames = Vec::with_capacity(number_of_frames);
    let mut geometry: Option<VolumeGeometry> = None;
    for frame_index in 0..number_of_frames {
        if cancel.is_cancelled() {
            return Err(SuvmapError::Cancelled);
        }
        debug!("reconstructing frame {}/{}", frame_index + 1, number_of_frames);

        let chunk = &loadable.files[frame_index * files_per_frame..(frame_index + 1) * files_per_frame];
        let candidate = best_candidate(decoder, chunk, &loadable.name).map_err(|_| {
            SuvmapError::InvalidSeries(format!("volume frame {} is invalid", frame_index))
        })?;
        let mut frame = decoder.load(&candidate).map_err(|e| {
            SuvmapError::InvalidSeries(format!("volume frame {} is invalid: {}", frame_index, e))
        })?;
        frame.harden_parent_transform();

        match &geometry {
            None => geometry = Some(frame.geometry),
            Some(reference) => {
                if options.geometry_check
                    && !frame.geometry.approx_eq(reference, options.geometry_epsilon)
                {
                    return Err(SuvmapError::InvalidSeries(format!(
                        "volume frame {} does not match frame 0 geometry",
                        frame_index
                    )));
                }
            }
        }
        frames.push(apply_slope(frame.data, loadable.record.slope));
    }

    let geometry =
        geometry.ok_or_else(|| SuvmapError::InvalidSeries("no frames produced".to_string()))?;
    Ok(FrameSeries {
        frames,
        geometry,
        files_per_frame,
        source_instance_uids: instance_uids(&loadable.files, index),
        rwvm_instance_uid: index.file_value(&loadable.rwvm_file, SOP_INSTANCE_UID),
        quantity: loadable.record.quantity.clone(),
        units: loadable.record.units.clone(),
        referenced_modality: loadable.referenced_modality.clone(),
        radiotracer: loadable.radiotracer.clone(),
        presentation: derive_presentation(
            loadable.referenced_modality.as_deref(),
            loadable.radiotracer.as_ref(),
        ),
        name: loadable.volume_name(),
    })
}

/// First decoder candidate for the files, or `InvalidSeries`
fn best_candidate<D: ScalarVolumeDecoder>(
    decoder: &D,
    files: &[PathBuf],
    name: &str,
) -> Result<VolumeCandidate> {
    let mut candidates = decoder.examine(files);
    if candidates.is_empty() {
        return Err(SuvmapError::InvalidSeries(format!(
            "cannot build a scalar volume for '{}'",
            name
        )));
    }
    let candidate = candidates.remove(0);
    if let Some(warning) = &candidate.warning {
        warn!("decoder warning for '{}': {}", name, warning);
    }
    Ok(candidate)
}

/// Applies the conversion factor in one full-array pass
///
/// The slope is applied as a double-precision scalar: every voxel is
/// widened to f64 before the multiply, then stored at the output
/// precision.
fn apply_slope(data: Array3<f32>, slope: f64) -> Array3<f32> {
    data.mapv_into(|v| (f64::from(v) * slope) as f32)
}

/// SOP instance UIDs for the files, in file order
///
/// Files the index cannot attribute keep a placeholder so the list stays
/// aligned with the file order.
fn instance_uids<I: DicomIndex>(files: &[PathBuf], index: &I) -> Vec<String> {
    files
        .iter()
        .map(|file| {
            index
                .file_value(file, SOP_INSTANCE_UID)
                .unwrap_or_else(|| "Unknown".to_string())
        })
        .collect()
}

/// Attribute map shared by both reconstruction outputs
fn volume_attributes(
    source_instance_uids: &[String],
    rwvm_instance_uid: &Option<String>,
    referenced_modality: &Option<String>,
    radiotracer: &Option<CodedValue>,
) -> Vec<(String, String)> {
    let mut attributes = vec![
        (
            "DICOM.instanceUIDs".to_string(),
            source_instance_uids.join(" "),
        ),
        (
            "DICOM.RWV.instanceUID".to_string(),
            rwvm_instance_uid.clone().unwrap_or_default(),
        ),
    ];
    if referenced_modality.as_deref() == Some("PT") {
        attributes.push((
            "DICOM.RadiopharmaceuticalCodeValue".to_string(),
            radiotracer
                .as_ref()
                .map(|code| code.code.clone())
                .unwrap_or_else(|| "unknown".to_string()),
        ));
    }
    attributes
}
