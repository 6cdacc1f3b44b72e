use crate::error::Result;
use crate::types::{SpatialTransform, VolumeGeometry};
use ndarray::Array3;
use std::path::PathBuf;

/// One way of building a scalar volume from a set of files
///
/// Produced by [`ScalarVolumeDecoder::examine`]; `files` carry the
/// decoder's geometrically sorted ordering, which this crate reuses instead
/// of re-deriving spatial sort logic.
#[derive(Debug, Clone)]
pub struct VolumeCandidate {
    /// Input files in geometric (spatial) order
    pub files: Vec<PathBuf>,

    /// Decoder warning for a partially usable candidate
    pub warning: Option<String>,
}

/// A decoded scalar volume as handed over by the decoder collaborator
#[derive(Debug, Clone)]
pub struct DecodedVolume {
    /// Voxel values, slice-major (slice, row, column)
    pub data: Array3<f32>,

    /// Spatial mapping of the voxel grid
    pub geometry: VolumeGeometry,

    /// Acquisition transform not yet folded into the geometry, if any
    pub parent_transform: Option<SpatialTransform>,
}

impl DecodedVolume {
    /// Folds any pending parent transform into the geometry and discards it
    ///
    /// After this call the volume is fully axis-aligned in its own
    /// coordinate frame.
    pub fn harden_parent_transform(&mut self) {
        if let Some(parent) = self.parent_transform.take() {
            self.geometry.harden(&parent);
        }
    }
}

/// Generic scalar-volume decoder collaborator
///
/// Turns a sequence of 2-D image files into one spatially ordered 3-D
/// array. Pixel decoding and spatial sorting live behind this contract;
/// this crate never decodes pixel data itself. Implementations are expected
/// to be safe for concurrent read access.
pub trait ScalarVolumeDecoder {
    /// Candidate interpretations of the file group, best first
    fn examine(&self, files: &[PathBuf]) -> Vec<VolumeCandidate>;

    /// Decodes one candidate into a scalar volume
    fn load(&self, candidate: &VolumeCandidate) -> Result<DecodedVolume>;
}
