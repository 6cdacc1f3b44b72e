use crate::decoder::ScalarVolumeDecoder;
use crate::error::Result;
use crate::index::DicomIndex;
use crate::pipeline::reconstruct::{
    reconstruct_series, reconstruct_single, CancelToken, FrameSeries, ReconstructOptions,
    ReconstructedVolume,
};
use crate::pipeline::resolve::ResolveOptions;
use crate::pipeline::{discovery, resolve};
use crate::types::RwvmLoadable;
use std::path::PathBuf;

/// High-level RWVM import pipeline
///
/// Owns its collaborators: the index that resolves instance UIDs to files
/// and the decoder that builds spatial volumes. The pipeline itself keeps
/// no state between calls; each stage consumes its input and returns a new
/// value, so independent loadables can be processed concurrently as long
/// as the collaborators tolerate concurrent reads.
///
/// The usual call order is `examine` over the file groups of interest,
/// `resolve` on each selected loadable, then `reconstruct_single` or
/// `reconstruct_series` depending on whether the caller wants one spatial
/// volume or a time/parametric series.
pub struct RwvmImporter<I, D> {
    index: I,
    decoder: D,
}

impl<I: DicomIndex, D: ScalarVolumeDecoder> RwvmImporter<I, D> {
    /// Creates a pipeline over the given collaborators
    pub fn new(index: I, decoder: D) -> Self {
        Self { index, decoder }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Candidate interpretations for every RWVM object in the file groups
    pub fn examine(&self, file_groups: &[Vec<PathBuf>]) -> Vec<RwvmLoadable> {
        discovery::examine(file_groups, &self.index)
    }

    /// Resolves a discovered loadable into one ready for reconstruction
    pub fn resolve(&self, loadable: RwvmLoadable, options: &ResolveOptions) -> Result<RwvmLoadable> {
        resolve::resolve(loadable, &self.index, &self.decoder, options)
    }

    /// Reconstructs one scaled spatial volume
    pub fn reconstruct_single(&self, loadable: &RwvmLoadable) -> Result<ReconstructedVolume> {
        reconstruct_single(loadable, &self.index, &self.decoder)
    }

    /// Reconstructs a scaled series of `number_of_frames` volumes
    pub fn reconstruct_series(
        &self,
        loadable: &RwvmLoadable,
        number_of_frames: usize,
        options: &ReconstructOptions,
        cancel: &CancelToken,
    ) -> Result<FrameSeries> {
        reconstruct_series(
            loadable,
            number_of_frames,
            &self.index,
            &self.decoder,
            options,
            cancel,
        )
    }
}
