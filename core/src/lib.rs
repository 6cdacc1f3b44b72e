pub mod api;
pub mod cli;
pub mod decoder;
pub mod error;
pub mod extraction;
pub mod index;
pub mod pipeline;
pub mod reader;
pub mod types;

pub use api::RwvmImporter;
pub use cli::report::LoadablesReport;
pub use decoder::{DecodedVolume, ScalarVolumeDecoder, VolumeCandidate};
pub use error::{Result, SuvmapError};
pub use index::{DicomIndex, InMemoryIndex};
pub use pipeline::{
    derive_presentation, CancelToken, FrameSeries, ReconstructOptions, ReconstructedVolume,
    ResolveOptions,
};
pub use types::*;

#[cfg(test)]
pub(crate) mod testing;
