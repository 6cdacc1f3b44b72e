pub mod discovery;
pub mod presentation;
pub mod reconstruct;
pub mod resolve;

pub use discovery::examine;
pub use presentation::derive_presentation;
pub use reconstruct::{
    reconstruct_series, reconstruct_single, CancelToken, FrameSeries, ReconstructOptions,
    ReconstructedVolume,
};
pub use resolve::{resolve, resolve_references, sort_files, ResolveOptions};
