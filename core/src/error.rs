use thiserror::Error;

/// Result type for suvmap operations
pub type Result<T> = std::result::Result<T, SuvmapError>;

/// Error types for suvmap operations
#[derive(Error, Debug)]
pub enum SuvmapError {
    /// Unreadable or invalid DICOM byte stream; fatal for that file only
    #[error("malformed DICOM input: {0}")]
    MalformedInput(String),

    /// A referenced SOP instance UID was not found in the index
    #[error("referenced instance not found in index: {uid}")]
    UnresolvedReference { uid: String },

    /// The decoder could not sort or build a spatial volume; fatal for the loadable
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    /// Frame-file count is not evenly divisible by the frame count
    #[error("{files} files cannot be split into {frames} equal frames")]
    FrameCountMismatch { files: usize, frames: usize },

    /// Multi-frame reconstruction was cancelled between frames
    #[error("reconstruction cancelled")]
    Cancelled,

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for SuvmapError {
    fn from(e: dicom_object::ReadError) -> Self {
        SuvmapError::MalformedInput(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for SuvmapError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        SuvmapError::MalformedInput(format!("{}", e))
    }
}
