use std::fmt;

/// Color table applied to a reconstructed volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum ColorTable {
    /// Inverted grey ramp, the conventional PET display
    InvertedGrey,
}

impl fmt::Display for ColorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorTable::InvertedGrey => write!(f, "inverted-grey"),
        }
    }
}

/// Display policy derived from the referenced modality and radiotracer
///
/// Pure derived data, recomputed per volume and never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PresentationPolicy {
    /// Let the viewer pick window/level from the data
    pub auto_window_level: bool,

    /// Fixed window width, when auto window/level is off
    pub window: Option<f64>,

    /// Fixed window level, when auto window/level is off
    pub level: Option<f64>,

    /// Color table to apply, when any
    pub color_table: Option<ColorTable>,

    /// Whether the viewer should interpolate between voxels
    pub interpolate: bool,
}

impl PresentationPolicy {
    /// Policy for non-quantitative modalities: automatic window/level
    pub fn auto() -> Self {
        Self {
            auto_window_level: true,
            window: None,
            level: None,
            color_table: None,
            interpolate: false,
        }
    }

    /// Fixed window/level with the inverted grey table, used for PET tracers
    pub fn fixed(window: f64, level: f64) -> Self {
        Self {
            auto_window_level: false,
            window: Some(window),
            level: Some(level),
            color_table: Some(ColorTable::InvertedGrey),
            interpolate: false,
        }
    }
}
