//! Core type definitions for RWVM interpretation
//!
//! This module provides the fundamental types used throughout the suvmap
//! library:
//! - [`CodedValue`]: a (code, scheme, meaning) controlled-vocabulary concept
//! - [`RwvmRecord`]: one real-world-value mapping entry
//! - [`RwvmLoadable`]: a candidate interpretation of an RWVM object
//! - [`PresentationPolicy`] / [`ColorTable`]: derived display policy
//! - [`VolumeGeometry`] / [`SpatialTransform`]: spatial mapping of a volume

mod coded_value;
mod geometry;
mod loadable;
mod presentation;
mod record;

pub use coded_value::CodedValue;
pub use geometry::{Matrix4, SpatialTransform, VolumeGeometry, IDENTITY};
pub use loadable::{RwvmLoadable, RWVM_CONFIDENCE};
pub use presentation::{ColorTable, PresentationPolicy};
pub use record::RwvmRecord;
