//! # epimatch-core
//!
//! This library provides the common vocabulary types shared by the epimatch
//! crates: keypoints as they come out of a feature detector, and pixel-space
//! correspondences between two images as they are consumed by geometric
//! estimation. Every crate in the workspace that has or produces these types
//! depends on this crate, so that estimators, consensus processes, and the
//! matching pipeline can all work with each other.
//!
//! The crate is designed to work with `#![no_std]`. Code that is not shared
//! across the workspace does not belong here.

#![no_std]

mod keypoint;
mod matches;

pub use keypoint::*;
pub use matches::*;
pub use nalgebra;
pub use sample_consensus;
