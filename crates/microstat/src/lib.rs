/*!
Provides routines for computing statistics that characterize the
microstructure of 1D, 2D, and 3D images (e.g. 2-point probabilities, weighted
correlations, the lineal path function) along with the image-processing
primitives they rely upon (cluster labeling, dilation, voxel paths).

# High-Level: Image Statistics

Each statistic is measured over a window of displacements, called the region
of interest (ROI). The ROI is an odd-shaped box, and the entry at the center
of a result corresponds to zero displacement. Every statistic is returned as
a [`Correlation`], a pair of arrays holding the accumulated numerator and the
normalization. Keeping both around makes it possible to combine many images
with an [`Ensemble`].

- [`s2`] computes the 2-point probability (or correlation) of 2 images.
- [`w2`] is the weighted 2-point correlation, normalized by the sum of the
  weights.
- [`w2c`] (and [`w2c_auto`]) measure a weighted correlation from the edge of
  each cluster, by walking voxel paths outward from each cluster center.
- [`lineal_path`] estimates the probability that a full voxel path lies in
  the nonzero phase.

# Conventions

Inputs are [`ndarray`] views with 1 to 3 axes. Images that wrap around their
boundaries are called periodic. Voxels with nonzero entries in a mask are
excluded. An index into the ROI is related to a displacement `d` through
`index = d + (roi - 1) / 2`.

Operations validate all of their arguments before producing any output, so an
[`Error`] means that nothing was computed (or accumulated).

# Developer Guide

The geometric primitives that don't need the standard library live in
[`microstat_nostd_internal`].

*/

#![deny(rustdoc::broken_intra_doc_links)]

// inform build-system of the modules in this package
mod cluster;
mod correlation;
mod dilate;
mod ensemble;
mod error;
mod geometry;
mod image;
mod kernel;
mod path_stats;
mod synthetic;

// pull in symbols that are visible outside of the package
pub use cluster::{Clusters, label_clusters, label_default};
pub use correlation::{Correlation, WindowOptions, s2, w2};
pub use dilate::{dilate, dilate_default, dilate_uniform};
pub use ensemble::{Ensemble, EnsembleBuilder, StatKind};
pub use error::Error;
pub use geometry::{midpoint, n_stamp_points, stamp_points, voxel_path};
pub use image::{CompareWith, Voxel, mean, pad};
pub use kernel::Kernel;
pub use microstat_nostd_internal::{PathMode, VoxelPath};
pub use path_stats::{lineal_path, w2c, w2c_auto};
pub use synthetic::dummy_circles;
