//! Statistics accumulated along voxel paths (W2c & the lineal path function).
//!
//! Both statistics trace a ray from a source voxel to every point on the
//! surface of the region of interest (see
//! [`microstat_nostd_internal::stamp_points`]) and walk the voxels of each
//! ray in order.

use crate::cluster::cluster_grids;
use crate::correlation::{Correlation, is_masked, load_mask};
use crate::image::{Grid, Roi, Voxel, box_indices, source_bounds};
use crate::{Error, Kernel};
use microstat_nostd_internal::{PathMode, VoxelPath, stamp_points, voxel_path};
use ndarray::ArrayViewD;
use tracing::{debug, trace};

/// trace a path from the center of `roi` to every point on its surface
fn stamp_paths(roi: &Roi, mode: PathMode) -> Result<Vec<VoxelPath>, Error> {
    let ndim = roi.shape().len();
    let origin = [0_isize; 3];
    let paths = stamp_points(roi.shape())?
        .iter()
        .map(|end| voxel_path(&origin[..ndim], &end[..ndim], mode))
        .collect::<Result<Vec<_>, _>>()?;
    trace!(n_paths = paths.len(), %mode, "traced stamp paths");
    Ok(paths)
}

#[inline]
fn shifted(v: [usize; 3], d: &[isize; 3]) -> [isize; 3] {
    [
        v[0] as isize + d[0],
        v[1] as isize + d[1],
        v[2] as isize + d[2],
    ]
}

fn w2c_grids<T: Voxel>(
    clusters: &Grid<i32>,
    centers: &Grid<i32>,
    field: &Grid<T>,
    roi: &Roi,
    mask: &Option<Grid<i32>>,
    mode: PathMode,
    periodic: bool,
) -> Result<Correlation, Error> {
    let spec = field.spec();
    let margin = if periodic { [0; 3] } else { roi.half_usize() };
    let (lo, hi) = source_bounds(spec, margin);
    let paths = stamp_paths(roi, mode)?;

    let mut numerator = vec![0.0; roi.n_slots()];
    let mut normalization = vec![0.0; roi.n_slots()];

    for v in box_indices(lo, hi) {
        let label = centers.get(v);
        // only centers that lie inside their own cluster are used
        if label == 0 || clusters.get(v) != label {
            continue;
        }
        for path in &paths {
            let voxels = path.voxels();
            // once the path leaves the cluster, the voxels are stored as if
            // the path started at the cluster's edge
            let mut jpix: Option<usize> = None;
            for d in voxels {
                let Some(t) = spec.wrap(shifted(v, d), periodic) else {
                    break;
                };
                if jpix.is_none() && clusters.get(t) != label {
                    jpix = Some(0);
                }
                if let Some(j) = jpix {
                    if !is_masked(mask, t) {
                        let slot = roi.slot(voxels[j]);
                        normalization[slot] += 1.0;
                        numerator[slot] += field.get(t).weight();
                    }
                    jpix = Some(j + 1);
                }
            }
        }
    }
    Ok(Correlation::from_buffers(roi, numerator, normalization))
}

/// Weighted two-point correlation, measured from the edge of each cluster.
///
/// `clusters` and `centers` are typically produced by
/// [`crate::label_clusters`]. From every cluster center, rays are traced
/// outward. Along each ray, the voxels past the point where the ray leaves
/// the cluster are accumulated as though the ray started at that point.
/// Voxels where `mask` is nonzero are skipped.
pub fn w2c<T: Voxel>(
    clusters: ArrayViewD<i32>,
    centers: ArrayViewD<i32>,
    field: ArrayViewD<T>,
    roi: &[usize],
    mask: Option<ArrayViewD<i32>>,
    mode: PathMode,
    periodic: bool,
) -> Result<Correlation, Error> {
    let field = Grid::from_view("field", &field)?;
    let clusters = Grid::from_view("clusters", &clusters)?;
    let centers = Grid::from_view("centers", &centers)?;
    field.check_same_shape("clusters", &clusters)?;
    field.check_same_shape("centers", &centers)?;
    let mask = load_mask("mask", mask, &field)?;
    let roi = Roi::for_image(roi, &field)?;
    debug!(
        shape = ?field.shape(),
        roi = ?roi.shape(),
        %mode,
        periodic,
        "computing W2c"
    );
    w2c_grids(&clusters, &centers, &field, &roi, &mask, mode, periodic)
}

/// [`w2c`], where the clusters are found by labeling `weights` with the
/// nearest-neighbor kernel
pub fn w2c_auto<T: Voxel>(
    weights: ArrayViewD<i32>,
    field: ArrayViewD<T>,
    roi: &[usize],
    mask: Option<ArrayViewD<i32>>,
    mode: PathMode,
    periodic: bool,
) -> Result<Correlation, Error> {
    let field = Grid::from_view("field", &field)?;
    let weights = Grid::from_view("weights", &weights)?;
    field.check_same_shape("weights", &weights)?;
    let mask = load_mask("mask", mask, &field)?;
    let roi = Roi::for_image(roi, &field)?;
    let kernel = Kernel::default_for(weights.ndim())?;
    let (clusters, centers, n_clusters) = cluster_grids(&weights, &kernel, 0, periodic)?;
    debug!(
        shape = ?field.shape(),
        roi = ?roi.shape(),
        n_clusters,
        %mode,
        periodic,
        "computing W2c"
    );
    w2c_grids(&clusters, &centers, &field, &roi, &mask, mode, periodic)
}

/// The lineal path function of a binary image.
///
/// For each displacement `d`, estimates the probability that the whole
/// voxel path from a voxel to the voxel at offset `d` lies in the nonzero
/// phase. Every ray is walked from each source voxel until it meets the
/// first zero voxel.
pub fn lineal_path(
    image: ArrayViewD<i32>,
    roi: &[usize],
    mode: PathMode,
    periodic: bool,
) -> Result<Correlation, Error> {
    let image = Grid::from_view("image", &image)?;
    let roi = Roi::for_image(roi, &image)?;
    debug!(
        shape = ?image.shape(),
        roi = ?roi.shape(),
        %mode,
        periodic,
        "computing lineal path"
    );

    let spec = image.spec();
    let margin = if periodic { [0; 3] } else { roi.half_usize() };
    let (lo, hi) = source_bounds(spec, margin);
    let paths = stamp_paths(&roi, mode)?;

    let mut numerator = vec![0.0; roi.n_slots()];
    for v in box_indices(lo, hi) {
        for path in &paths {
            for d in path.iter() {
                match image.get_wrapped(shifted(v, d), periodic) {
                    Some(val) if val != 0 => numerator[roi.slot(*d)] += 1.0,
                    _ => break,
                }
            }
        }
    }

    // every ray visits each of its voxels once per source voxel
    let n_sources: usize = (0..3).map(|axis| hi[axis] - lo[axis]).product();
    let mut normalization = vec![0.0; roi.n_slots()];
    for path in &paths {
        for d in path.iter() {
            normalization[roi.slot(*d)] += n_sources as f64;
        }
    }
    Ok(Correlation::from_buffers(&roi, numerator, normalization))
}
