//! Connected-component labeling and cluster centers.
//!
//! Labeling is a single raster pass that hands out provisional labels and
//! records which provisional labels touch each other. Touching labels are
//! merged with a disjoint-set forest, and the resulting classes are
//! renumbered densely (starting from 1) in order of their smallest
//! provisional label.
//!
//! # Periodic centers
//!
//! A cluster that crosses the periodic boundary can't be averaged directly
//! (the mean of its coordinates would land somewhere between the pieces on
//! either side). Instead, each cluster is walked breadth-first from its first
//! voxel in raster order, and every voxel is assigned the position it would
//! have if the image were tiled infinitely. The mean of those positions is
//! wrapped back into the image. A cluster that wraps all the way around an
//! axis has no well-defined center, and the walk simply uses the first copy
//! of each voxel that it reaches.

use crate::image::{Grid, box_indices};
use crate::{Error, Kernel};
use ndarray::{ArrayD, ArrayViewD};
use std::collections::VecDeque;
use tracing::debug;

/// A labeled image and the matching cluster-center map
#[derive(Clone, Debug)]
pub struct Clusters {
    labels: ArrayD<i32>,
    centers: ArrayD<i32>,
    n_clusters: usize,
}

impl Clusters {
    /// 0 marks background. Clusters are numbered from 1.
    pub fn labels(&self) -> &ArrayD<i32> {
        &self.labels
    }

    /// Holds the label of each cluster at the voxel closest to its center of
    /// mass, and 0 everywhere else.
    pub fn centers(&self) -> &ArrayD<i32> {
        &self.centers
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn into_parts(self) -> (ArrayD<i32>, ArrayD<i32>) {
        (self.labels, self.centers)
    }
}

/// A disjoint-set forest over provisional labels
struct LabelForest {
    parent: Vec<usize>,
}

impl LabelForest {
    fn new() -> Self {
        // entry 0 is the background
        LabelForest { parent: vec![0] }
    }

    fn push(&mut self) -> usize {
        let label = self.parent.len();
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut label: usize) -> usize {
        while self.parent[label] != label {
            // path halving
            let grandparent = self.parent[self.parent[label]];
            self.parent[label] = grandparent;
            label = grandparent;
        }
        label
    }

    /// the root of each class is always its smallest member
    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra < rb {
            self.parent[rb] = ra;
        } else if rb < ra {
            self.parent[ra] = rb;
        }
    }

    /// maps every provisional label onto a dense label (0 stays 0)
    fn dense_labels(&mut self) -> (Vec<i32>, usize) {
        let n = self.parent.len();
        let mut out = vec![0_i32; n];
        let mut n_labels = 0;
        for label in 1..n {
            let root = self.find(label);
            if root == label {
                n_labels += 1;
                out[label] = n_labels as i32;
            } else {
                // roots are smaller than every other member, so they were
                // already visited
                out[label] = out[root];
            }
        }
        (out, n_labels)
    }
}

/// Labels the nonzero voxels of `image`.
///
/// Returns the label grid and the number of labels.
fn label_grid(image: &Grid<i32>, kernel: &Kernel, min_size: usize, periodic: bool) -> (Grid<i32>, usize) {
    let spec = image.spec();
    let mut labels = Grid::filled(spec, image.shape(), 0_i32);
    let mut forest = LabelForest::new();
    let wrap = |v: [usize; 3], d: &[isize; 3]| {
        spec.wrap(
            [
                v[0] as isize + d[0],
                v[1] as isize + d[1],
                v[2] as isize + d[2],
            ],
            periodic,
        )
    };

    for v in box_indices([0; 3], spec.shape_usize()) {
        if image.get(v) == 0 {
            continue;
        }

        if labels.get(v) == 0 {
            let adopted = kernel
                .offsets()
                .iter()
                .filter_map(|d| wrap(v, d))
                .map(|n| labels.get(n))
                .find(|l| *l != 0);
            let label = match adopted {
                Some(l) => l,
                None => forest.push() as i32,
            };
            labels.set(v, label);
        }

        let cur = labels.get(v);
        for n in kernel.offsets().iter().filter_map(|d| wrap(v, d)) {
            if image.get(n) == 0 {
                continue;
            }
            match labels.get(n) {
                0 => labels.set(n, cur),
                other => forest.union(cur as usize, other as usize),
            }
        }
    }

    let (dense, mut n_labels) = forest.dense_labels();
    for l in labels.values_mut() {
        *l = dense[*l as usize];
    }

    if min_size > 0 {
        let mut sizes = vec![0_usize; n_labels + 1];
        for l in labels.values() {
            sizes[*l as usize] += 1;
        }
        let mut renumber = vec![0_i32; n_labels + 1];
        let mut kept = 0;
        for label in 1..=n_labels {
            if sizes[label] >= min_size {
                kept += 1;
                renumber[label] = kept as i32;
            }
        }
        for l in labels.values_mut() {
            *l = renumber[*l as usize];
        }
        n_labels = kept;
    }
    (labels, n_labels)
}

/// rounds the mean coordinate of each label, `None` for empty labels
fn rounded_means(sums: &[[f64; 4]]) -> impl Iterator<Item = (usize, Option<[isize; 3]>)> + '_ {
    sums.iter().enumerate().skip(1).map(|(label, s)| {
        if s[3] > 0.0 {
            let mean = [s[0] / s[3], s[1] / s[3], s[2] / s[3]];
            (label, Some(mean.map(|x| x.round() as isize)))
        } else {
            (label, None)
        }
    })
}

fn centers_clamped(labels: &Grid<i32>, n_labels: usize) -> Grid<i32> {
    let spec = labels.spec();
    let shape = spec.shape_usize();
    let mut sums = vec![[0.0_f64; 4]; n_labels + 1];
    for v in box_indices([0; 3], shape) {
        let l = labels.get(v) as usize;
        if l > 0 {
            for axis in 0..3 {
                sums[l][axis] += v[axis] as f64;
            }
            sums[l][3] += 1.0;
        }
    }

    let mut centers = Grid::filled(spec, labels.shape(), 0_i32);
    for (label, mean) in rounded_means(&sums) {
        if let Some(mean) = mean {
            let mut c = [0_usize; 3];
            for axis in 0..3 {
                c[axis] = mean[axis].clamp(0, shape[axis] as isize - 1) as usize;
            }
            centers.set(c, label as i32);
        }
    }
    centers
}

fn centers_periodic(labels: &Grid<i32>, n_labels: usize, kernel: &Kernel) -> Grid<i32> {
    let spec = labels.spec();
    let shape = spec.shape_usize();

    // neighbors are followed in both directions, even for a one-sided kernel
    let steps: Vec<[isize; 3]> = kernel
        .offsets()
        .iter()
        .flat_map(|d| [*d, d.map(|x| -x)])
        .collect();

    let mut visited = Grid::filled(spec, labels.shape(), false);
    let mut queue: VecDeque<([usize; 3], [isize; 3])> = VecDeque::new();
    let mut sums = vec![[0.0_f64; 4]; n_labels + 1];
    for seed in box_indices([0; 3], shape) {
        let label = labels.get(seed);
        if label == 0 || visited.get(seed) {
            continue;
        }
        // walk the cluster, tracking the position of every voxel relative to
        // the seed without wrapping
        visited.set(seed, true);
        queue.push_back((seed, seed.map(|x| x as isize)));
        while let Some((v, pos)) = queue.pop_front() {
            let s = &mut sums[label as usize];
            for axis in 0..3 {
                s[axis] += pos[axis] as f64;
            }
            s[3] += 1.0;
            for d in &steps {
                let n = [pos[0] + d[0], pos[1] + d[1], pos[2] + d[2]];
                let Some(nv) = spec.wrap(
                    [
                        v[0] as isize + d[0],
                        v[1] as isize + d[1],
                        v[2] as isize + d[2],
                    ],
                    true,
                ) else {
                    continue;
                };
                if labels.get(nv) == label && !visited.get(nv) {
                    visited.set(nv, true);
                    queue.push_back((nv, n));
                }
            }
        }
    }

    let mut centers = Grid::filled(spec, labels.shape(), 0_i32);
    for (label, mean) in rounded_means(&sums) {
        if let Some(mean) = mean {
            if let Some(c) = spec.wrap(mean, true) {
                centers.set(c, label as i32);
            }
        }
    }
    centers
}

/// labels `image` and locates the centers, returns (labels, centers,
/// number of clusters)
pub(crate) fn cluster_grids(
    image: &Grid<i32>,
    kernel: &Kernel,
    min_size: usize,
    periodic: bool,
) -> Result<(Grid<i32>, Grid<i32>, usize), Error> {
    kernel.check_matches(image)?;
    debug!(
        shape = ?image.shape(),
        n_neighbors = kernel.offsets().len(),
        min_size,
        periodic,
        "labeling clusters"
    );
    let (labels, n_labels) = label_grid(image, kernel, min_size, periodic);
    let centers = if periodic {
        centers_periodic(&labels, n_labels, kernel)
    } else {
        centers_clamped(&labels, n_labels)
    };
    debug!(n_clusters = n_labels, "labeling complete");
    Ok((labels, centers, n_labels))
}

/// Labels the connected clusters of nonzero voxels in `image`.
///
/// Two nonzero voxels belong to the same cluster when they are (directly or
/// transitively) neighbors under `kernel`. When `periodic` is `true`,
/// neighbors are found across the image boundaries. Clusters with fewer
/// than `min_size` voxels are removed (`0` keeps every cluster).
pub fn label_clusters(
    image: ArrayViewD<i32>,
    kernel: &Kernel,
    min_size: usize,
    periodic: bool,
) -> Result<Clusters, Error> {
    let grid = Grid::from_view("image", &image)?;
    let (labels, centers, n_clusters) = cluster_grids(&grid, kernel, min_size, periodic)?;
    Ok(Clusters {
        labels: labels.into_array(),
        centers: centers.into_array(),
        n_clusters,
    })
}

/// [`label_clusters`] with the nearest-neighbor kernel
pub fn label_default(image: ArrayViewD<i32>, min_size: usize, periodic: bool) -> Result<Clusters, Error> {
    let kernel = Kernel::default_for(image.ndim())?;
    label_clusters(image, &kernel, min_size, periodic)
}
