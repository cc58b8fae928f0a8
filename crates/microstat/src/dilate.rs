//! Label-preserving morphological dilation.
//!
//! Growth is simultaneous within a round. Every round reads the labels
//! committed at the end of the previous round and records its claims in a
//! separate buffer, which is merged once the round completes. A voxel
//! claimed during a round therefore never grows (or gets claimed again)
//! before the next round. When 2 labels reach the same background voxel in
//! one round, the label that reaches it first in raster order wins.

use crate::image::{Grid, box_indices};
use crate::{Error, Kernel};
use ndarray::{ArrayD, ArrayViewD};
use tracing::debug;

fn dilate_grid(image: &Grid<i32>, kernel: &Kernel, iterations: &[usize], periodic: bool) -> Grid<i32> {
    let spec = image.spec();
    let max_iter = iterations.iter().copied().max().unwrap_or(0);
    let mut committed = image.clone();
    let mut claims = Grid::filled(spec, image.shape(), 0_i32);

    for round in 0..max_iter {
        for v in box_indices([0; 3], spec.shape_usize()) {
            let label = committed.get(v);
            if label <= 0 || iterations[label as usize] <= round {
                continue;
            }
            for d in kernel.offsets() {
                let n = [
                    v[0] as isize + d[0],
                    v[1] as isize + d[1],
                    v[2] as isize + d[2],
                ];
                if let Some(n) = spec.wrap(n, periodic) {
                    if committed.get(n) == 0 && claims.get(n) == 0 {
                        claims.set(n, label);
                    }
                }
            }
        }

        let mut n_claimed = 0_usize;
        for (dst, claim) in committed.values_mut().iter_mut().zip(claims.values_mut()) {
            if *claim != 0 {
                *dst = *claim;
                *claim = 0;
                n_claimed += 1;
            }
        }
        tracing::trace!(round, n_claimed, "dilation round");
    }
    committed
}

/// Grows each label of `image` into the surrounding background.
///
/// Label `l` grows for `iterations[l]` rounds, where each round claims the
/// background neighbors (under `kernel`) of every voxel holding the label.
/// `iterations` needs an entry for every label from 0 up to the maximum
/// label (the entry for the background is unused). Negative labels are left
/// alone and never grow.
pub fn dilate(
    image: ArrayViewD<i32>,
    kernel: &Kernel,
    iterations: &[usize],
    periodic: bool,
) -> Result<ArrayD<i32>, Error> {
    let grid = Grid::from_view("image", &image)?;
    kernel.check_matches(&grid)?;
    let max_label = grid.values().iter().copied().max().unwrap_or(0).max(0) as usize;
    if iterations.len() != max_label + 1 {
        return Err(Error::length_mismatch("iterations", max_label + 1, iterations.len()));
    }
    debug!(
        shape = ?grid.shape(),
        max_label,
        periodic,
        "dilating labels"
    );
    Ok(dilate_grid(&grid, kernel, iterations, periodic).into_array())
}

/// [`dilate`] with the same number of rounds for every label
pub fn dilate_uniform(
    image: ArrayViewD<i32>,
    kernel: &Kernel,
    iterations: usize,
    periodic: bool,
) -> Result<ArrayD<i32>, Error> {
    let max_label = image.iter().copied().max().unwrap_or(0).max(0) as usize;
    dilate(image, kernel, &vec![iterations; max_label + 1], periodic)
}

/// [`dilate_uniform`] with the default (face-sharing) kernel
pub fn dilate_default(image: ArrayViewD<i32>, iterations: usize, periodic: bool) -> Result<ArrayD<i32>, Error> {
    let kernel = Kernel::default_for(image.ndim())?;
    dilate_uniform(image, &kernel, iterations, periodic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn per_label_iterations() {
        let image = array![[1, 0, 0, 0, 0, 0, 2]].into_dyn();
        let kernel = Kernel::default_for(2).unwrap();
        let out = dilate(image.view(), &kernel, &[0, 2, 1], false).unwrap();
        assert_eq!(out, array![[1, 1, 1, 0, 0, 2, 2]].into_dyn());
    }

    #[test]
    fn contested_voxel() {
        // both labels reach the middle voxel in the same round
        let image = array![1, 0, 2].into_dyn();
        let kernel = Kernel::default_for(1).unwrap();
        let out = dilate_uniform(image.view(), &kernel, 3, false).unwrap();
        assert_eq!(out, array![1, 1, 2].into_dyn());
    }

    #[test]
    fn periodic_wrap() {
        let image = array![0, 0, 0, 0, 3].into_dyn();
        let kernel = Kernel::default_for(1).unwrap();
        let out = dilate(image.view(), &kernel, &[0, 0, 0, 1], true).unwrap();
        assert_eq!(out, array![3, 0, 0, 3, 3].into_dyn());
        let out = dilate(image.view(), &kernel, &[0, 0, 0, 1], false).unwrap();
        assert_eq!(out, array![0, 0, 0, 3, 3].into_dyn());
    }

    #[test]
    fn default_kernel() {
        let image = array![[0, 0, 0], [0, 5, 0], [0, 0, 0]].into_dyn();
        let out = dilate_default(image.view(), 1, false).unwrap();
        assert_eq!(out, array![[0, 5, 0], [5, 5, 5], [0, 5, 0]].into_dyn());
        let err = dilate_default(ArrayD::<i32>::zeros(ndarray::IxDyn(&[2, 2, 2, 2])).view(), 1, false).unwrap_err();
        assert_eq!(err.kind_name(), "InvalidDimension");
    }

    #[test]
    fn iteration_length() {
        let image = array![0, 4, 0].into_dyn();
        let kernel = Kernel::default_for(1).unwrap();
        let err = dilate(image.view(), &kernel, &[1, 1], false).unwrap_err();
        assert_eq!(err.kind_name(), "LengthMismatch");
    }
}
