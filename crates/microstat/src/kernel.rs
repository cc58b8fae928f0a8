//! Structuring elements that define adjacency for labeling and dilation.

use crate::Error;
use crate::image::{Grid, box_indices};
use ndarray::{ArrayD, ArrayViewD, IxDyn};

/// An odd-shaped binary neighborhood.
///
/// The central element corresponds to zero displacement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kernel {
    shape: Vec<usize>,
    // nonzero displacements, excluding the center, in raster order
    offsets: Vec<[isize; 3]>,
}

impl Kernel {
    /// The nearest-neighbor (von Neumann) kernel: each axis has length 3 and
    /// only axis-aligned neighbors are included.
    pub fn default_for(ndim: usize) -> Result<Kernel, Error> {
        Self::from_predicate(ndim, |d| d.iter().map(|c| c.abs()).sum::<isize>() <= 1)
    }

    /// The kernel that includes every neighbor in a box of length 3 (8
    /// neighbors in 2D, 26 in 3D).
    pub fn full(ndim: usize) -> Result<Kernel, Error> {
        Self::from_predicate(ndim, |_| true)
    }

    fn from_predicate(ndim: usize, include: impl Fn(&[isize; 3]) -> bool) -> Result<Kernel, Error> {
        if ndim == 0 || ndim > 3 {
            return Err(Error::invalid_dimension("kernel", ndim));
        }
        let shape = vec![3; ndim];
        let mut hi = [1; 3];
        hi[..ndim].fill(3);
        let offsets = box_indices([0; 3], hi)
            .map(|idx| centered(idx, &hi))
            .filter(|d| *d != [0; 3] && include(d))
            .collect();
        Ok(Kernel { shape, offsets })
    }

    /// Builds a kernel from an array. Nonzero entries mark neighbors. Every
    /// axis must have an odd length.
    pub fn from_array(kernel: ArrayViewD<i32>) -> Result<Kernel, Error> {
        let grid = Grid::from_view("kernel", &kernel)?;
        if let Some(axis) = grid.shape().iter().position(|len| len % 2 == 0) {
            return Err(Error::invalid_parity("kernel", axis, grid.shape()[axis]));
        }
        let n = grid.spec().shape_usize();
        let offsets = box_indices([0; 3], n)
            .filter(|idx| grid.get(*idx) != 0)
            .map(|idx| centered(idx, &n))
            .filter(|d| *d != [0; 3])
            .collect();
        Ok(Kernel {
            shape: grid.shape().to_vec(),
            offsets,
        })
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The displacements of the neighbors (the center is never included).
    /// Entries for axes beyond [`Self::ndim`] are 0.
    pub fn offsets(&self) -> &[[isize; 3]] {
        &self.offsets
    }

    /// The kernel as a 0/1 array (the center is always 1)
    pub fn to_array(&self) -> ArrayD<i32> {
        let mut out = ArrayD::zeros(IxDyn(&self.shape));
        let center: Vec<usize> = self.shape.iter().map(|len| (len - 1) / 2).collect();
        out[IxDyn(&center)] = 1;
        for d in &self.offsets {
            let idx: Vec<usize> = center
                .iter()
                .zip(d.iter())
                .map(|(c, d)| (*c as isize + d) as usize)
                .collect();
            out[IxDyn(&idx)] = 1;
        }
        out
    }

    pub(crate) fn check_matches<T: Copy>(&self, image: &Grid<T>) -> Result<(), Error> {
        if self.ndim() != image.ndim() {
            Err(Error::shape_mismatch("kernel", image.shape(), &self.shape))
        } else {
            Ok(())
        }
    }
}

fn centered(idx: [usize; 3], n: &[usize; 3]) -> [isize; 3] {
    [
        idx[0] as isize - (n[0] as isize - 1) / 2,
        idx[1] as isize - (n[1] as isize - 1) / 2,
        idx[2] as isize - (n[2] as isize - 1) / 2,
    ]
}
