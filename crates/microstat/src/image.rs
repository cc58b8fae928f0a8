//! Adapts `ndarray` inputs to the flat, always-3D grids used internally.
//!
//! Every image handed to a public function has 1, 2, or 3 axes. We copy it
//! into a [`Grid`], which stores the values contiguously (in logical
//! row-major order) alongside a [`View3DSpec`] describing the promoted 3D
//! shape. Absent axes have length 1.

use crate::Error;
use microstat_nostd_internal::{InternalError, View3DSpec, midpoint, unpack3d};
use ndarray::{ArrayD, ArrayViewD, Dimension, IxDyn, Slice};

/// The element types that images may hold.
///
/// Integer images hold labels, binary phases, or masks. Floating-point
/// images hold scalar fields.
pub trait Voxel: Copy + Default + PartialEq + core::fmt::Debug {
    fn is_nonzero(self) -> bool;

    /// the weight a voxel carries when it is used on its own: `1` or `0` for
    /// integers, the value itself for floating point numbers
    fn weight(self) -> f64;

    fn value(self) -> f64;
}

impl Voxel for i32 {
    #[inline]
    fn is_nonzero(self) -> bool {
        self != 0
    }

    #[inline]
    fn weight(self) -> f64 {
        if self != 0 { 1.0 } else { 0.0 }
    }

    #[inline]
    fn value(self) -> f64 {
        self as f64
    }
}

impl Voxel for f64 {
    #[inline]
    fn is_nonzero(self) -> bool {
        self != 0.0
    }

    #[inline]
    fn weight(self) -> f64 {
        self
    }

    #[inline]
    fn value(self) -> f64 {
        self
    }
}

/// Compares a voxel of one image against a voxel of a second image.
///
/// | `Self` | `U`   | result                        |
/// |--------|-------|-------------------------------|
/// | `i32`  | `i32` | `1` if equal, otherwise `0`   |
/// | `i32`  | `f64` | `other` if `self` is nonzero  |
/// | `f64`  | `i32` | `self` if `other` is nonzero  |
/// | `f64`  | `f64` | `self * other`                |
pub trait CompareWith<U: Voxel>: Voxel {
    fn compare(self, other: U) -> f64;
}

impl CompareWith<i32> for i32 {
    #[inline]
    fn compare(self, other: i32) -> f64 {
        if self == other { 1.0 } else { 0.0 }
    }
}

impl CompareWith<f64> for i32 {
    #[inline]
    fn compare(self, other: f64) -> f64 {
        if self != 0 { other } else { 0.0 }
    }
}

impl CompareWith<i32> for f64 {
    #[inline]
    fn compare(self, other: i32) -> f64 {
        if other != 0 { self } else { 0.0 }
    }
}

impl CompareWith<f64> for f64 {
    #[inline]
    fn compare(self, other: f64) -> f64 {
        self * other
    }
}

/// A contiguous copy of an image, promoted to 3D
#[derive(Clone, Debug)]
pub(crate) struct Grid<T> {
    spec: View3DSpec,
    shape: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// copy `view` into a new grid. `what` names the argument in errors.
    pub(crate) fn from_view(what: &'static str, view: &ArrayViewD<T>) -> Result<Self, Error> {
        let shape = view.shape().to_vec();
        let spec = View3DSpec::promote(&shape).map_err(|err| match err {
            InternalError::Dimension { actual, .. } => Error::invalid_dimension(what, actual),
            InternalError::EmptyAxis { .. } => Error::empty_axis(what),
            other => Error::from(other),
        })?;
        Ok(Grid {
            spec,
            shape,
            values: view.iter().copied().collect(),
        })
    }

    /// a grid of the given (already validated) spec, filled with `fill`
    pub(crate) fn filled(spec: &View3DSpec, shape: &[usize], fill: T) -> Self {
        Grid {
            spec: spec.clone(),
            shape: shape.to_vec(),
            values: vec![fill; spec.n_elements()],
        }
    }

    pub(crate) fn spec(&self) -> &View3DSpec {
        &self.spec
    }

    /// the shape of the image before promotion
    pub(crate) fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub(crate) fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub(crate) fn values(&self) -> &[T] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    #[inline]
    pub(crate) fn flat_idx(&self, idx: [usize; 3]) -> usize {
        self.spec
            .map_idx(idx[0] as isize, idx[1] as isize, idx[2] as isize) as usize
    }

    #[inline]
    pub(crate) fn get(&self, idx: [usize; 3]) -> T {
        self.values[self.flat_idx(idx)]
    }

    #[inline]
    pub(crate) fn set(&mut self, idx: [usize; 3], val: T) {
        let i = self.flat_idx(idx);
        self.values[i] = val;
    }

    /// Looks up a (possibly out-of-bounds) location, wrapping periodically
    /// when `periodic` is `true`. Returns `None` for out-of-bounds locations
    /// of a non-periodic grid.
    #[inline]
    pub(crate) fn get_wrapped(&self, idx: [isize; 3], periodic: bool) -> Option<T> {
        self.spec.wrap(idx, periodic).map(|idx| self.get(idx))
    }

    /// Ensures that `other` has the same (unpromoted) shape as `self`
    pub(crate) fn check_same_shape<U>(&self, what: &'static str, other: &Grid<U>) -> Result<(), Error> {
        if self.shape != other.shape {
            Err(Error::shape_mismatch(what, &self.shape, &other.shape))
        } else {
            Ok(())
        }
    }

    pub(crate) fn into_array(self) -> ArrayD<T> {
        let Grid { spec, shape, values } = self;
        ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
            let [h, i, j] = unpack3d(idx.slice(), 0);
            values[spec.map_idx(h as isize, i as isize, j as isize) as usize]
        })
    }
}

/// Iterates over every 3D index of a box, with the last axis varying
/// fastest. `lo` is inclusive and `hi` is exclusive.
pub(crate) fn box_indices(lo: [usize; 3], hi: [usize; 3]) -> impl Iterator<Item = [usize; 3]> {
    (lo[0]..hi[0]).flat_map(move |h| {
        (lo[1]..hi[1]).flat_map(move |i| (lo[2]..hi[2]).map(move |j| [h, i, j]))
    })
}

/// A validated, odd-shaped region of interest
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Roi {
    shape: Vec<usize>,
    half: [isize; 3],
}

impl Roi {
    pub(crate) fn new(shape: &[usize]) -> Result<Self, Error> {
        if shape.is_empty() || shape.len() > 3 {
            return Err(Error::invalid_dimension("roi", shape.len()));
        }
        if let Some(axis) = shape.iter().position(|len| len % 2 == 0) {
            return Err(Error::invalid_parity("roi", axis, shape[axis]));
        }
        let half = unpack3d(shape, 1).map(|len| (len as isize - 1) / 2);
        Ok(Roi {
            shape: shape.to_vec(),
            half,
        })
    }

    /// validate `shape` and check that it has as many axes as `image`
    pub(crate) fn for_image<T: Copy>(shape: &[usize], image: &Grid<T>) -> Result<Self, Error> {
        let roi = Roi::new(shape)?;
        if roi.shape.len() != image.ndim() {
            return Err(Error::shape_mismatch("roi", image.shape(), shape));
        }
        Ok(roi)
    }

    pub(crate) fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// half-width along each (promoted) axis
    pub(crate) fn half_usize(&self) -> [usize; 3] {
        self.half.map(|h| h as usize)
    }

    /// the flat index in a ROI-shaped buffer of the displacement `d`
    #[inline]
    pub(crate) fn slot(&self, d: [isize; 3]) -> usize {
        let [hh, hi, hj] = self.half;
        let (ni, nj) = (2 * hi + 1, 2 * hj + 1);
        (((d[0] + hh) * ni + (d[1] + hi)) * nj + (d[2] + hj)) as usize
    }

    pub(crate) fn n_slots(&self) -> usize {
        self.shape.iter().product()
    }

    /// every displacement inside the window, in the order of [`Self::slot`]
    pub(crate) fn displacements(&self) -> impl Iterator<Item = [isize; 3]> {
        let half = self.half;
        let hi = half.map(|h| (2 * h + 1) as usize);
        box_indices([0; 3], hi).map(move |idx| {
            [
                idx[0] as isize - half[0],
                idx[1] as isize - half[1],
                idx[2] as isize - half[2],
            ]
        })
    }

    /// wraps a flat ROI-shaped buffer as an array
    pub(crate) fn to_array(&self, buf: Vec<f64>) -> ArrayD<f64> {
        let n = unpack3d(&self.shape, 1);
        ArrayD::from_shape_fn(IxDyn(&self.shape), |idx| {
            let [h, i, j] = unpack3d(idx.slice(), 0);
            buf[(h * n[1] + i) * n[2] + j]
        })
    }
}

/// The range of source voxels that a windowed statistic visits.
///
/// Non-periodic images skip a margin (the ROI half-width) along each axis,
/// so that every window stays inside the image.
pub(crate) fn source_bounds(spec: &View3DSpec, margin: [usize; 3]) -> ([usize; 3], [usize; 3]) {
    let shape = spec.shape_usize();
    let lo = margin;
    let mut hi = [0; 3];
    for axis in 0..3 {
        hi[axis] = shape[axis].saturating_sub(margin[axis]).max(lo[axis]);
    }
    (lo, hi)
}

/// Allocate a new array where each axis is extended by `margins[axis]` on
/// both sides.
///
/// The new array is filled with `fill`, and `image` is copied into the
/// central sub-block. Every axis of `image` must have an odd length.
pub fn pad<T: Clone>(image: ArrayViewD<T>, margins: &[usize], fill: T) -> Result<ArrayD<T>, Error> {
    let ndim = image.ndim();
    if ndim == 0 || ndim > 3 {
        return Err(Error::invalid_dimension("image", ndim));
    } else if margins.len() != ndim {
        return Err(Error::length_mismatch("margins", ndim, margins.len()));
    }
    midpoint(image.shape()).map_err(|err| match err {
        InternalError::Domain { axis, .. } => Error::domain_violation("image", axis),
        other => Error::from(other),
    })?;

    let padded_shape: Vec<usize> = image
        .shape()
        .iter()
        .zip(margins)
        .map(|(len, m)| len + 2 * m)
        .collect();
    let mut out = ArrayD::from_elem(IxDyn(&padded_shape), fill);
    out.slice_each_axis_mut(|ax| {
        let m = margins[ax.axis.index()];
        Slice::from(m..(ax.len - m))
    })
    .assign(&image);
    Ok(out)
}

/// Computes the mean of the voxels that aren't masked.
///
/// Returns the mean and the number of voxels that contributed. A voxel is
/// excluded when the corresponding `mask` entry is nonzero. When every voxel
/// is masked, the mean is NaN.
pub fn mean<T: Voxel>(image: ArrayViewD<T>, mask: Option<ArrayViewD<i32>>) -> Result<(f64, usize), Error> {
    let mut total = 0.0;
    let mut count = 0_usize;
    match mask {
        Some(mask) => {
            if mask.shape() != image.shape() {
                return Err(Error::shape_mismatch("mask", image.shape(), mask.shape()));
            }
            for (v, m) in image.iter().zip(mask.iter()) {
                if *m == 0 {
                    total += v.value();
                    count += 1;
                }
            }
        }
        None => {
            for v in image.iter() {
                total += v.value();
            }
            count = image.len();
        }
    }
    Ok((total / count as f64, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, ArrayD, IxDyn, array};

    #[test]
    fn empty_axis_names_argument() {
        let empty = ArrayD::<i32>::zeros(IxDyn(&[3, 0]));
        let err = Grid::from_view("mask", &empty.view()).unwrap_err();
        assert_eq!(err.kind_name(), "EmptyAxis");
        assert_eq!(err.to_string(), "mask must not have a zero-length axis");
    }

    #[test]
    fn compare_table() {
        assert_eq!(3_i32.compare(3_i32), 1.0);
        assert_eq!(3_i32.compare(2_i32), 0.0);
        assert_eq!(0_i32.compare(0_i32), 1.0);
        assert_eq!(1_i32.compare(2.5_f64), 2.5);
        assert_eq!(0_i32.compare(2.5_f64), 0.0);
        assert_eq!(2.5_f64.compare(1_i32), 2.5);
        assert_eq!(2.5_f64.compare(0_i32), 0.0);
        assert_eq!(2.0_f64.compare(1.5_f64), 3.0);
    }

    #[test]
    fn grid_round_trip_layout() {
        // a transposed view isn't stored in row-major order
        let arr = Array2::from_shape_fn((3, 2), |(i, j)| (10 * i + j) as i32);
        let t = arr.t();
        let grid = Grid::from_view("image", &t.into_dyn()).unwrap();
        assert_eq!(grid.spec().shape(), &[2, 3, 1]);
        assert_eq!(grid.get([1, 2, 0]), 21);
        assert_eq!(grid.get_wrapped([-1, 3, 0], true), Some(1));
        assert_eq!(grid.get_wrapped([-1, 3, 0], false), None);
        assert_eq!(grid.into_array(), t.to_owned().into_dyn());
    }

    #[test]
    fn roi_slots() {
        let roi = Roi::new(&[3, 5]).unwrap();
        assert_eq!(roi.half_usize(), [1, 2, 0]);
        assert_eq!(roi.slot([-1, -2, 0]), 0);
        assert_eq!(roi.slot([0, 0, 0]), 7);
        assert_eq!(roi.slot([1, 2, 0]), 14);
        let slots: Vec<usize> = roi.displacements().map(|d| roi.slot(d)).collect();
        assert_eq!(slots, (0..15).collect::<Vec<_>>());
        assert_eq!(Roi::new(&[3, 4]).unwrap_err().kind_name(), "InvalidParity");
        assert_eq!(Roi::new(&[]).unwrap_err().kind_name(), "InvalidDimension");
    }

    #[test]
    fn pad_interior_and_border() {
        let src = ArrayD::<i32>::zeros(IxDyn(&[3, 5]));
        let out = pad(src.view(), &[2, 1], 7).unwrap();
        assert_eq!(out.shape(), &[7, 7]);
        for ((h, i), v) in out.clone().into_dimensionality::<ndarray::Ix2>().unwrap().indexed_iter() {
            let inside = (2..5).contains(&h) && (1..6).contains(&i);
            assert_eq!(*v, if inside { 0 } else { 7 });
        }
    }

    #[test]
    fn pad_rejects_even() {
        let src = ArrayD::<f64>::zeros(IxDyn(&[3, 4]));
        let err = pad(src.view(), &[1, 1], 0.0).unwrap_err();
        assert_eq!(err.kind_name(), "DomainViolation");
        let src = ArrayD::<f64>::zeros(IxDyn(&[3, 3]));
        let err = pad(src.view(), &[1], 0.0).unwrap_err();
        assert_eq!(err.kind_name(), "LengthMismatch");
    }

    #[test]
    fn masked_mean() {
        let image = array![[1.0, 2.0], [3.0, 6.0]].into_dyn();
        let mask = array![[0, 1], [0, 0]].into_dyn();
        let (m, n) = mean(image.view(), Some(mask.view())).unwrap();
        assert_eq!(n, 3);
        assert_eq!(m, 10.0 / 3.0);
        let (m, n) = mean(image.view(), None).unwrap();
        assert_eq!((m, n), (3.0, 4));
    }
}
