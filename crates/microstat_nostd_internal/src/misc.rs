use crate::error::InternalError;
use alloc::vec::Vec;

/// Returns the index of the central element along each axis of an
/// odd-shaped array
///
/// Fails if any axis has an even length (there is no well-defined center)
pub fn midpoint(shape: &[usize]) -> Result<Vec<usize>, InternalError> {
    if let Some(axis) = shape.iter().position(|len| len % 2 == 0) {
        return Err(InternalError::Domain {
            what: "shape",
            axis,
        });
    }
    Ok(shape.iter().map(|len| (len - 1) / 2).collect())
}

/// Pads a shape-like slice, holding up to 3 entries, to exactly 3 entries.
///
/// Missing trailing entries are set to `fill`. In practice, `fill` is `1`
/// when unpacking a shape and `0` when unpacking an offset or a midpoint.
/// This lets 1D & 2D data reuse the 3D loops (the absent axes have unit
/// extent or zero offset). Entries past the third are ignored.
pub fn unpack3d<T: Copy>(vals: &[T], fill: T) -> [T; 3] {
    let mut out = [fill; 3];
    for (dst, src) in out.iter_mut().zip(vals.iter()) {
        *dst = *src;
    }
    out
}

/// Check if a 3D array shape (for a View3DSpec) is valid
fn check_shape(shape_zyx: &[usize; 3]) -> Result<(), InternalError> {
    if shape_zyx.contains(&0) {
        Err(InternalError::EmptyAxis { what: "shape_zyx" })
    } else {
        Ok(())
    }
}

/// View3DSpec specifies how a "3D" array is laid out in memory. It is always
/// contiguous, and the fast axis is axis 2.
///
/// For concreteness, an array with shape `[a, b, c]`, has `a` elements along
/// axis 0 and `c` elements along axis 2. 1D and 2D arrays are promoted by
/// appending axes of length 1 (the data doesn't move).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View3DSpec {
    // these are signed ints because we do a lot of math with negative offsets
    // and want to avoid excessive casts
    shape_zyx: [isize; 3],
    strides_zyx: [isize; 3],
}

impl View3DSpec {
    /// Create a contiguous-in-memory View3DSpec from shape_zyx alone
    pub fn from_shape_contiguous(shape_zyx: [usize; 3]) -> Result<View3DSpec, InternalError> {
        check_shape(&shape_zyx)?;
        Ok(Self {
            shape_zyx: [
                shape_zyx[0] as isize,
                shape_zyx[1] as isize,
                shape_zyx[2] as isize,
            ],
            strides_zyx: [
                (shape_zyx[1] * shape_zyx[2]) as isize,
                shape_zyx[2] as isize,
                1_isize,
            ],
        })
    }

    /// Create a View3DSpec for an array with 1, 2 or 3 axes
    pub fn promote(shape: &[usize]) -> Result<View3DSpec, InternalError> {
        if shape.is_empty() || shape.len() > 3 {
            return Err(InternalError::Dimension {
                what: "shape",
                actual: shape.len(),
            });
        }
        Self::from_shape_contiguous(unpack3d(shape, 1))
    }

    pub fn shape(&self) -> &[isize; 3] {
        &self.shape_zyx
    }

    /// the shape as unsigned integers
    pub fn shape_usize(&self) -> [usize; 3] {
        [
            self.shape_zyx[0] as usize,
            self.shape_zyx[1] as usize,
            self.shape_zyx[2] as usize,
        ]
    }

    /// the total number of elements
    pub fn n_elements(&self) -> usize {
        (self.shape_zyx[0] * self.strides_zyx[0]) as usize
    }

    /// map a 3D index to 1D
    #[inline]
    pub fn map_idx(&self, iz: isize, iy: isize, ix: isize) -> isize {
        iz * self.strides_zyx[0] + iy * self.strides_zyx[1] + ix
    }

    /// Maps a (possibly out-of-bounds) 3D index onto the array.
    ///
    /// When `periodic` is `true`, each component is wrapped with modulo
    /// arithmetic. Otherwise, `None` is returned for out-of-bounds indices.
    #[inline]
    pub fn wrap(&self, idx: [isize; 3], periodic: bool) -> Option<[usize; 3]> {
        let mut out = [0_usize; 3];
        for axis in 0..3 {
            let len = self.shape_zyx[axis];
            let i = idx[axis];
            out[axis] = if periodic {
                i.rem_euclid(len) as usize
            } else if (0..len).contains(&i) {
                i as usize
            } else {
                return None;
            };
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn midpoint_odd_and_even() {
        assert_eq!(midpoint(&[5, 3, 1]).unwrap(), [2, 1, 0]);
        assert_eq!(midpoint(&[7]).unwrap(), [3]);
        assert_eq!(
            midpoint(&[5, 4]),
            Err(InternalError::Domain {
                what: "shape",
                axis: 1
            })
        );
    }

    #[test]
    fn unpack3d_fill() {
        assert_eq!(unpack3d(&[4_usize], 1), [4, 1, 1]);
        assert_eq!(unpack3d(&[4_isize, -2], 0), [4, -2, 0]);
        assert_eq!(unpack3d(&[1_usize, 2, 3], 9), [1, 2, 3]);
    }

    #[test]
    fn idx_spec_contig() {
        let idx_spec = View3DSpec::from_shape_contiguous([2, 3, 4]).unwrap();
        assert_eq!(idx_spec.map_idx(0, 0, 0), 0);
        assert_eq!(idx_spec.map_idx(0, 0, 3), 3);
        assert_eq!(idx_spec.map_idx(0, 1, 0), 4);
        assert_eq!(idx_spec.map_idx(1, 1, 0), 16);
        assert_eq!(idx_spec.n_elements(), 24);
    }

    #[test]
    fn idx_spec_promote() {
        let idx_spec = View3DSpec::promote(&[5, 2]).unwrap();
        assert_eq!(idx_spec.shape(), &[5, 2, 1]);
        assert!(View3DSpec::promote(&[]).is_err());
        assert!(View3DSpec::promote(&[1, 2, 3, 4]).is_err());
        assert!(View3DSpec::promote(&[2, 0]).is_err());
    }

    #[test]
    fn wrap_periodic_and_clamped() {
        let idx_spec = View3DSpec::from_shape_contiguous([4, 3, 1]).unwrap();
        assert_eq!(idx_spec.wrap([-1, 3, 0], true), Some([3, 0, 0]));
        assert_eq!(idx_spec.wrap([5, -4, 2], true), Some([1, 2, 0]));
        assert_eq!(idx_spec.wrap([-1, 0, 0], false), None);
        assert_eq!(idx_spec.wrap([0, 3, 0], false), None);
        assert_eq!(idx_spec.wrap([3, 2, 0], false), Some([3, 2, 0]));
    }
}
