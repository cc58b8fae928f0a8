// Public entry points for the geometric primitives of the internal crate.
// These only convert the internal error type.

use crate::Error;
use microstat_nostd_internal::{PathMode, VoxelPath};

/// Computes the voxels that lie on the line from `xa` to `xb`.
///
/// The first voxel is always `xa` and the last one is always `xb`. With
/// [`PathMode::Bresenham`] every step advances the dominant axis by one.
/// With [`PathMode::Actual`] every voxel crossed by the continuous segment is
/// visited, while [`PathMode::Full`] additionally moves only one axis per
/// step so that consecutive voxels always share a face.
///
/// ```
/// use microstat::{PathMode, voxel_path};
/// let path = voxel_path(&[0, 0], &[2, 1], PathMode::Full).unwrap();
/// assert_eq!(path.voxels(), &[[0, 0, 0], [1, 0, 0], [1, 1, 0], [2, 1, 0]]);
/// ```
pub fn voxel_path(xa: &[isize], xb: &[isize], mode: PathMode) -> Result<VoxelPath, Error> {
    Ok(microstat_nostd_internal::voxel_path(xa, xb, mode)?)
}

/// The offsets of the voxels on the surface of an odd-shaped region of
/// interest, relative to its center
pub fn stamp_points(roi: &[usize]) -> Result<Vec<[isize; 3]>, Error> {
    Ok(microstat_nostd_internal::stamp_points(roi)?)
}

pub fn n_stamp_points(roi: &[usize]) -> Result<usize, Error> {
    Ok(microstat_nostd_internal::n_stamp_points(roi)?)
}

/// The index of the central element along each axis
pub fn midpoint(shape: &[usize]) -> Result<Vec<usize>, Error> {
    Ok(microstat_nostd_internal::midpoint(shape)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_converted() {
        let err = voxel_path(&[0, 0], &[1], PathMode::Actual).unwrap_err();
        assert_eq!(err.kind_name(), "LengthMismatch");
        let err = stamp_points(&[3, 4]).unwrap_err();
        assert_eq!(err.kind_name(), "InvalidParity");
        let err = n_stamp_points(&[]).unwrap_err();
        assert_eq!(err.kind_name(), "InvalidDimension");
        let err = midpoint(&[3, 2]).unwrap_err();
        assert_eq!(err.kind_name(), "DomainViolation");
        assert_eq!(midpoint(&[5, 3, 1]).unwrap(), vec![2, 1, 0]);
    }
}
