//! Deterministic synthetic images.

use crate::Error;
use microstat_nostd_internal::InternalError;
use ndarray::{Array2, ArrayD};

/// A 2D binary image holding filled circles.
///
/// Circle `i` is centered on `(rows[i], cols[i])` and holds every voxel
/// whose rounded-up distance from the center is less than `radii[i]`.
/// Voxels that fall outside of the image wrap around when `periodic` is
/// `true` and are dropped otherwise.
///
/// ```
/// use microstat::dummy_circles;
/// let image = dummy_circles(&[5, 5], &[2], &[2], &[2], false).unwrap();
/// assert_eq!(image.iter().sum::<i32>(), 5);
/// ```
pub fn dummy_circles(
    shape: &[usize],
    rows: &[isize],
    cols: &[isize],
    radii: &[usize],
    periodic: bool,
) -> Result<ArrayD<i32>, Error> {
    if shape.len() != 2 {
        return Err(Error::invalid_dimension("shape", shape.len()));
    }
    if cols.len() != rows.len() {
        return Err(Error::length_mismatch("cols", rows.len(), cols.len()));
    }
    if radii.len() != rows.len() {
        return Err(Error::length_mismatch("radii", rows.len(), radii.len()));
    }
    if shape.contains(&0) {
        return Err(InternalError::EmptyAxis { what: "shape" }.into());
    }

    let (ni, nj) = (shape[0] as isize, shape[1] as isize);
    let mut out = Array2::<i32>::zeros((shape[0], shape[1]));
    for ((&row, &col), &r) in rows.iter().zip(cols).zip(radii) {
        let r = r as isize;
        for di in -r..=r {
            for dj in -r..=r {
                let dist = (((di * di + dj * dj) as f64).sqrt()).ceil() as isize;
                if dist >= r {
                    continue;
                }
                let (mut i, mut j) = (row + di, col + dj);
                if periodic {
                    i = i.rem_euclid(ni);
                    j = j.rem_euclid(nj);
                } else if i < 0 || i >= ni || j < 0 || j >= nj {
                    continue;
                }
                out[[i as usize, j as usize]] = 1;
            }
        }
    }
    Ok(out.into_dyn())
}
