//! Enumerates the end-points of the rays used by path-based statistics.
//!
//! Tracing a voxel path from the center of a region of interest (ROI) to
//! each point on the ROI's outer surface visits every voxel of the ROI.

use crate::error::InternalError;
use crate::misc::unpack3d;
use alloc::vec::Vec;

fn check_roi(roi: &[usize]) -> Result<(), InternalError> {
    if roi.is_empty() || roi.len() > 3 {
        return Err(InternalError::Dimension {
            what: "roi",
            actual: roi.len(),
        });
    }
    if let Some(axis) = roi.iter().position(|len| len % 2 == 0) {
        return Err(InternalError::Parity {
            what: "roi",
            axis,
            actual: roi[axis],
        });
    }
    Ok(())
}

/// The number of points returned by [`stamp_points`] for a valid `roi`
pub fn n_stamp_points(roi: &[usize]) -> Result<usize, InternalError> {
    check_roi(roi)?;
    let [h, i, j] = unpack3d(roi, 1);
    let ring = 2 * h + 2 * i.saturating_sub(2);
    Ok(match roi.len() {
        1 => 2,
        2 => ring,
        _ => j.saturating_sub(2) * ring + 2 * h * i,
    })
}

/// Returns the offsets (relative to the ROI center) of the voxels on the
/// surface of the ROI.
///
/// Every entry is a 3D offset; components beyond `roi.len()` are 0. Every
/// axis of `roi` must be odd.
///
/// In 2D, the points are ordered as pairs on the low/high faces of axis 1
/// (sweeping axis 0), followed by pairs on the low/high faces of axis 0
/// (sweeping the interior of axis 1). In 3D, that ring is repeated for each
/// interior slice along axis 2, followed by the 2 end-caps.
pub fn stamp_points(roi: &[usize]) -> Result<Vec<[isize; 3]>, InternalError> {
    let n = n_stamp_points(roi)?;
    let [h, i, j] = unpack3d(roi, 1).map(|len| len as isize);
    let [dh, di, dj] = [(h - 1) / 2, (i - 1) / 2, (j - 1) / 2];

    let mut out = Vec::with_capacity(n);
    if roi.len() == 1 {
        out.push([-dh, 0, 0]);
        out.push([dh, 0, 0]);
        return Ok(out);
    }

    // the ring around a slice, at offset `z` along axis 2
    let push_ring = |out: &mut Vec<[isize; 3]>, z: isize| {
        for ih in 0..h {
            out.push([ih - dh, -di, z]);
            out.push([ih - dh, di, z]);
        }
        for ii in 1..(i - 1) {
            out.push([-dh, ii - di, z]);
            out.push([dh, ii - di, z]);
        }
    };

    if roi.len() == 2 {
        push_ring(&mut out, 0);
        return Ok(out);
    }

    for ij in 1..(j - 1) {
        push_ring(&mut out, ij - dj);
    }
    for ih in 0..h {
        for ii in 0..i {
            out.push([ih - dh, ii - di, -dj]);
            out.push([ih - dh, ii - di, dj]);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_surface(p: &[isize; 3], half: &[isize; 3]) -> bool {
        (0..3).any(|axis| p[axis].abs() == half[axis])
    }

    #[test]
    fn stamp_counts() {
        assert_eq!(stamp_points(&[5]).unwrap(), [[-2, 0, 0], [2, 0, 0]]);
        assert_eq!(stamp_points(&[5, 5]).unwrap().len(), 16);
        assert_eq!(stamp_points(&[3, 7]).unwrap().len(), 2 * 3 + 2 * 5);
        assert_eq!(
            stamp_points(&[5, 3, 7]).unwrap().len(),
            5 * (2 * 5 + 2) + 2 * 5 * 3
        );
        for roi in [&[9][..], &[3, 11], &[7, 5, 3], &[3, 3, 3]] {
            assert_eq!(
                stamp_points(roi).unwrap().len(),
                n_stamp_points(roi).unwrap()
            );
        }
    }

    #[test]
    fn stamp_on_boundary() {
        for roi in [&[7, 5][..], &[5, 3, 7]] {
            let [h, i, j] = unpack3d(roi, 1).map(|len| (len as isize - 1) / 2);
            let half = if roi.len() == 2 { [h, i, -1] } else { [h, i, j] };
            for p in stamp_points(roi).unwrap() {
                assert!(on_surface(&p, &half), "{p:?} is inside {roi:?}");
            }
        }
    }

    #[test]
    fn stamp_2d_unique() {
        let points = stamp_points(&[5, 5]).unwrap();
        for (k, p) in points.iter().enumerate() {
            assert!(!points[k + 1..].contains(p), "{p:?} is repeated");
        }
    }

    #[test]
    fn stamp_errors() {
        assert_eq!(
            stamp_points(&[5, 4]),
            Err(InternalError::Parity {
                what: "roi",
                axis: 1,
                actual: 4
            })
        );
        assert!(stamp_points(&[]).is_err());
        assert!(stamp_points(&[3, 3, 3, 3]).is_err());
    }
}
