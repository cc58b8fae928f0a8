//! Tracing the sequence of voxels that make up a line between 2 lattice
//! points.
//!
//! Three flavors are supported (see [`PathMode`]). Every flavor starts the
//! path at the first point and ends it at the second point.
//!
//! Internally, every point is promoted to 3D (absent axes hold 0), which
//! lets a single implementation serve 1D, 2D and 3D inputs.

use crate::error::InternalError;
use crate::misc::unpack3d;
use alloc::vec::Vec;
use core::str::FromStr;
use ndarray::Array2;

/// The algorithm used to pick the voxels along a line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PathMode {
    /// Classic integer line rasterization. A single voxel is chosen for every
    /// step along the dominant axis.
    #[default]
    Bresenham,
    /// The voxels that the exact geometric line passes through. When the line
    /// crosses 2 (or 3) voxel faces at once, the path moves diagonally.
    Actual,
    /// Like [`PathMode::Actual`], but every face-crossing is recorded
    /// separately. Consecutive voxels always differ along a single axis.
    Full,
}

impl PathMode {
    /// the names recognized by [`PathMode::from_str`]
    pub const NAMES: &'static [&'static str] = &["bresenham", "actual", "full"];

    pub fn name(&self) -> &'static str {
        match self {
            PathMode::Bresenham => "bresenham",
            PathMode::Actual => "actual",
            PathMode::Full => "full",
        }
    }
}

impl FromStr for PathMode {
    type Err = InternalError;

    /// parse a mode name (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("bresenham") {
            Ok(PathMode::Bresenham)
        } else if s.eq_ignore_ascii_case("actual") {
            Ok(PathMode::Actual)
        } else if s.eq_ignore_ascii_case("full") {
            Ok(PathMode::Full)
        } else {
            Err(InternalError::UnknownMode)
        }
    }
}

impl core::fmt::Display for PathMode {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered sequence of voxels. The first voxel is the start point.
///
/// Every voxel is stored as a 3D index; components for axes beyond
/// [`Self::ndim`] are always 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelPath {
    ndim: usize,
    voxels: Vec<[isize; 3]>,
}

impl VoxelPath {
    /// number of axes of the points used to construct the path
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn voxels(&self) -> &[[isize; 3]] {
        &self.voxels
    }

    pub fn iter(&self) -> core::slice::Iter<'_, [isize; 3]> {
        self.voxels.iter()
    }

    /// Copies the path into an array with shape `(self.len(), self.ndim())`
    pub fn to_array(&self) -> Array2<isize> {
        Array2::from_shape_fn((self.voxels.len(), self.ndim), |(i, axis)| {
            self.voxels[i][axis]
        })
    }
}

/// Computes the voxels that lie on the line from `xa` to `xb`.
///
/// `xa` and `xb` must have the same number of components, and that number
/// must be 1, 2, or 3.
pub fn voxel_path(xa: &[isize], xb: &[isize], mode: PathMode) -> Result<VoxelPath, InternalError> {
    if xa.len() != xb.len() {
        return Err(InternalError::Length {
            what: "the end-point of a path",
            expected: xa.len(),
            actual: xb.len(),
        });
    } else if xa.is_empty() || xa.len() > 3 {
        return Err(InternalError::Dimension {
            what: "the start-point of a path",
            actual: xa.len(),
        });
    }

    let a = unpack3d(xa, 0);
    let b = unpack3d(xb, 0);
    let voxels = match mode {
        PathMode::Bresenham => bresenham(a, b),
        PathMode::Actual => face_crossings(a, b, false),
        PathMode::Full => face_crossings(a, b, true),
    };
    Ok(VoxelPath {
        ndim: xa.len(),
        voxels,
    })
}

/// The 3D generalization of Bresenham's line algorithm.
///
/// The axis with the largest absolute displacement is "dominant". We step
/// along it by 1 voxel per iteration, and track a (doubled) error term for
/// each of the 2 other axes.
fn bresenham(a: [isize; 3], b: [isize; 3]) -> Vec<[isize; 3]> {
    let mut twice_abs = [0_isize; 3];
    let mut sign = [0_isize; 3];
    for axis in 0..3 {
        twice_abs[axis] = 2 * (b[axis] - a[axis]).abs();
        sign[axis] = (b[axis] - a[axis]).signum();
    }

    // ties go to the lowest axis
    let mut dominant = 0;
    for axis in 1..3 {
        if twice_abs[axis] > twice_abs[dominant] {
            dominant = axis;
        }
    }
    let others = match dominant {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    };

    let mut err = [0_isize; 3];
    for &axis in &others {
        err[axis] = twice_abs[axis] - twice_abs[dominant] / 2;
    }

    let n_steps = (b[dominant] - a[dominant]).unsigned_abs();
    let mut out = Vec::with_capacity(n_steps + 1);
    let mut x = a;
    loop {
        out.push(x);
        if x[dominant] == b[dominant] {
            return out;
        }
        for &axis in &others {
            if err[axis] >= 0 {
                x[axis] += sign[axis];
                err[axis] -= twice_abs[dominant];
            }
        }
        x[dominant] += sign[dominant];
        for &axis in &others {
            err[axis] += twice_abs[axis];
        }
    }
}

/// Walks the exact line from `a` to `b`, one voxel-face crossing at a time.
///
/// Along the line `x(t) = a + t*(b-a)` with `t` in `[0,1]`, the `k`th
/// (0-based) face crossing along an axis with displacement `v` occurs at
/// `t = (2k+1)/(2|v|)`. We always move to the nearest crossing. Comparing
/// two of these parameters reduces to comparing integer cross-products, so
/// ties (the line passing through an edge or a corner) are detected exactly.
///
/// When `record_each_crossing` is `true`, each axis crossing gets its own
/// entry even when several axes are crossed at the same `t`.
fn face_crossings(a: [isize; 3], b: [isize; 3], record_each_crossing: bool) -> Vec<[isize; 3]> {
    let mut abs_v = [0_isize; 3];
    let mut sign = [0_isize; 3];
    for axis in 0..3 {
        abs_v[axis] = (b[axis] - a[axis]).abs();
        sign[axis] = (b[axis] - a[axis]).signum();
    }
    // number of crossings made along each axis so far
    let mut n_crossed = [0_isize; 3];

    let mut out = Vec::with_capacity((abs_v[0] + abs_v[1] + abs_v[2]) as usize + 1);
    let mut cur = a;
    out.push(cur);

    // the next crossing along axis i precedes the one along axis j when
    //    (2k_i+1)*|v_j| < (2k_j+1)*|v_i|
    let numer = |n: isize| 2 * n + 1;

    while cur != b {
        // find the axis (among those with remaining crossings) whose next
        // crossing is nearest
        let mut nearest: Option<usize> = None;
        for axis in 0..3 {
            if n_crossed[axis] == abs_v[axis] {
                continue;
            }
            nearest = match nearest {
                Some(best)
                    if numer(n_crossed[best]) * abs_v[axis]
                        <= numer(n_crossed[axis]) * abs_v[best] =>
                {
                    Some(best)
                }
                _ => Some(axis),
            };
        }
        let Some(best) = nearest else {
            // cur != b implies a remaining crossing
            break;
        };

        let best_numer = numer(n_crossed[best]);
        let best_abs_v = abs_v[best];
        for axis in 0..3 {
            let ties = n_crossed[axis] < abs_v[axis]
                && numer(n_crossed[axis]) * best_abs_v == best_numer * abs_v[axis];
            if ties {
                cur[axis] += sign[axis];
                n_crossed[axis] += 1;
                if record_each_crossing {
                    out.push(cur);
                }
            }
        }
        if !record_each_crossing {
            out.push(cur);
        }
    }
    out
}
