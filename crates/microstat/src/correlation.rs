//! Windowed two-point statistics (S2 & W2).
//!
//! Both statistics visit every qualifying source voxel `h` and every
//! displacement `d` inside the region of interest (ROI), and accumulate a
//! comparison between `f(h)` and `g(h+d)` into the slot for `d`. They only
//! differ in how they are normalized:
//! - S2 counts the source voxels (a probability or a correlation),
//! - W2 sums the weight of the source voxels (a conditional probability).

use crate::image::{CompareWith, Grid, Roi, Voxel, box_indices, source_bounds};
use crate::Error;
use ndarray::{ArrayD, ArrayViewD, Zip};
use tracing::debug;

/// The unnormalized outcome of a single statistic.
///
/// Both arrays have the shape of the ROI. The entry for displacement `d` is
/// found at index `d + (roi - 1) / 2`.
#[derive(Clone, Debug, PartialEq)]
pub struct Correlation {
    numerator: ArrayD<f64>,
    normalization: ArrayD<f64>,
}

impl Correlation {
    pub(crate) fn from_buffers(roi: &Roi, numerator: Vec<f64>, normalization: Vec<f64>) -> Self {
        Correlation {
            numerator: roi.to_array(numerator),
            normalization: roi.to_array(normalization),
        }
    }

    /// Construct from a pair of arrays sharing a shape
    pub fn new(numerator: ArrayD<f64>, normalization: ArrayD<f64>) -> Result<Self, Error> {
        if numerator.shape() != normalization.shape() {
            return Err(Error::shape_mismatch(
                "normalization",
                numerator.shape(),
                normalization.shape(),
            ));
        }
        Ok(Correlation {
            numerator,
            normalization,
        })
    }

    pub fn numerator(&self) -> &ArrayD<f64> {
        &self.numerator
    }

    pub fn normalization(&self) -> &ArrayD<f64> {
        &self.normalization
    }

    pub fn shape(&self) -> &[usize] {
        self.numerator.shape()
    }

    /// The normalized statistic, `numerator / max(normalization, 1)`
    pub fn result(&self) -> ArrayD<f64> {
        normalized(&self.numerator, &self.normalization)
    }

    pub fn into_parts(self) -> (ArrayD<f64>, ArrayD<f64>) {
        (self.numerator, self.normalization)
    }
}

pub(crate) fn normalized(numerator: &ArrayD<f64>, normalization: &ArrayD<f64>) -> ArrayD<f64> {
    Zip::from(numerator)
        .and(normalization)
        .map_collect(|num, norm| num / norm.max(1.0))
}

/// How a window that extends past the image boundary is treated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowOptions {
    /// When `true` (and `zero_pad` is `false`), windows wrap around the
    /// image boundaries. Otherwise, only source voxels whose window fits
    /// inside the image are used.
    pub periodic: bool,
    /// When `true`, every voxel is a source and window entries beyond the
    /// image boundary are skipped (as if the image were padded with masked
    /// voxels). This takes precedence over `periodic`.
    pub zero_pad: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        WindowOptions {
            periodic: true,
            zero_pad: false,
        }
    }
}

pub(crate) fn load_mask(
    what: &'static str,
    mask: Option<ArrayViewD<i32>>,
    like: &Grid<impl Copy>,
) -> Result<Option<Grid<i32>>, Error> {
    match mask {
        Some(view) => {
            let grid = Grid::from_view(what, &view)?;
            like.check_same_shape(what, &grid)?;
            Ok(Some(grid))
        }
        None => Ok(None),
    }
}

#[inline]
pub(crate) fn is_masked(mask: &Option<Grid<i32>>, idx: [usize; 3]) -> bool {
    mask.as_ref().is_some_and(|m| m.get(idx) != 0)
}

/// The accumulation shared by S2 & W2.
///
/// `norm_weight` gives the contribution of a source voxel to the
/// normalization.
fn two_point<T, U>(
    f: &Grid<T>,
    g: &Grid<U>,
    roi: &Roi,
    fmask: &Option<Grid<i32>>,
    gmask: &Option<Grid<i32>>,
    opts: WindowOptions,
    norm_weight: impl Fn(T) -> f64,
) -> Correlation
where
    T: CompareWith<U>,
    U: Voxel,
{
    let spec = f.spec();
    let margin = if opts.zero_pad || opts.periodic {
        [0; 3]
    } else {
        roi.half_usize()
    };
    let wrap_targets = opts.periodic && !opts.zero_pad;
    let (lo, hi) = source_bounds(spec, margin);

    let displacements: Vec<[isize; 3]> = roi.displacements().collect();
    let mut numerator = vec![0.0; roi.n_slots()];
    let mut normalization = vec![0.0; roi.n_slots()];

    for v in box_indices(lo, hi) {
        if is_masked(fmask, v) {
            continue;
        }
        let fv = f.get(v);
        let w = norm_weight(fv);
        let contributes = fv.is_nonzero();
        if !contributes && w == 0.0 {
            continue;
        }
        for (slot, d) in displacements.iter().enumerate() {
            let t = [
                v[0] as isize + d[0],
                v[1] as isize + d[1],
                v[2] as isize + d[2],
            ];
            let Some(t) = spec.wrap(t, wrap_targets) else {
                continue;
            };
            if is_masked(gmask, t) {
                continue;
            }
            if contributes {
                numerator[slot] += fv.compare(g.get(t));
            }
            normalization[slot] += w;
        }
    }
    Correlation::from_buffers(roi, numerator, normalization)
}

/// Two-point probability (integer images) or correlation (floating point
/// images) of `f` and `g`.
///
/// Voxels where `fmask` (or `gmask`) is nonzero are excluded as sources (or
/// targets). The normalization at each displacement counts the unmasked
/// sources whose target is also unmasked.
pub fn s2<T: CompareWith<T>>(
    f: ArrayViewD<T>,
    g: ArrayViewD<T>,
    roi: &[usize],
    fmask: Option<ArrayViewD<i32>>,
    gmask: Option<ArrayViewD<i32>>,
    opts: WindowOptions,
) -> Result<Correlation, Error> {
    let f = Grid::from_view("f", &f)?;
    let g = Grid::from_view("g", &g)?;
    f.check_same_shape("g", &g)?;
    let fmask = load_mask("fmask", fmask, &f)?;
    let gmask = load_mask("gmask", gmask, &f)?;
    let roi = Roi::for_image(roi, &f)?;
    debug!(
        shape = ?f.shape(),
        roi = ?roi.shape(),
        periodic = opts.periodic,
        zero_pad = opts.zero_pad,
        "computing S2"
    );
    Ok(two_point(&f, &g, &roi, &fmask, &gmask, opts, |_| 1.0))
}

/// Weighted two-point correlation.
///
/// Like [`s2`], but the normalization at each displacement sums the weights
/// of the sources rather than counting them. Voxels where `mask` is nonzero
/// are excluded as targets.
pub fn w2<T, U>(
    weights: ArrayViewD<T>,
    field: ArrayViewD<U>,
    roi: &[usize],
    mask: Option<ArrayViewD<i32>>,
    opts: WindowOptions,
) -> Result<Correlation, Error>
where
    T: CompareWith<U>,
    U: Voxel,
{
    let weights = Grid::from_view("weights", &weights)?;
    let field = Grid::from_view("field", &field)?;
    weights.check_same_shape("field", &field)?;
    let mask = load_mask("mask", mask, &weights)?;
    let roi = Roi::for_image(roi, &weights)?;
    debug!(
        shape = ?weights.shape(),
        roi = ?roi.shape(),
        periodic = opts.periodic,
        zero_pad = opts.zero_pad,
        "computing W2"
    );
    Ok(two_point(&weights, &field, &roi, &None, &mask, opts, |w: T| w.weight()))
}
