//! Accumulating a statistic over an ensemble of images.
//!
//! An [`Ensemble`] keeps running sums of the numerator and normalization of
//! a single kind of statistic. The kind is locked by the first contribution.
//! Every method validates its inputs before touching the running sums, so a
//! failed call leaves the ensemble unchanged.
//!
//! The ensemble does no locking of its own. Callers that share one across
//! threads must serialize the mutating calls.

use crate::correlation::{self, Correlation, WindowOptions, normalized};
use crate::error::parse_mode;
use crate::image::{CompareWith, Roi, Voxel};
use crate::{Error, path_stats};
use microstat_nostd_internal::PathMode;
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use tracing::debug;

/// The statistics that an [`Ensemble`] can accumulate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatKind {
    S2,
    W2,
    W2c,
    LinealPath,
}

impl StatKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatKind::S2 => "S2",
            StatKind::W2 => "W2",
            StatKind::W2c => "W2c",
            StatKind::LinealPath => "L",
        }
    }
}

impl core::fmt::Display for StatKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configures an [`Ensemble`].
///
/// ```
/// use microstat::EnsembleBuilder;
/// let ensemble = EnsembleBuilder::new()
///     .roi(&[5, 5])
///     .periodic(false)
///     .path_mode("actual")
///     .build()
///     .unwrap();
/// assert_eq!(ensemble.numerator().shape(), &[5, 5]);
/// ```
#[derive(Clone, Debug)]
pub struct EnsembleBuilder {
    roi: Option<Vec<usize>>,
    periodic: bool,
    zero_pad: bool,
    path_mode: String,
}

impl Default for EnsembleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EnsembleBuilder {
    pub fn new() -> Self {
        EnsembleBuilder {
            roi: None,
            periodic: true,
            zero_pad: false,
            path_mode: PathMode::default().name().to_owned(),
        }
    }

    /// The shape of the window of displacements (required). Every axis must
    /// be odd.
    pub fn roi(mut self, roi: &[usize]) -> Self {
        self.roi = Some(roi.to_vec());
        self
    }

    /// whether images wrap around their boundaries (default `true`)
    pub fn periodic(mut self, periodic: bool) -> Self {
        self.periodic = periodic;
        self
    }

    /// whether the two-point statistics treat the region beyond the image
    /// boundary as masked (default `false`)
    pub fn zero_pad(mut self, zero_pad: bool) -> Self {
        self.zero_pad = zero_pad;
        self
    }

    /// the path mode used by the path-based statistics (default
    /// `"bresenham"`)
    pub fn path_mode(mut self, name: &str) -> Self {
        self.path_mode = name.to_owned();
        self
    }

    pub fn build(&self) -> Result<Ensemble, Error> {
        let Some(ref roi) = self.roi else {
            return Err(Error::missing_parameter("roi"));
        };
        let roi = Roi::new(roi)?;
        let mode = parse_mode(&self.path_mode)?;
        Ok(Ensemble {
            numerator: ArrayD::zeros(IxDyn(roi.shape())),
            normalization: ArrayD::zeros(IxDyn(roi.shape())),
            roi,
            opts: WindowOptions {
                periodic: self.periodic,
                zero_pad: self.zero_pad,
            },
            mode,
            kind: None,
        })
    }
}

/// Running sums of a statistic over many images
#[derive(Clone, Debug)]
pub struct Ensemble {
    roi: Roi,
    opts: WindowOptions,
    mode: PathMode,
    kind: Option<StatKind>,
    numerator: ArrayD<f64>,
    normalization: ArrayD<f64>,
}

impl Ensemble {
    /// the statistic that the ensemble is locked to (if any)
    pub fn kind(&self) -> Option<StatKind> {
        self.kind
    }

    pub fn roi(&self) -> &[usize] {
        self.roi.shape()
    }

    pub fn path_mode(&self) -> PathMode {
        self.mode
    }

    pub fn numerator(&self) -> &ArrayD<f64> {
        &self.numerator
    }

    pub fn normalization(&self) -> &ArrayD<f64> {
        &self.normalization
    }

    /// The running average: `numerator / max(normalization, 1)`
    pub fn result(&self) -> ArrayD<f64> {
        normalized(&self.numerator, &self.normalization)
    }

    fn check_kind(&self, kind: StatKind) -> Result<(), Error> {
        match self.kind {
            Some(locked) if locked != kind => Err(Error::statistic_kind(locked.name(), kind.name())),
            _ => Ok(()),
        }
    }

    /// Adds a precomputed contribution of the given kind
    pub fn add(&mut self, kind: StatKind, contribution: &Correlation) -> Result<(), Error> {
        self.check_kind(kind)?;
        if contribution.shape() != self.roi.shape() {
            return Err(Error::shape_mismatch(
                "contribution",
                self.roi.shape(),
                contribution.shape(),
            ));
        }
        if self.kind.is_none() {
            debug!(kind = %kind, roi = ?self.roi.shape(), "ensemble locked");
            self.kind = Some(kind);
        }
        self.numerator += contribution.numerator();
        self.normalization += contribution.normalization();
        Ok(())
    }

    /// Adds the two-point statistic of `f` & `g` (see [`crate::s2`])
    pub fn s2<T: CompareWith<T>>(
        &mut self,
        f: ArrayViewD<T>,
        g: ArrayViewD<T>,
        fmask: Option<ArrayViewD<i32>>,
        gmask: Option<ArrayViewD<i32>>,
    ) -> Result<(), Error> {
        self.check_kind(StatKind::S2)?;
        let c = correlation::s2(f, g, self.roi.shape(), fmask, gmask, self.opts)?;
        self.add(StatKind::S2, &c)
    }

    /// Adds the weighted two-point statistic (see [`crate::w2`])
    pub fn w2<T, U>(
        &mut self,
        weights: ArrayViewD<T>,
        field: ArrayViewD<U>,
        mask: Option<ArrayViewD<i32>>,
    ) -> Result<(), Error>
    where
        T: CompareWith<U>,
        U: Voxel,
    {
        self.check_kind(StatKind::W2)?;
        let c = correlation::w2(weights, field, self.roi.shape(), mask, self.opts)?;
        self.add(StatKind::W2, &c)
    }

    /// Adds the collapsed weighted two-point statistic (see [`crate::w2c`])
    pub fn w2c<T: Voxel>(
        &mut self,
        clusters: ArrayViewD<i32>,
        centers: ArrayViewD<i32>,
        field: ArrayViewD<T>,
        mask: Option<ArrayViewD<i32>>,
    ) -> Result<(), Error> {
        self.check_kind(StatKind::W2c)?;
        let c = path_stats::w2c(
            clusters,
            centers,
            field,
            self.roi.shape(),
            mask,
            self.mode,
            self.opts.periodic,
        )?;
        self.add(StatKind::W2c, &c)
    }

    /// Like [`Self::w2c`], with clusters found by labeling `weights`
    pub fn w2c_auto<T: Voxel>(
        &mut self,
        weights: ArrayViewD<i32>,
        field: ArrayViewD<T>,
        mask: Option<ArrayViewD<i32>>,
    ) -> Result<(), Error> {
        self.check_kind(StatKind::W2c)?;
        let c = path_stats::w2c_auto(
            weights,
            field,
            self.roi.shape(),
            mask,
            self.mode,
            self.opts.periodic,
        )?;
        self.add(StatKind::W2c, &c)
    }

    /// Adds the lineal path function of `image` (see [`crate::lineal_path`])
    pub fn lineal_path(&mut self, image: ArrayViewD<i32>) -> Result<(), Error> {
        self.check_kind(StatKind::LinealPath)?;
        let c = path_stats::lineal_path(image, self.roi.shape(), self.mode, self.opts.periodic)?;
        self.add(StatKind::LinealPath, &c)
    }
}
