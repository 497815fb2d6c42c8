//! # Transforms
//!
//! A transform maps one flat sequence of doubles to another. It is pure and
//! free to change the length: the session derives the new nx/nz from
//! whatever comes back.
//!
//! Any `Fn(&[f64]) -> Vec<f64>` is a [`Transform`]. The built-in ones are
//! the rescaling filters the command-line tool offers, selectable through
//! [`TransformSpec`].

use std::fmt;

use serde::Deserialize;

/// A pure array-to-array mapping
pub trait Transform {
    /// Produce a new sequence from `values`
    fn apply(&self, values: &[f64]) -> Vec<f64>;

    /// Short label for logs
    fn label(&self) -> String {
        "custom".to_string()
    }
}

impl<F> Transform for F
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn apply(&self, values: &[f64]) -> Vec<f64> {
        self(values)
    }
}

/// Returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, values: &[f64]) -> Vec<f64> {
        values.to_vec()
    }

    fn label(&self) -> String {
        "identity".to_string()
    }
}

/// One-dimensional Gaussian smoothing with reflected edges
///
/// Matches `scipy.ndimage.gaussian_filter1d` in its default `reflect`
/// mode: the kernel spans `±int(truncate·sigma + 0.5)` samples and the
/// input is mirrored about its edges, edge sample included
/// (`d c b a | a b c d | d c b a`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianFilter {
    /// Standard deviation in samples; must be positive
    pub sigma: f64,
    /// Kernel half-width in standard deviations
    pub truncate: f64,
}

impl GaussianFilter {
    /// Default kernel half-width, in standard deviations
    pub const DEFAULT_TRUNCATE: f64 = 4.0;

    /// Largest kernel radius in samples; wider kernels are cut to this
    pub const MAX_RADIUS: usize = 1 << 16;

    /// Filter with the default truncation
    pub fn new(sigma: f64) -> Self {
        Self {
            sigma,
            truncate: Self::DEFAULT_TRUNCATE,
        }
    }

    /// Kernel radius `int(truncate·sigma + 0.5)`, capped at [`MAX_RADIUS`](Self::MAX_RADIUS)
    pub fn radius(&self) -> usize {
        (self.truncate * self.sigma + 0.5).min(Self::MAX_RADIUS as f64) as usize
    }

    /// Normalised kernel weights, index `radius` is the centre
    pub fn kernel(&self) -> Vec<f64> {
        let radius = self.radius();
        let denom = -0.5 / (self.sigma * self.sigma);
        let mut weights: Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (denom * x * x).exp()
            })
            .collect();
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        weights
    }
}

impl Default for GaussianFilter {
    fn default() -> Self {
        Self::new(2.0)
    }
}

/// Map any index onto `0..len` by mirroring about the edges
fn reflect_index(index: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let m = index.rem_euclid(period);
    if m >= len as isize {
        (period - 1 - m) as usize
    } else {
        m as usize
    }
}

impl Transform for GaussianFilter {
    fn apply(&self, values: &[f64]) -> Vec<f64> {
        if values.is_empty() || !(self.sigma.is_finite() && self.sigma > 0.0) {
            return values.to_vec();
        }

        let weights = self.kernel();
        let radius = (weights.len() / 2) as isize;
        let len = values.len();

        (0..len as isize)
            .map(|i| {
                weights
                    .iter()
                    .enumerate()
                    .map(|(k, w)| w * values[reflect_index(i + k as isize - radius, len)])
                    .sum()
            })
            .collect()
    }

    fn label(&self) -> String {
        format!("gaussian(sigma={})", self.sigma)
    }
}

/// First difference, one element shorter than its input
#[derive(Debug, Clone, Copy, Default)]
pub struct Diff;

impl Transform for Diff {
    fn apply(&self, values: &[f64]) -> Vec<f64> {
        values.windows(2).map(|w| w[1] - w[0]).collect()
    }

    fn label(&self) -> String {
        "diff".to_string()
    }
}

/// Keeps only the values at or below a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BelowThreshold {
    /// Inclusive upper bound
    pub threshold: f64,
}

impl Default for BelowThreshold {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl Transform for BelowThreshold {
    fn apply(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .copied()
            .filter(|v| *v <= self.threshold)
            .collect()
    }

    fn label(&self) -> String {
        format!("threshold(<= {})", self.threshold)
    }
}

/// Replaces the input with `0, 1, 2, ...` of length `ceil(len / divisor)`
///
/// The output is never longer than `len · MAX_GROWTH`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexRamp {
    /// Length reduction factor; must be positive
    pub divisor: f64,
}

impl IndexRamp {
    /// Largest factor by which the ramp may outgrow its input
    pub const MAX_GROWTH: usize = 1024;

    /// Smallest divisor that stays within [`MAX_GROWTH`](Self::MAX_GROWTH)
    pub const MIN_DIVISOR: f64 = 1.0 / Self::MAX_GROWTH as f64;

    /// Output length for an input of `len` samples
    pub fn output_len(&self, len: usize) -> usize {
        let cap = len.saturating_mul(Self::MAX_GROWTH);
        (len as f64 / self.divisor).ceil().min(cap as f64) as usize
    }
}

impl Default for IndexRamp {
    fn default() -> Self {
        Self { divisor: 5.0 }
    }
}

impl Transform for IndexRamp {
    fn apply(&self, values: &[f64]) -> Vec<f64> {
        if !(self.divisor.is_finite() && self.divisor > 0.0) {
            return Vec::new();
        }
        (0..self.output_len(values.len())).map(|i| i as f64).collect()
    }

    fn label(&self) -> String {
        format!("ramp(len/{})", self.divisor)
    }
}

/// A built-in transform chosen by name, as it appears in config files
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransformSpec {
    /// [`Identity`]
    Identity,
    /// [`GaussianFilter`]
    Gaussian {
        /// Standard deviation in samples
        #[serde(default = "default_sigma")]
        sigma: f64,
        /// Kernel half-width in standard deviations
        #[serde(default = "default_truncate")]
        truncate: f64,
    },
    /// [`Diff`]
    Diff,
    /// [`BelowThreshold`]
    Threshold {
        /// Inclusive upper bound
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    /// [`IndexRamp`]
    Ramp {
        /// Length reduction factor
        #[serde(default = "default_divisor")]
        divisor: f64,
    },
}

fn default_sigma() -> f64 {
    GaussianFilter::default().sigma
}

fn default_truncate() -> f64 {
    GaussianFilter::DEFAULT_TRUNCATE
}

fn default_threshold() -> f64 {
    BelowThreshold::default().threshold
}

fn default_divisor() -> f64 {
    IndexRamp::default().divisor
}

impl Default for TransformSpec {
    fn default() -> Self {
        TransformSpec::Gaussian {
            sigma: default_sigma(),
            truncate: default_truncate(),
        }
    }
}

impl TransformSpec {
    /// Reject parameters the transform cannot work with
    pub fn check(&self) -> Result<(), String> {
        match *self {
            TransformSpec::Gaussian { sigma, truncate } => {
                if !(sigma > 0.0 && sigma.is_finite()) {
                    return Err(format!("gaussian sigma must be positive, got {}", sigma));
                }
                if !(truncate > 0.0 && truncate.is_finite()) {
                    return Err(format!(
                        "gaussian truncate must be positive, got {}",
                        truncate
                    ));
                }
                if truncate * sigma + 0.5 > GaussianFilter::MAX_RADIUS as f64 {
                    return Err(format!(
                        "gaussian kernel radius {} exceeds {} samples",
                        truncate * sigma,
                        GaussianFilter::MAX_RADIUS
                    ));
                }
                Ok(())
            }
            TransformSpec::Threshold { threshold } if threshold.is_nan() => {
                Err("threshold must be a number".to_string())
            }
            TransformSpec::Ramp { divisor } if !(divisor > 0.0 && divisor.is_finite()) => {
                Err(format!("ramp divisor must be positive, got {}", divisor))
            }
            TransformSpec::Ramp { divisor } if divisor < IndexRamp::MIN_DIVISOR => Err(format!(
                "ramp divisor {} would grow the data more than {}-fold",
                divisor,
                IndexRamp::MAX_GROWTH
            )),
            _ => Ok(()),
        }
    }
}

impl Transform for TransformSpec {
    fn apply(&self, values: &[f64]) -> Vec<f64> {
        match *self {
            TransformSpec::Identity => Identity.apply(values),
            TransformSpec::Gaussian { sigma, truncate } => {
                GaussianFilter { sigma, truncate }.apply(values)
            }
            TransformSpec::Diff => Diff.apply(values),
            TransformSpec::Threshold { threshold } => BelowThreshold { threshold }.apply(values),
            TransformSpec::Ramp { divisor } => IndexRamp { divisor }.apply(values),
        }
    }

    fn label(&self) -> String {
        match *self {
            TransformSpec::Identity => Identity.label(),
            TransformSpec::Gaussian { sigma, truncate } => GaussianFilter { sigma, truncate }.label(),
            TransformSpec::Diff => Diff.label(),
            TransformSpec::Threshold { threshold } => BelowThreshold { threshold }.label(),
            TransformSpec::Ramp { divisor } => IndexRamp { divisor }.label(),
        }
    }
}

impl fmt::Display for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
