//! Raw corpus counts to one-byte weights.

use crate::error::{Error, Result};

/// Monotonic range compression applied before linear scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transform {
    #[default]
    Identity,
    /// `ln(x + 1)`.
    Log,
    Sqrt,
}

impl Transform {
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Transform::Identity => x,
            Transform::Log => x.ln_1p(),
            Transform::Sqrt => x.sqrt(),
        }
    }
}

/// Scales raw frequencies so the largest maps to `scale`.
///
/// The first raw frequency seen calibrates the quantizer, so input must
/// arrive in descending order of raw frequency. Out-of-order input is
/// rejected rather than silently mis-scaled.
///
/// ```rust
/// use wordtrie::{Quantizer, Transform};
///
/// let mut q = Quantizer::new(Transform::Identity, 255).unwrap();
/// assert_eq!(q.quantize(1, 1000).unwrap(), 255);
/// assert_eq!(q.quantize(2, 500).unwrap(), 128);
/// assert_eq!(q.quantize(3, 1).unwrap(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Quantizer {
    transform: Transform,
    scale: u8,
    factor: Option<f64>,
    previous: Option<u64>,
}

impl Quantizer {
    pub fn new(transform: Transform, scale: u8) -> Result<Self> {
        if scale == 0 {
            return Err(Error::InvalidConfig("scale must be at least 1".into()));
        }
        Ok(Self {
            transform,
            scale,
            factor: None,
            previous: None,
        })
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Multiplier fixed by the first observed frequency, if any.
    pub fn factor(&self) -> Option<f64> {
        self.factor
    }

    /// Quantizes the raw frequency of the record on `line`.
    ///
    /// Fails when `raw` exceeds the previous frequency of this pass.
    pub fn quantize(&mut self, line: usize, raw: u64) -> Result<u8> {
        if let Some(previous) = self.previous {
            if raw > previous {
                return Err(Error::UnsortedInput {
                    line,
                    previous,
                    current: raw,
                });
            }
        }
        self.previous = Some(raw);

        let transform = self.transform;
        let scale = self.scale;
        let factor = *self.factor.get_or_insert_with(|| {
            let max = transform.apply(raw as f64);
            if max > 0.0 {
                scale as f64 / max
            } else {
                0.0
            }
        });
        Ok(self.weight(factor, raw))
    }

    #[inline]
    fn weight(&self, factor: f64, raw: u64) -> u8 {
        let scaled = (self.transform.apply(raw as f64) * factor).round();
        let weight = scaled.clamp(0.0, self.scale as f64) as u8;
        if weight == 0 && raw > 0 {
            1
        } else {
            weight
        }
    }

    /// Starts a new pass: order is checked afresh, calibration is kept.
    pub fn rewind(&mut self) {
        self.previous = None;
    }
}
