use crate::ease::Ease;

/// Samples the *remaining* fraction `1 - ease(k)` of an easing curve.
///
/// Points travel from 100 toward 0 as the ease output grows, so the engine
/// always wants the complement. In LUT mode the complement is precomputed at
/// `samples + 1` evenly spaced knots and linearly interpolated, which trades
/// a little accuracy for constant-cost sampling on constrained devices.
#[derive(Clone, Debug)]
pub struct EaseSampler {
    ease: Ease,
    lut: Option<Vec<f32>>,
    samples: usize,
}

impl EaseSampler {
    pub fn direct(ease: Ease) -> Self {
        Self {
            ease,
            lut: None,
            samples: 0,
        }
    }

    pub fn with_lut(ease: Ease, samples: usize) -> Self {
        let mut sampler = Self {
            ease,
            lut: Some(Vec::new()),
            samples: samples.max(8),
        };
        sampler.rebuild();
        sampler
    }

    pub fn uses_lut(&self) -> bool {
        self.lut.is_some()
    }

    /// Recomputes the lookup table. The ease is fixed per instance so this is
    /// a correctness no-op, but rebuilding at every transition start keeps the
    /// per-transition state self-contained and is cheap.
    pub fn rebuild(&mut self) {
        let Some(lut) = self.lut.as_mut() else {
            return;
        };
        let s = self.samples;
        lut.clear();
        lut.reserve(s + 1);
        for i in 0..=s {
            let k = i as f64 / s as f64;
            lut.push((1.0 - self.ease.apply(k)) as f32);
        }
    }

    pub fn sample(&self, k: f64) -> f64 {
        match &self.lut {
            None => 1.0 - self.ease.apply(k),
            Some(lut) => {
                // Saturate rather than fail on out-of-range input.
                if k <= 0.0 {
                    return f64::from(lut[0]);
                }
                if k >= 1.0 {
                    return f64::from(lut[lut.len() - 1]);
                }
                let f = k * (lut.len() - 1) as f64;
                let i = f as usize;
                let t = f - i as f64;
                let a = f64::from(lut[i]);
                let b = f64::from(lut[(i + 1).min(lut.len() - 1)]);
                a + (b - a) * t
            }
        }
    }
}
