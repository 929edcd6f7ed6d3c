use crate::sampler::EaseSampler;

/// Full-scale point value in tenths of a percent (100.0 -> 1000).
pub const Y10_MAX: u32 = 1000;

/// Computes per-point vertical values from global progress.
///
/// Values are kept in integer tenths (0..=1000) so that snapping and string
/// formatting are exact; the snap step collapses near-identical frames into
/// the same rendered string, which is what keeps attribute writes rare.
#[derive(Clone, Debug)]
pub struct PointEvaluator {
    duration: f64,
    snap_step10: u32,
    sampler: EaseSampler,
}

impl PointEvaluator {
    pub fn new(duration: f64, snap_step10: u32, sampler: EaseSampler) -> Self {
        Self {
            duration,
            snap_step10: snap_step10.max(1),
            sampler,
        }
    }

    pub fn sampler_mut(&mut self) -> &mut EaseSampler {
        &mut self.sampler
    }

    /// Point value at `progress` of a timeline lasting `total_secs`, for a
    /// point whose eased travel starts `point_delay + path_delay` seconds in.
    pub fn eval_y10(
        &self,
        progress: f64,
        total_secs: f64,
        point_delay: f64,
        path_delay: f64,
    ) -> u32 {
        let t_abs = progress * total_secs - (point_delay + path_delay);

        if t_abs <= 0.0 {
            return Y10_MAX;
        }
        if t_abs >= self.duration {
            return 0;
        }

        let k = t_abs / self.duration;
        let raw10 = (f64::from(Y10_MAX) * self.sampler.sample(k)).round();

        let step = f64::from(self.snap_step10);
        ((raw10 / step).round() * step) as u32
    }
}
