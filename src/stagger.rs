use rand::Rng;

/// One frame at the nominal 60 Hz tick the delays are aligned to.
const FRAME_SECS: f64 = 1.0 / 60.0;

/// Draws one randomized start delay per control point, uniform in
/// `[0, delay_points)` and quantized to the 1/60 s frame grid.
///
/// Quantization makes repeated evaluation at the same global progress land on
/// identical values within a transition; a fresh draw at the next transition
/// re-shuffles the stagger.
pub fn randomize_point_delays<R: Rng>(
    rng: &mut R,
    points_count: usize,
    delay_points: f64,
) -> Vec<f64> {
    (0..points_count)
        .map(|_| quantize_to_frame(rng.random::<f64>() * delay_points))
        .collect()
}

fn quantize_to_frame(secs: f64) -> f64 {
    (secs / FRAME_SECS).round() * FRAME_SECS
}
