//! SVG `d`-string construction for the curtain shape.
//!
//! The shape is a rectangle whose right-to-left sweep boundary is a chain of
//! cubic segments threaded through `points_count` vertical values, evenly
//! spaced over x in [0,100]. Both control x-coordinates of each segment sit at
//! the segment midpoint and the control y-coordinates repeat the endpoint y
//! values, which gives a smooth vertical handoff at O(1) per segment.

use std::fmt::Write as _;

/// Builds the path string for `ys10` (point values in tenths, 0..=1000).
///
/// `opened` picks the template: opened shapes start at the origin and close
/// along the bottom edge (`V 100 H 0`), closed shapes start at the first
/// point value and close along the top edge (`V 0 H 0`).
pub fn build_path_d(ys10: &[u32], opened: bool) -> String {
    let mut d = String::with_capacity(16 + ys10.len() * 24);
    write_path_d(&mut d, ys10, opened);
    d
}

/// Like [`build_path_d`] but reuses the caller's buffer, so the per-frame
/// render loop does not reallocate.
pub fn write_path_d(out: &mut String, ys10: &[u32], opened: bool) {
    debug_assert!(ys10.len() >= 2, "curtain needs at least two control points");

    out.clear();
    if opened {
        out.push_str("M 0 0 V ");
        write_y10(out, ys10[0]);
    } else {
        out.push_str("M 0 ");
        write_y10(out, ys10[0]);
    }

    let step = 100.0 / (ys10.len() - 1) as f64;
    for j in 0..ys10.len() - 1 {
        let end = (j + 1) as f64 * step;
        let ctrl = end - step / 2.0;

        let _ = write!(out, " C {ctrl} ");
        write_y10(out, ys10[j]);
        let _ = write!(out, " {ctrl} ");
        write_y10(out, ys10[j + 1]);
        let _ = write!(out, " {end} ");
        write_y10(out, ys10[j + 1]);
    }

    out.push_str(if opened { " V 100 H 0" } else { " V 0 H 0" });
}

/// Point values print with at most one decimal digit, trailing `.0` dropped.
fn write_y10(out: &mut String, y10: u32) {
    if y10 % 10 == 0 {
        let _ = write!(out, "{}", y10 / 10);
    } else {
        let _ = write!(out, "{}.{}", y10 / 10, y10 % 10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_template_at_half_travel() {
        assert_eq!(
            build_path_d(&[500, 500, 500], false),
            "M 0 50 C 25 50 25 50 50 50 C 75 50 75 50 100 50 V 0 H 0"
        );
    }

    #[test]
    fn opened_template_at_rest() {
        assert_eq!(
            build_path_d(&[0, 0, 0], true),
            "M 0 0 V 0 C 25 0 25 0 50 0 C 75 0 75 0 100 0 V 100 H 0"
        );
    }

    #[test]
    fn closed_template_fully_covering() {
        assert_eq!(
            build_path_d(&[1000, 1000], false),
            "M 0 100 C 50 100 50 100 100 100 V 0 H 0"
        );
    }

    #[test]
    fn two_points_degenerate_to_one_segment() {
        let d = build_path_d(&[375, 620], true);
        assert_eq!(d, "M 0 0 V 37.5 C 50 37.5 50 62 100 62 V 100 H 0");
    }

    #[test]
    fn tenths_formatting_drops_trailing_zero() {
        let mut s = String::new();
        write_y10(&mut s, 370);
        assert_eq!(s, "37");
        s.clear();
        write_y10(&mut s, 375);
        assert_eq!(s, "37.5");
        s.clear();
        write_y10(&mut s, 0);
        assert_eq!(s, "0");
        s.clear();
        write_y10(&mut s, 1000);
        assert_eq!(s, "100");
    }

    #[test]
    fn write_reuses_buffer() {
        let mut buf = String::new();
        write_path_d(&mut buf, &[1000, 0], false);
        let first = buf.clone();
        write_path_d(&mut buf, &[1000, 0], false);
        assert_eq!(buf, first);
    }

    #[test]
    fn output_parses_as_svg_path() {
        for (ys, opened) in [
            (vec![1000, 740, 333, 0], true),
            (vec![500, 500, 500], false),
            (vec![0, 1000], false),
        ] {
            let d = build_path_d(&ys, opened);
            let path = kurbo::BezPath::from_svg(&d).expect("grammar must be valid SVG path data");
            assert!(path.elements().len() >= ys.len());
        }
    }

    #[test]
    fn every_segment_starts_with_an_explicit_curve_command() {
        // One C command per segment pair, never the implicit-continuation
        // shorthand of a single C followed by bare coordinate triples.
        for n in 2..=6 {
            let ys = vec![500; n];
            let d = build_path_d(&ys, false);
            assert_eq!(d.matches(" C ").count(), n - 1, "d={d}");
        }
    }

    #[test]
    fn mixed_values_thread_through_segments() {
        let d = build_path_d(&[1000, 500, 0], false);
        assert_eq!(d, "M 0 100 C 25 100 25 50 50 50 C 75 50 75 0 100 0 V 0 H 0");
    }
}
