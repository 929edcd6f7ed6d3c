use tracing::warn;

use crate::{
    dom::Dom,
    ease::Ease,
    error::{MorphError, MorphResult},
};

/// Viewport query that switches the engine to its narrow-screen defaults.
pub const MOBILE_MEDIA: &str = "(max-width: 991px)";

/// Construction options. All fields have defaults, so a JSON config only
/// needs the keys it wants to override.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MorphOptions {
    /// Selector for the root SVG container.
    pub svg_el: String,
    /// Selector, relative to the root, for the path elements to animate.
    pub path_el: String,
    /// Control points per path. Defaults to 3 on narrow viewports, 4
    /// otherwise; floored at 2.
    pub number_points: Option<u32>,
    /// Max random per-point delay, seconds.
    pub delay_points: f64,
    /// Fixed stagger between consecutive paths, seconds.
    pub delay_paths: f64,
    /// Each point's own eased travel time, seconds.
    pub duration: f64,
    /// Named ease curve; unknown names degrade to linear.
    pub ease: String,
    /// Initial state.
    pub is_opened: bool,
    /// Ceiling on points when on a narrow viewport.
    pub mobile_points_cap: u32,
    /// Snapping grid size in percentage units. Defaults to 0.2 on
    /// touch-constrained platforms, 0.1 otherwise.
    pub precision: Option<f64>,
    /// Render every Nth frame.
    pub render_stride: u32,
    /// Easing lookup table toggle. Defaults to on for touch-constrained
    /// platforms.
    pub use_lut: Option<bool>,
    /// Lookup table sample count, floored at 8.
    pub lut_samples: u32,
    /// Seed for the per-point delay randomization. Unset draws from entropy.
    pub seed: Option<u64>,
}

impl Default for MorphOptions {
    fn default() -> Self {
        Self {
            svg_el: "svg".to_string(),
            path_el: "path".to_string(),
            number_points: None,
            delay_points: 0.3,
            delay_paths: 0.25,
            duration: 1.0,
            ease: "none".to_string(),
            is_opened: false,
            mobile_points_cap: 3,
            precision: None,
            render_stride: 1,
            use_lut: None,
            lut_samples: 64,
            seed: None,
        }
    }
}

impl MorphOptions {
    pub fn from_json_str(s: &str) -> MorphResult<Self> {
        serde_json::from_str(s).map_err(|e| MorphError::serde(e.to_string()))
    }

    /// Strict front-door validation, used by hosts that load options from
    /// files. The engine itself never rejects options; it clamps instead
    /// (see [`ResolvedConfig::resolve`]). An unknown ease name passes
    /// validation because it degrades to linear rather than failing.
    pub fn validate(&self) -> MorphResult<()> {
        if self.svg_el.trim().is_empty() {
            return Err(MorphError::validation("svgEl selector must be non-empty"));
        }
        if self.path_el.trim().is_empty() {
            return Err(MorphError::validation("pathEl selector must be non-empty"));
        }
        if !self.delay_points.is_finite() || self.delay_points < 0.0 {
            return Err(MorphError::validation("delayPoints must be finite and >= 0"));
        }
        if !self.delay_paths.is_finite() || self.delay_paths < 0.0 {
            return Err(MorphError::validation("delayPaths must be finite and >= 0"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(MorphError::validation("duration must be finite and > 0"));
        }
        if let Some(p) = self.precision
            && (!p.is_finite() || p <= 0.0)
        {
            return Err(MorphError::validation("precision must be finite and > 0"));
        }
        Ok(())
    }
}

/// Options after device-dependent default resolution and clamping. Immutable
/// for the engine's lifetime.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub points_count: usize,
    pub delay_points: f64,
    pub delay_paths: f64,
    pub duration: f64,
    pub ease: Ease,
    pub is_opened: bool,
    pub snap_step10: u32,
    pub render_stride: u32,
    pub use_lut: bool,
    pub lut_samples: usize,
}

impl ResolvedConfig {
    pub fn resolve<D: Dom>(options: &MorphOptions, dom: &D) -> Self {
        let is_small = dom.media_matches(MOBILE_MEDIA);
        let constrained = dom.coarse_pointer();

        let requested = options.number_points.unwrap_or(if is_small { 3 } else { 4 });
        let clamped = requested.max(2) as usize;
        let mobile_cap = options.mobile_points_cap.max(2) as usize;
        let points_count = if is_small {
            clamped.min(mobile_cap)
        } else {
            clamped
        };
        if points_count != requested as usize {
            warn!(requested, points_count, "point count clamped");
        }

        let duration = if options.duration.is_finite() && options.duration > 0.0 {
            options.duration
        } else {
            warn!(duration = options.duration, "invalid duration, using 1s");
            1.0
        };

        let precision = match options.precision {
            Some(p) if p.is_finite() && p > 0.0 => p,
            Some(p) => {
                warn!(precision = p, "invalid precision, using device default");
                if constrained { 0.2 } else { 0.1 }
            }
            None => {
                if constrained {
                    0.2
                } else {
                    0.1
                }
            }
        };

        let ease = match Ease::parse(&options.ease) {
            Some(ease) => ease,
            None => {
                warn!(ease = %options.ease, "unknown ease name, falling back to linear");
                Ease::Linear
            }
        };

        Self {
            points_count,
            delay_points: options.delay_points.max(0.0),
            delay_paths: options.delay_paths.max(0.0),
            duration,
            ease,
            is_opened: options.is_opened,
            snap_step10: ((precision * 10.0).round() as u32).max(1),
            render_stride: options.render_stride.max(1),
            use_lut: options.use_lut.unwrap_or(constrained),
            lut_samples: (options.lut_samples as usize).max(8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDom;

    fn desktop_dom() -> HeadlessDom {
        HeadlessDom::builder().paths(1).build()
    }

    #[test]
    fn defaults_on_desktop() {
        let cfg = ResolvedConfig::resolve(&MorphOptions::default(), &desktop_dom());
        assert_eq!(cfg.points_count, 4);
        assert_eq!(cfg.snap_step10, 1);
        assert!(!cfg.use_lut);
        assert_eq!(cfg.render_stride, 1);
        assert_eq!(cfg.ease, Ease::Linear);
    }

    #[test]
    fn defaults_on_constrained_narrow_viewport() {
        let dom = HeadlessDom::builder()
            .paths(1)
            .small_viewport(true)
            .coarse_pointer(true)
            .build();
        let cfg = ResolvedConfig::resolve(&MorphOptions::default(), &dom);
        assert_eq!(cfg.points_count, 3);
        assert_eq!(cfg.snap_step10, 2);
        assert!(cfg.use_lut);
    }

    #[test]
    fn mobile_cap_limits_requested_points() {
        let dom = HeadlessDom::builder().paths(1).small_viewport(true).build();
        let options = MorphOptions {
            number_points: Some(8),
            mobile_points_cap: 4,
            ..MorphOptions::default()
        };
        assert_eq!(ResolvedConfig::resolve(&options, &dom).points_count, 4);
    }

    #[test]
    fn points_floor_is_two() {
        let options = MorphOptions {
            number_points: Some(0),
            ..MorphOptions::default()
        };
        assert_eq!(
            ResolvedConfig::resolve(&options, &desktop_dom()).points_count,
            2
        );
    }

    #[test]
    fn unknown_ease_degrades_to_linear() {
        let options = MorphOptions {
            ease: "elastic.out".to_string(),
            ..MorphOptions::default()
        };
        assert_eq!(
            ResolvedConfig::resolve(&options, &desktop_dom()).ease,
            Ease::Linear
        );
    }

    #[test]
    fn validate_rejects_bad_numbers() {
        let mut options = MorphOptions::default();
        options.duration = 0.0;
        assert!(options.validate().is_err());

        let mut options = MorphOptions::default();
        options.delay_points = -1.0;
        assert!(options.validate().is_err());

        let mut options = MorphOptions::default();
        options.svg_el = "  ".to_string();
        assert!(options.validate().is_err());

        assert!(MorphOptions::default().validate().is_ok());
    }

    #[test]
    fn json_roundtrip_with_partial_keys() {
        let options =
            MorphOptions::from_json_str(r#"{"duration": 0.8, "ease": "power2.inOut", "numberPoints": 5}"#)
                .unwrap();
        assert_eq!(options.duration, 0.8);
        assert_eq!(options.number_points, Some(5));
        assert_eq!(options.delay_points, 0.3);

        let s = serde_json::to_string(&options).unwrap();
        let back = MorphOptions::from_json_str(&s).unwrap();
        assert_eq!(back.ease, "power2.inOut");
    }

    #[test]
    fn from_json_str_reports_serde_errors() {
        assert!(matches!(
            MorphOptions::from_json_str("{not json"),
            Err(MorphError::Serde(_))
        ));
    }
}
