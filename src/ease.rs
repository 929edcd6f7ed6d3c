/// Named easing curves for the morph timeline.
///
/// Every curve maps `[0,1] -> [0,1]` with stable endpoints. `parse` accepts
/// the common timeline-library spellings ("none", "power1.out", "cubic.inOut")
/// so configurations written against those engines keep working.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }

    /// Resolves an ease name. Returns `None` for unknown names; the caller
    /// decides how to degrade (the engine falls back to `Linear`).
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let (family, dir) = match name.split_once('.') {
            Some((f, d)) => (f, d),
            None => (name.as_str(), ""),
        };

        match family {
            "none" | "linear" => Some(Self::Linear),
            "power1" | "quad" => match dir {
                "" | "out" => Some(Self::OutQuad),
                "in" => Some(Self::InQuad),
                "inout" => Some(Self::InOutQuad),
                _ => None,
            },
            "power2" | "cubic" => match dir {
                "" | "out" => Some(Self::OutCubic),
                "in" => Some(Self::InCubic),
                "inout" => Some(Self::InOutCubic),
                _ => None,
            },
            _ => None,
        }
    }
}
