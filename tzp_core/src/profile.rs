use tzp_codecs::AlgorithmId;

/// A user-facing encode policy knob. Adjusts the analyzer's per-block
/// algorithm recommendation (spec §4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Lightning,
    Fast,
    Balanced,
    High,
    Max,
}

impl Profile {
    /// Parses the canonical five names plus the four historical aliases
    /// (`turbo`→fast, `power`→high, `ultimate`→max, `adaptive`→balanced).
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "lightning" => Profile::Lightning,
            "fast" | "turbo" => Profile::Fast,
            "balanced" | "adaptive" => Profile::Balanced,
            "high" | "power" => Profile::High,
            "max" | "ultimate" => Profile::Max,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Lightning => "lightning",
            Profile::Fast => "fast",
            Profile::Balanced => "balanced",
            Profile::High => "high",
            Profile::Max => "max",
        }
    }

    /// Adjusts an analyzer recommendation per spec §4.C's per-profile rules.
    pub fn adjust(self, recommended: AlgorithmId) -> AlgorithmId {
        match self {
            Profile::Lightning => AlgorithmId::Lz4Fast,
            Profile::Fast => recommended.min(AlgorithmId::Lz4Hc),
            Profile::Balanced => recommended,
            Profile::High => {
                if recommended <= AlgorithmId::Zstd6 {
                    AlgorithmId::Zstd15
                } else {
                    recommended
                }
            }
            Profile::Max => {
                if recommended != AlgorithmId::Uncompressed {
                    AlgorithmId::Zstd22
                } else {
                    recommended
                }
            }
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile::Balanced
    }
}
