// Threshold classification for distance channels
use serde::{Deserialize, Serialize};

/// Status category shown for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Danger,
    Warning,
    Safe,
}

/// Static per-channel thresholds.
///
/// For a non-inverted profile lower distances are more dangerous. An inverted
/// profile (the ground sensor) treats the mid band as normal: below
/// `danger_threshold` the surface is irregular, above `warn_threshold` there is
/// a gap or step ahead.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SensorProfile {
    pub max_range: f64,
    pub danger_threshold: f64,
    pub warn_threshold: f64,
    #[serde(default)]
    pub inverted: bool,
}

impl SensorProfile {
    pub const fn proximity() -> Self {
        Self {
            max_range: 300.0,
            danger_threshold: 25.0,
            warn_threshold: 50.0,
            inverted: false,
        }
    }

    pub const fn ground() -> Self {
        Self {
            max_range: 80.0,
            danger_threshold: 20.0,
            warn_threshold: 40.0,
            inverted: true,
        }
    }
}

/// Profiles for the three proximity channels and the ground channel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SensorProfiles {
    #[serde(default = "SensorProfile::proximity")]
    pub proximity: SensorProfile,
    #[serde(default = "SensorProfile::ground")]
    pub ground: SensorProfile,
}

impl Default for SensorProfiles {
    fn default() -> Self {
        Self {
            proximity: SensorProfile::proximity(),
            ground: SensorProfile::ground(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub percentage: f64,
}

/// Classify a measured distance against a profile.
///
/// `value` must be a finite, non-negative measurement; the sentinel for
/// "unavailable" is filtered out by the caller before this point.
pub fn classify(value: f64, profile: &SensorProfile) -> Classification {
    let percentage = if profile.max_range > 0.0 {
        (value / profile.max_range * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let category = if value < profile.danger_threshold {
        Category::Danger
    } else if profile.inverted {
        if value > profile.warn_threshold {
            Category::Warning
        } else {
            Category::Safe
        }
    } else if value < profile.warn_threshold {
        Category::Warning
    } else {
        Category::Safe
    };

    Classification {
        category,
        percentage,
    }
}

/// Narrative text for the ground sensor panel.
pub fn ground_narrative(classification: Option<&Classification>) -> &'static str {
    match classification.map(|c| c.category) {
        Some(Category::Danger) => "Surface irregularity",
        Some(Category::Warning) => "Gap or step detected",
        Some(Category::Safe) => "Normal",
        None => "No reading",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_proximity_classification() {
        let profile = SensorProfile::proximity();

        let near = classify(10.0, &profile);
        assert_eq!(near.category, Category::Danger);
        assert!(approx(near.percentage, 3.33));

        let clear = classify(60.0, &profile);
        assert_eq!(clear.category, Category::Safe);
        assert!(approx(clear.percentage, 20.0));

        let far = classify(300.0, &profile);
        assert_eq!(far.category, Category::Safe);
        assert!(approx(far.percentage, 100.0));
    }

    #[test]
    fn test_proximity_boundaries() {
        let profile = SensorProfile::proximity();
        assert_eq!(classify(24.9, &profile).category, Category::Danger);
        assert_eq!(classify(25.0, &profile).category, Category::Warning);
        assert_eq!(classify(49.9, &profile).category, Category::Warning);
        assert_eq!(classify(50.0, &profile).category, Category::Safe);
        assert!(approx(classify(450.0, &profile).percentage, 100.0));
    }

    #[test]
    fn test_ground_classification() {
        let profile = SensorProfile::ground();
        assert_eq!(classify(10.0, &profile).category, Category::Danger);
        assert_eq!(classify(50.0, &profile).category, Category::Warning);
        assert_eq!(classify(30.0, &profile).category, Category::Safe);

        // Both band edges are normal
        assert_eq!(classify(20.0, &profile).category, Category::Safe);
        assert_eq!(classify(40.0, &profile).category, Category::Safe);
    }

    #[test]
    fn test_ground_narrative() {
        let profile = SensorProfile::ground();
        assert_eq!(ground_narrative(Some(&classify(5.0, &profile))), "Surface irregularity");
        assert_eq!(ground_narrative(Some(&classify(70.0, &profile))), "Gap or step detected");
        assert_eq!(ground_narrative(Some(&classify(35.0, &profile))), "Normal");
        assert_eq!(ground_narrative(None), "No reading");
    }

    #[test]
    fn test_zero_range_profile_does_not_divide() {
        let profile = SensorProfile {
            max_range: 0.0,
            danger_threshold: 1.0,
            warn_threshold: 2.0,
            inverted: false,
        };
        assert_eq!(classify(5.0, &profile).percentage, 0.0);
    }
}
