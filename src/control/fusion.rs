use log::warn;
use serde::{Deserialize, Serialize};

/// How redundant joint sensors are combined into one angle.
#[derive(PartialEq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionStrategy {
    /// Trust the primary sensor and ignore the rest.
    #[default]
    PotentiometerOnly,
    /// Vote: readings within `tolerance_deg` of the median form the
    /// consensus when they are a strict majority.
    BoundedDisagreement { tolerance_deg: f64 },
}

/// Angles from every sensor on a joint, already converted to degrees.
///
/// `primary` is the potentiometer when the joint has one, otherwise its
/// first encoder.
#[derive(PartialEq, Clone, Debug)]
pub struct JointReadings {
    pub primary: f64,
    pub redundant: Vec<f64>,
}

impl JointReadings {
    pub fn fuse(&self, strategy: FusionStrategy) -> f64 {
        match strategy {
            FusionStrategy::PotentiometerOnly => self.primary,
            FusionStrategy::BoundedDisagreement { tolerance_deg } => self.vote(tolerance_deg),
        }
    }

    fn vote(&self, tolerance_deg: f64) -> f64 {
        let total = 1 + self.redundant.len();
        if total == 1 {
            return self.primary;
        }

        let mut finite: Vec<f64> = std::iter::once(self.primary)
            .chain(self.redundant.iter().copied())
            .filter(|angle| angle.is_finite())
            .collect();

        if finite.is_empty() {
            return self.primary;
        }

        finite.sort_by(f64::total_cmp);
        let median = median_of_sorted(&finite);

        let agreeing: Vec<f64> = finite
            .into_iter()
            .filter(|angle| (angle - median).abs() <= tolerance_deg)
            .collect();

        if agreeing.len() * 2 > total {
            agreeing.iter().sum::<f64>() / agreeing.len() as f64
        } else {
            warn!(
                "sensors disagree beyond {tolerance_deg} deg (primary {:.2}, others {:?}), using primary",
                self.primary, self.redundant
            );
            self.primary
        }
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod fusion_tests {
    use super::*;

    const VOTE: FusionStrategy = FusionStrategy::BoundedDisagreement { tolerance_deg: 2.0 };

    #[test]
    fn potentiometer_only_ignores_encoders() {
        let readings = JointReadings {
            primary: 30.0,
            redundant: vec![120.0, -5.0],
        };

        assert_eq!(readings.fuse(FusionStrategy::PotentiometerOnly), 30.0);
    }

    #[test]
    fn single_sensor_passes_through() {
        let readings = JointReadings {
            primary: 12.0,
            redundant: vec![],
        };

        assert_eq!(readings.fuse(VOTE), 12.0);
    }

    #[test]
    fn vote_discards_outlier() {
        let readings = JointReadings {
            primary: 31.0,
            redundant: vec![29.0, 80.0],
        };

        assert_eq!(readings.fuse(VOTE), 30.0, "mean of the two agreeing sensors");
    }

    #[test]
    fn vote_outvotes_bad_primary() {
        let readings = JointReadings {
            primary: 0.0,
            redundant: vec![45.0, 45.5],
        };

        assert_eq!(readings.fuse(VOTE), 45.25);
    }

    #[test]
    fn vote_without_majority_falls_back_to_primary() {
        let readings = JointReadings {
            primary: 10.0,
            redundant: vec![50.0],
        };

        assert_eq!(readings.fuse(VOTE), 10.0, "two-way split has no majority");
    }

    #[test]
    fn vote_skips_disconnected_sensor() {
        let readings = JointReadings {
            primary: f64::NAN,
            redundant: vec![20.0, 20.5],
        };

        assert_eq!(readings.fuse(VOTE), 20.25);
    }
}
