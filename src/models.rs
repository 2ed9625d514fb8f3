use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sport types carried by structured workouts.
///
/// Workout files only exist for a subset of these; encoding a workout for a
/// sport outside that subset is rejected rather than silently remapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Running,
    Cycling,
    Swimming,
    Triathlon,
    Rowing,
    CrossTraining,
}

/// Role of a step within a structured workout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalKind {
    Warmup,
    Work,
    Recovery,
    Cooldown,
    Rest,
    ActiveRecovery,
}

/// Pace target range in seconds per kilometre.
///
/// `low` is the faster bound (fewer seconds per kilometre), `high` the
/// slower one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceRange {
    /// Faster bound in seconds per kilometre
    pub low: Decimal,

    /// Slower bound in seconds per kilometre
    pub high: Decimal,
}

impl PaceRange {
    pub fn new(low: Decimal, high: Decimal) -> Self {
        PaceRange { low, high }
    }
}

/// Heart rate target range in beats per minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateRange {
    /// Lower bound in bpm
    pub low: u16,

    /// Upper bound in bpm
    pub high: u16,
}

impl HeartRateRange {
    pub fn new(low: u16, high: u16) -> Self {
        HeartRateRange { low, high }
    }
}

/// One interval of a structured workout.
///
/// Duration takes precedence over distance when both are set; with neither
/// the step is open-ended and advances on user input. A heart rate range
/// takes precedence over a pace range; with neither the step target is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutInterval {
    /// Role of the interval within the session
    pub kind: IntervalKind,

    /// Duration in seconds
    pub duration_seconds: Option<u32>,

    /// Distance in meters
    pub distance_meters: Option<Decimal>,

    /// Pace target range (running/swimming)
    pub pace_range: Option<PaceRange>,

    /// Heart rate target range
    pub heart_rate_range: Option<HeartRateRange>,

    /// How many times this interval repeats; values below 1 are treated as 1
    pub repetitions: u32,

    /// Free-form note, also used as the step display name
    pub note: Option<String>,

    /// Intensity zone tag for display only, never encoded
    pub zone: Option<u8>,
}

impl WorkoutInterval {
    /// Repetition count with the below-one case normalized away.
    pub fn effective_repetitions(&self) -> u32 {
        self.repetitions.max(1)
    }
}

impl Default for WorkoutInterval {
    fn default() -> Self {
        WorkoutInterval {
            kind: IntervalKind::Work,
            duration_seconds: None,
            distance_meters: None,
            pace_range: None,
            heart_rate_range: None,
            repetitions: 1,
            note: None,
            zone: None,
        }
    }
}

/// A planned workout made of ordered intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredWorkout {
    /// Unique identifier for the workout
    pub id: String,

    /// Display name, truncated to the format's limit when encoded
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Sport/activity type
    pub sport: Sport,

    /// Ordered intervals making up the session
    pub intervals: Vec<WorkoutInterval>,

    /// Precomputed total duration in seconds, if known
    pub estimated_duration_seconds: Option<u32>,

    /// Precomputed total distance in meters, if known
    pub estimated_distance_meters: Option<Decimal>,

    /// Precomputed training load estimate, if known
    pub estimated_load: Option<Decimal>,

    /// When the workout was created
    pub created_at: DateTime<Utc>,
}

impl StructuredWorkout {
    /// Number of steps after repetitions are expanded.
    pub fn total_steps(&self) -> usize {
        self.intervals
            .iter()
            .map(|i| i.effective_repetitions() as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn interval(kind: IntervalKind, repetitions: u32) -> WorkoutInterval {
        WorkoutInterval {
            kind,
            repetitions,
            ..WorkoutInterval::default()
        }
    }

    #[test]
    fn test_sport_enum_serialization() {
        let sport = Sport::Running;
        let json = serde_json::to_string(&sport).unwrap();
        assert_eq!(json, "\"Running\"");

        let deserialized: Sport = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Sport::Running);
    }

    #[test]
    fn test_interval_kind_enum() {
        let kinds = vec![
            IntervalKind::Warmup,
            IntervalKind::Work,
            IntervalKind::Recovery,
            IntervalKind::Cooldown,
            IntervalKind::Rest,
            IntervalKind::ActiveRecovery,
        ];

        for kind in kinds {
            let json = serde_json::to_string(&kind).unwrap();
            let deserialized: IntervalKind = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, kind);
        }
    }

    #[test]
    fn test_workout_serialization_round_trip() {
        let workout = StructuredWorkout {
            id: "wkt_2024_03_15".to_string(),
            name: "Tuesday Intervals".to_string(),
            description: Some("4x4min at threshold".to_string()),
            sport: Sport::Running,
            intervals: vec![WorkoutInterval {
                kind: IntervalKind::Work,
                duration_seconds: Some(240),
                heart_rate_range: Some(HeartRateRange::new(150, 160)),
                repetitions: 4,
                ..WorkoutInterval::default()
            }],
            estimated_duration_seconds: Some(1560),
            estimated_distance_meters: Some(dec!(5200)),
            estimated_load: Some(dec!(55.5)),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&workout).unwrap();
        let deserialized: StructuredWorkout = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, workout);
    }

    #[test]
    fn test_total_steps_expands_repetitions() {
        let workout = StructuredWorkout {
            id: "w1".to_string(),
            name: "Pyramid".to_string(),
            description: None,
            sport: Sport::Cycling,
            intervals: vec![
                interval(IntervalKind::Warmup, 1),
                interval(IntervalKind::Work, 3),
                interval(IntervalKind::Cooldown, 2),
            ],
            estimated_duration_seconds: None,
            estimated_distance_meters: None,
            estimated_load: None,
            created_at: Utc::now(),
        };

        assert_eq!(workout.total_steps(), 6);
    }

    #[test]
    fn test_zero_repetitions_count_as_one() {
        let step = interval(IntervalKind::Work, 0);
        assert_eq!(step.effective_repetitions(), 1);
    }

    #[test]
    fn test_default_interval_is_single_open_work_step() {
        let step = WorkoutInterval::default();
        assert_eq!(step.kind, IntervalKind::Work);
        assert_eq!(step.repetitions, 1);
        assert!(step.duration_seconds.is_none());
        assert!(step.heart_rate_range.is_none());
    }
}
