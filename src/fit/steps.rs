//! Flattening and protocol mapping of workout intervals.
//!
//! Repetition counts are expanded into literal steps before encoding, one
//! step record per execution, so a 4x interval block becomes four step
//! messages with consecutive indices. All domain-to-protocol value mapping
//! lives here; the message builders only see raw field values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::{EncodeError, Result, MAX_STEPS};
use crate::fit::profile::{
    duration_code, intensity_code, sport_code, target_code, HEART_RATE_ABSOLUTE_OFFSET,
    MAX_STEP_NAME_BYTES,
};
use crate::fit::records::truncate_utf8;
use crate::models::{IntervalKind, Sport, StructuredWorkout, WorkoutInterval};

/// Duration of one flattened step: protocol code plus raw field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDuration {
    pub code: u8,
    pub value: u32,
}

/// Target of one flattened step. `value` stays zero for custom ranges; the
/// device reads the range from the two custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTarget {
    pub code: u8,
    pub value: u32,
    pub custom_low: u32,
    pub custom_high: u32,
}

/// One fully mapped workout step, ready for record encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatStep {
    pub index: u16,
    pub name: String,
    pub duration: StepDuration,
    pub target: StepTarget,
    pub intensity: u8,
}

/// Workout-file sport code. Only running, cycling and swimming workouts
/// exist in the format; anything else is rejected here.
pub fn map_sport(sport: &Sport) -> Result<u8> {
    match sport {
        Sport::Running => Ok(sport_code::RUNNING),
        Sport::Cycling => Ok(sport_code::CYCLING),
        Sport::Swimming => Ok(sport_code::SWIMMING),
        Sport::Triathlon | Sport::Rowing | Sport::CrossTraining => {
            Err(EncodeError::UnsupportedSport {
                sport: sport.clone(),
            })
        }
    }
}

/// Intensity code for a step role. Recovery and ActiveRecovery share the
/// recovery code.
pub fn map_intensity(kind: &IntervalKind) -> u8 {
    match kind {
        IntervalKind::Warmup => intensity_code::WARMUP,
        IntervalKind::Work => intensity_code::ACTIVE,
        IntervalKind::Recovery => intensity_code::RECOVERY,
        IntervalKind::Cooldown => intensity_code::COOLDOWN,
        IntervalKind::Rest => intensity_code::REST,
        IntervalKind::ActiveRecovery => intensity_code::RECOVERY,
    }
}

/// Duration mapping. Time wins over distance when both are set; with
/// neither the step is open and advances on user input.
fn map_duration(interval: &WorkoutInterval) -> Result<StepDuration> {
    if let Some(seconds) = interval.duration_seconds {
        let millis = u64::from(seconds) * 1000;
        let value = u32::try_from(millis).map_err(|_| EncodeError::ValueOutOfRange {
            field: "duration_value",
            value: millis,
        })?;
        return Ok(StepDuration {
            code: duration_code::TIME,
            value,
        });
    }

    if let Some(meters) = interval.distance_meters {
        let centimeters = (meters * Decimal::from(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let value = centimeters
            .to_u32()
            .ok_or_else(|| EncodeError::ValueOutOfRange {
                field: "duration_value",
                value: centimeters.to_u64().unwrap_or(u64::MAX),
            })?;
        return Ok(StepDuration {
            code: duration_code::DISTANCE,
            value,
        });
    }

    Ok(StepDuration {
        code: duration_code::OPEN,
        value: 0,
    })
}

/// Speed in millimetres per second for a pace in seconds per kilometre.
fn pace_to_mm_per_s(pace: Decimal) -> Result<u32> {
    if pace <= Decimal::ZERO {
        return Err(EncodeError::ValueOutOfRange {
            field: "custom_target_speed",
            value: 0,
        });
    }
    let speed = (Decimal::from(1_000_000) / pace)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    speed.to_u32().ok_or_else(|| EncodeError::ValueOutOfRange {
        field: "custom_target_speed",
        value: speed.to_u64().unwrap_or(u64::MAX),
    })
}

/// Target mapping. A heart rate range wins over a pace range; with neither
/// the target is open.
///
/// Heart rate bounds carry a +100 offset to mark them as absolute bpm
/// rather than zone numbers. Pace bounds invert when converted to speed:
/// the slower pace becomes the low speed bound.
fn map_target(interval: &WorkoutInterval) -> Result<StepTarget> {
    if let Some(hr) = &interval.heart_rate_range {
        return Ok(StepTarget {
            code: target_code::HEART_RATE,
            value: 0,
            custom_low: u32::from(hr.low) + HEART_RATE_ABSOLUTE_OFFSET,
            custom_high: u32::from(hr.high) + HEART_RATE_ABSOLUTE_OFFSET,
        });
    }

    if let Some(pace) = &interval.pace_range {
        return Ok(StepTarget {
            code: target_code::SPEED,
            value: 0,
            custom_low: pace_to_mm_per_s(pace.high)?,
            custom_high: pace_to_mm_per_s(pace.low)?,
        });
    }

    Ok(StepTarget {
        code: target_code::OPEN,
        value: 0,
        custom_low: 0,
        custom_high: 0,
    })
}

/// Display label used when a step carries no note.
fn kind_label(kind: &IntervalKind) -> &'static str {
    match kind {
        IntervalKind::Warmup => "Warmup",
        IntervalKind::Work => "Interval",
        IntervalKind::Recovery => "Recovery",
        IntervalKind::Cooldown => "Cooldown",
        IntervalKind::Rest => "Rest",
        IntervalKind::ActiveRecovery => "Recovery",
    }
}

/// Step display name: the interval note truncated to the field limit, or a
/// generated label with the 1-based flattened position.
fn step_name(interval: &WorkoutInterval, position: usize) -> String {
    match &interval.note {
        Some(note) => truncate_utf8(note, MAX_STEP_NAME_BYTES).to_string(),
        None => format!("{} {}", kind_label(&interval.kind), position),
    }
}

/// Expand every interval into its literal steps with contiguous indices and
/// mapped protocol values.
pub fn flatten(workout: &StructuredWorkout) -> Result<Vec<FlatStep>> {
    let total = workout.total_steps();
    if total > MAX_STEPS {
        return Err(EncodeError::TooManySteps {
            count: total,
            max: MAX_STEPS,
        });
    }

    let mut steps = Vec::with_capacity(total);
    for interval in &workout.intervals {
        let duration = map_duration(interval)?;
        let target = map_target(interval)?;
        let intensity = map_intensity(&interval.kind);

        for _ in 0..interval.effective_repetitions() {
            let position = steps.len() + 1;
            steps.push(FlatStep {
                index: steps.len() as u16,
                name: step_name(interval, position),
                duration,
                target,
                intensity,
            });
        }
    }

    debug!("Flattened {} intervals into {} steps", workout.intervals.len(), steps.len());
    Ok(steps)
}
