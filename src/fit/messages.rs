//! Workout-file message builders.
//!
//! Three messages make up a workout file: File-Identity (what the file is
//! and where it came from), Workout (sport, name, step count) and one Step
//! per flattened interval. Each message type gets its own local id and a
//! single definition record; all step data records share one definition.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::fit::profile::{
    file_id_field, local_id, mesg_num, step_field, workout_field, FILE_TYPE_WORKOUT,
    FIT_EPOCH_UNIX_OFFSET, MAX_WORKOUT_NAME_BYTES, STEP_NAME_FIELD_SIZE,
};
use crate::fit::records::{BaseType, DataRecord, DefinitionRecord, FieldDefinition};
use crate::fit::steps::{self, FlatStep};
use crate::fit::EncodeOptions;
use crate::models::StructuredWorkout;

/// Seconds since the FIT epoch for a timestamp. Times before the epoch
/// clamp to zero.
pub fn to_fit_timestamp(time: DateTime<Utc>) -> u32 {
    (time.timestamp() - FIT_EPOCH_UNIX_OFFSET).clamp(0, i64::from(u32::MAX)) as u32
}

/// File-Identity message: file type, origin identifiers, creation time.
pub fn file_id_message(
    options: &EncodeOptions,
    time_created: u32,
) -> (DefinitionRecord, DataRecord) {
    let def = DefinitionRecord::new(
        local_id::FILE_ID,
        mesg_num::FILE_ID,
        vec![
            FieldDefinition::new(file_id_field::FILE_TYPE, BaseType::Enum),
            FieldDefinition::new(file_id_field::MANUFACTURER, BaseType::UInt16),
            FieldDefinition::new(file_id_field::PRODUCT, BaseType::UInt16),
            FieldDefinition::new(file_id_field::SERIAL_NUMBER, BaseType::UInt32z),
            FieldDefinition::new(file_id_field::TIME_CREATED, BaseType::UInt32),
        ],
    );

    let mut data = DataRecord::new(local_id::FILE_ID);
    data.push_enum(FILE_TYPE_WORKOUT);
    data.push_u16(options.manufacturer);
    data.push_u16(options.product);
    data.push_u32(options.serial_number);
    data.push_u32(time_created);

    (def, data)
}

/// Workout message: sport, display name, flattened step count.
///
/// The name field is declared at its used size plus terminator, capped at
/// the format limit. The declared size tracks the raw byte length even when
/// a multi-byte character forces a shorter cut; padding fills the gap.
pub fn workout_message(sport: u8, name: &str, num_steps: u16) -> (DefinitionRecord, DataRecord) {
    let declared = (name.len().min(MAX_WORKOUT_NAME_BYTES) + 1) as u8;

    let def = DefinitionRecord::new(
        local_id::WORKOUT,
        mesg_num::WORKOUT,
        vec![
            FieldDefinition::new(workout_field::SPORT, BaseType::Enum),
            FieldDefinition::with_size(workout_field::WKT_NAME, declared, BaseType::String),
            FieldDefinition::new(workout_field::NUM_VALID_STEPS, BaseType::UInt16),
        ],
    );

    let mut data = DataRecord::new(local_id::WORKOUT);
    data.push_enum(sport);
    data.push_string(name, declared);
    data.push_u16(num_steps);

    (def, data)
}

/// The step definition shared by every step data record.
pub fn step_definition() -> DefinitionRecord {
    DefinitionRecord::new(
        local_id::WORKOUT_STEP,
        mesg_num::WORKOUT_STEP,
        vec![
            FieldDefinition::new(step_field::MESSAGE_INDEX, BaseType::UInt16),
            FieldDefinition::with_size(
                step_field::WKT_STEP_NAME,
                STEP_NAME_FIELD_SIZE,
                BaseType::String,
            ),
            FieldDefinition::new(step_field::DURATION_TYPE, BaseType::Enum),
            FieldDefinition::new(step_field::DURATION_VALUE, BaseType::UInt32),
            FieldDefinition::new(step_field::TARGET_TYPE, BaseType::Enum),
            FieldDefinition::new(step_field::TARGET_VALUE, BaseType::UInt32),
            FieldDefinition::new(step_field::CUSTOM_TARGET_VALUE_LOW, BaseType::UInt32),
            FieldDefinition::new(step_field::CUSTOM_TARGET_VALUE_HIGH, BaseType::UInt32),
            FieldDefinition::new(step_field::INTENSITY, BaseType::Enum),
        ],
    )
}

/// One step data record under the shared definition. Field order must match
/// [`step_definition`] exactly.
pub fn step_data(step: &FlatStep) -> DataRecord {
    let mut data = DataRecord::new(local_id::WORKOUT_STEP);
    data.push_u16(step.index);
    data.push_string(&step.name, STEP_NAME_FIELD_SIZE);
    data.push_enum(step.duration.code);
    data.push_u32(step.duration.value);
    data.push_enum(step.target.code);
    data.push_u32(step.target.value);
    data.push_u32(step.target.custom_low);
    data.push_u32(step.target.custom_high);
    data.push_enum(step.intensity);
    data
}

/// All payload records for a workout, in emission order, as raw byte
/// chunks: File-Identity pair, Workout pair, step definition, then one data
/// record per flattened step.
pub fn build_records(
    workout: &StructuredWorkout,
    options: &EncodeOptions,
) -> Result<Vec<Vec<u8>>> {
    let sport = steps::map_sport(&workout.sport)?;
    let flat = steps::flatten(workout)?;
    let time_created = to_fit_timestamp(options.time_created.unwrap_or_else(Utc::now));

    let mut chunks = Vec::with_capacity(5 + flat.len());

    let (def, data) = file_id_message(options, time_created);
    chunks.push(def.encode());
    chunks.push(data.into_bytes());

    let (def, data) = workout_message(sport, &workout.name, flat.len() as u16);
    chunks.push(def.encode());
    chunks.push(data.into_bytes());

    chunks.push(step_definition().encode());
    for step in &flat {
        chunks.push(step_data(step).into_bytes());
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::steps::{StepDuration, StepTarget};
    use crate::models::{IntervalKind, Sport, WorkoutInterval};
    use chrono::TimeZone;

    fn fixed_options() -> EncodeOptions {
        EncodeOptions {
            manufacturer: 255,
            product: 1,
            serial_number: 1,
            time_created: Some(Utc.with_ymd_and_hms(2024, 3, 15, 7, 30, 0).unwrap()),
        }
    }

    #[test]
    fn test_fit_timestamp_conversion() {
        let time = Utc.with_ymd_and_hms(2024, 3, 15, 7, 30, 0).unwrap();
        assert_eq!(to_fit_timestamp(time), 1_079_422_200);

        // The epoch itself is zero.
        let epoch = Utc.with_ymd_and_hms(1989, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(to_fit_timestamp(epoch), 0);

        // Pre-epoch times clamp instead of wrapping.
        let before = Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_fit_timestamp(before), 0);
    }

    #[test]
    fn test_file_id_records_byte_exact() {
        let options = fixed_options();
        let (def, data) = file_id_message(&options, 1_079_422_200);

        assert_eq!(
            def.encode(),
            vec![
                0x40, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00, 0x01, 0x00, 0x01, 0x02, 0x84,
                0x02, 0x02, 0x84, 0x03, 0x04, 0x8C, 0x04, 0x04, 0x86,
            ]
        );
        assert_eq!(
            data.into_bytes(),
            vec![
                0x00, 0x05, 0xFF, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0xF8, 0xAC,
                0x56, 0x40,
            ]
        );
    }

    #[test]
    fn test_workout_records_byte_exact() {
        let (def, data) = workout_message(1, "Morning Run", 4);

        assert_eq!(
            def.encode(),
            vec![
                0x41, 0x00, 0x00, 0x1A, 0x00, 0x03, 0x04, 0x01, 0x00, 0x08, 0x0C, 0x07,
                0x06, 0x02, 0x84,
            ]
        );
        assert_eq!(
            data.into_bytes(),
            vec![
                0x01, 0x01, 0x4D, 0x6F, 0x72, 0x6E, 0x69, 0x6E, 0x67, 0x20, 0x52, 0x75,
                0x6E, 0x00, 0x04, 0x00,
            ]
        );
    }

    #[test]
    fn test_workout_name_declared_size_caps_at_64() {
        let long_name = "x".repeat(100);
        let (def, data) = workout_message(2, &long_name, 1);

        // sport (1) + name (64) + steps (2)
        assert_eq!(def.fields[1].size, 64);
        assert_eq!(def.data_record_len(), 1 + 1 + 64 + 2);
        let bytes = data.into_bytes();
        assert_eq!(bytes.len(), 1 + 1 + 64 + 2);
        // 63 usable bytes, then the terminator.
        assert_eq!(bytes[2 + 62], b'x');
        assert_eq!(bytes[2 + 63], 0x00);
    }

    #[test]
    fn test_step_definition_byte_exact() {
        assert_eq!(
            step_definition().encode(),
            vec![
                0x42, 0x00, 0x00, 0x1B, 0x00, 0x09, 0xFE, 0x02, 0x84, 0x00, 0x18, 0x07,
                0x01, 0x01, 0x00, 0x02, 0x04, 0x86, 0x03, 0x01, 0x00, 0x04, 0x04, 0x86,
                0x05, 0x04, 0x86, 0x06, 0x04, 0x86, 0x07, 0x01, 0x00,
            ]
        );
        assert_eq!(step_definition().data_record_len(), 46);
    }

    #[test]
    fn test_step_data_byte_exact() {
        let step = FlatStep {
            index: 1,
            name: "Interval 2".to_string(),
            duration: StepDuration {
                code: 0,
                value: 240_000,
            },
            target: StepTarget {
                code: 1,
                value: 0,
                custom_low: 250,
                custom_high: 260,
            },
            intensity: 0,
        };

        assert_eq!(
            step_data(&step).into_bytes(),
            vec![
                0x02, 0x01, 0x00, 0x49, 0x6E, 0x74, 0x65, 0x72, 0x76, 0x61, 0x6C, 0x20,
                0x32, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x80, 0xA9, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00,
                0x00, 0xFA, 0x00, 0x00, 0x00, 0x04, 0x01, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn test_build_records_order_and_sizes() {
        let workout = StructuredWorkout {
            id: "w1".to_string(),
            name: "Tuesday Intervals".to_string(),
            description: None,
            sport: Sport::Running,
            intervals: vec![
                WorkoutInterval {
                    kind: IntervalKind::Warmup,
                    duration_seconds: Some(300),
                    ..WorkoutInterval::default()
                },
                WorkoutInterval {
                    kind: IntervalKind::Work,
                    duration_seconds: Some(240),
                    repetitions: 4,
                    ..WorkoutInterval::default()
                },
                WorkoutInterval {
                    kind: IntervalKind::Cooldown,
                    duration_seconds: Some(300),
                    ..WorkoutInterval::default()
                },
            ],
            estimated_duration_seconds: None,
            estimated_distance_meters: None,
            estimated_load: None,
            created_at: Utc::now(),
        };

        let chunks = build_records(&workout, &fixed_options()).unwrap();

        // file id pair, workout pair, step definition, six step records.
        assert_eq!(chunks.len(), 11);
        assert_eq!(chunks[0].len(), 21);
        assert_eq!(chunks[1].len(), 14);
        assert_eq!(chunks[2].len(), 15);
        assert_eq!(chunks[3].len(), 4 + 18);
        assert_eq!(chunks[4].len(), 33);
        for step_chunk in &chunks[5..] {
            assert_eq!(step_chunk.len(), 46);
        }

        let payload: usize = chunks.iter().map(|c| c.len()).sum();
        assert_eq!(payload, 381);
    }

    #[test]
    fn test_build_records_rejects_unmapped_sport() {
        let workout = StructuredWorkout {
            id: "w1".to_string(),
            name: "Brick".to_string(),
            description: None,
            sport: Sport::Triathlon,
            intervals: vec![WorkoutInterval::default()],
            estimated_duration_seconds: None,
            estimated_distance_meters: None,
            estimated_load: None,
            created_at: Utc::now(),
        };

        assert!(build_records(&workout, &EncodeOptions::default()).is_err());
    }
}
