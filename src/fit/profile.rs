//! The slice of the FIT profile that workout files use.
//!
//! Numbers here come from the profile tables shipped with the official SDK.
//! Only the three workout-file messages and the enum values this encoder
//! emits are listed.

/// Global message numbers.
pub mod mesg_num {
    pub const FILE_ID: u16 = 0;
    pub const WORKOUT: u16 = 26;
    pub const WORKOUT_STEP: u16 = 27;
}

/// Local message ids assigned by this encoder, in emission order.
pub mod local_id {
    pub const FILE_ID: u8 = 0;
    pub const WORKOUT: u8 = 1;
    pub const WORKOUT_STEP: u8 = 2;
}

/// file_id message fields.
pub mod file_id_field {
    pub const FILE_TYPE: u8 = 0;
    pub const MANUFACTURER: u8 = 1;
    pub const PRODUCT: u8 = 2;
    pub const SERIAL_NUMBER: u8 = 3;
    pub const TIME_CREATED: u8 = 4;
}

/// workout message fields.
pub mod workout_field {
    pub const SPORT: u8 = 4;
    pub const NUM_VALID_STEPS: u8 = 6;
    pub const WKT_NAME: u8 = 8;
}

/// workout_step message fields.
pub mod step_field {
    pub const MESSAGE_INDEX: u8 = 254;
    pub const WKT_STEP_NAME: u8 = 0;
    pub const DURATION_TYPE: u8 = 1;
    pub const DURATION_VALUE: u8 = 2;
    pub const TARGET_TYPE: u8 = 3;
    pub const TARGET_VALUE: u8 = 4;
    pub const CUSTOM_TARGET_VALUE_LOW: u8 = 5;
    pub const CUSTOM_TARGET_VALUE_HIGH: u8 = 6;
    pub const INTENSITY: u8 = 7;
}

/// file enum value for workout files.
pub const FILE_TYPE_WORKOUT: u8 = 5;

/// manufacturer enum value for files not written by a registered vendor.
pub const MANUFACTURER_DEVELOPMENT: u16 = 255;

/// sport enum values for the sports this encoder maps.
pub mod sport_code {
    pub const RUNNING: u8 = 1;
    pub const CYCLING: u8 = 2;
    pub const SWIMMING: u8 = 5;
}

/// wkt_step_duration enum values.
pub mod duration_code {
    pub const TIME: u8 = 0;
    pub const DISTANCE: u8 = 1;
    pub const OPEN: u8 = 5;
}

/// wkt_step_target enum values.
pub mod target_code {
    pub const SPEED: u8 = 0;
    pub const HEART_RATE: u8 = 1;
    pub const OPEN: u8 = 2;
}

/// intensity enum values.
pub mod intensity_code {
    pub const ACTIVE: u8 = 0;
    pub const REST: u8 = 1;
    pub const WARMUP: u8 = 2;
    pub const COOLDOWN: u8 = 3;
    pub const RECOVERY: u8 = 4;
}

/// Offset added to absolute bpm in custom heart-rate targets. Values at or
/// below 100 read as zone numbers on the device.
pub const HEART_RATE_ABSOLUTE_OFFSET: u32 = 100;

/// Seconds between the Unix epoch and the FIT epoch, 1989-12-31T00:00:00Z.
pub const FIT_EPOCH_UNIX_OFFSET: i64 = 631_065_600;

/// Longest usable workout name in bytes; the declared field size adds one
/// byte for the terminator.
pub const MAX_WORKOUT_NAME_BYTES: usize = 63;

/// Step names occupy a fixed-size field: 23 usable bytes plus padding.
pub const STEP_NAME_FIELD_SIZE: u8 = 24;
pub const MAX_STEP_NAME_BYTES: usize = 23;
