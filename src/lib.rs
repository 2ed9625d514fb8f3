// Library interface for the fitforge workout-file encoder
// Converts structured interval workouts into byte-exact FIT workout files

pub mod error;
pub mod fit;
pub mod models;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{EncodeError, Result};
pub use fit::{
    encode, encode_to_file, encode_to_temp_file, encode_with_options, encoder_for,
    BufferedEncoder, EncodeOptions, EncoderBackend, StreamingEncoder, WorkoutEncoder,
};
