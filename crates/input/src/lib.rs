//! Input-to-state mapping: discrete key commands, the mouse-drag orbit state
//! machine, and the external pose-sensor mapper.
//!
//! # Invariants
//! - All mappings mutate state passed in by the caller; no ambient globals.
//! - Unrecognized keys and missing objects are no-ops, never errors.
//! - Degenerate sensor readings are rejected without touching the target.

pub mod command;
pub mod mouse;
pub mod sensor;

pub use command::{Command, map_key};
pub use mouse::MouseLook;
pub use sensor::{PipePoseSource, PoseReading, PoseSource, SensorError, apply_pose};

pub fn crate_info() -> &'static str {
    "cubeview-input v0.1.0"
}
