pub mod error;
pub mod layout;
pub mod motion;

pub use error::{GlobeError, Result};
pub use layout::{GlobeTuning, MAX_TOKENS, Placement, place, place_signed};
pub use motion::{AnimationHandle, DEFAULT_SPEED, MotionSimulator, MotionState, step};
