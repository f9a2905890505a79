pub mod scheduler;
pub mod timer;

pub use scheduler::{FrameScheduler, Scheduler, TickHandle};
pub use timer::{CalibrationStats, HighPrecisionTimer, Timer};
