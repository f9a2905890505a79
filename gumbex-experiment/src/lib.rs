pub mod config;
pub mod design;
pub mod error;
pub mod response;
pub mod session;
pub mod trial;

pub use config::{ConditionAssignment, DesignConfig, SpeakerBias};
pub use design::{RATIO_TABLE, Speaker, build_condition_design, build_speaker_sweep};
pub use error::{ExperimentError, Result};
pub use response::{PredictionResponse, PredictionSliders, Slider, TrialRecord};
pub use session::{Block, RollCallEntry, Screen, Session, build_roll_call, plan_session};
pub use trial::{TrialConfig, TrialSpec, info_screen, make_trial_config, split_counts};
