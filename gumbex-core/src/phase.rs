use serde::{Deserialize, Serialize};

/// Describes how a block of screens behaves when it is presented
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + std::fmt::Debug + Default {
    fn allows_input(&self) -> bool;
    fn shows_globe(&self) -> bool;
    fn plays_audio(&self) -> bool;
    fn next(&self) -> Option<Self>;

    fn is_prediction(&self) -> bool {
        false
    }
    fn is_exposure(&self) -> bool {
        false
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Intro,
    RollCall,
    Exposure,
    Prediction,
}

impl Phase for BlockKind {
    fn allows_input(&self) -> bool {
        matches!(self, Self::Prediction)
    }
    fn shows_globe(&self) -> bool {
        // roll call screens show the aliens jumping, not the machine
        !matches!(self, Self::RollCall)
    }
    fn plays_audio(&self) -> bool {
        matches!(self, Self::RollCall | Self::Exposure)
    }
    /// Stage that may follow this one. Intro screens can be interleaved
    /// anywhere, so this only orders the main stages.
    fn next(&self) -> Option<Self> {
        use BlockKind::*;
        Some(match self {
            Intro => RollCall,
            RollCall => Exposure,
            Exposure => Prediction,
            Prediction => return None,
        })
    }

    fn is_prediction(&self) -> bool {
        matches!(self, BlockKind::Prediction)
    }

    fn is_exposure(&self) -> bool {
        matches!(self, BlockKind::Exposure)
    }
}
