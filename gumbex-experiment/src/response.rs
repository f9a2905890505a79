use gumbex_core::{BlockKind, SpeakerGroup};
use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, Result};
use crate::trial::TrialConfig;

pub const SLIDER_TOTAL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slider {
    Might,
    Probably,
    Other,
}

/// Live state of the three prediction sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PredictionSliders {
    might: u32,
    probably: u32,
    other: u32,
}

impl PredictionSliders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slider: Slider) -> u32 {
        match slider {
            Slider::Might => self.might,
            Slider::Probably => self.probably,
            Slider::Other => self.other,
        }
    }

    pub fn total(&self) -> u32 {
        self.might + self.probably + self.other
    }

    /// Moves `slider` to `value`. If that pushes the total past 100 the moved
    /// slider gives back the excess. Returns the value actually set.
    pub fn set(&mut self, slider: Slider, value: u32) -> Result<u32> {
        if value > SLIDER_TOTAL {
            return Err(ExperimentError::SliderOutOfRange(value));
        }
        let rest = self.total() - self.get(slider);
        let value = value.min(SLIDER_TOTAL - rest);
        match slider {
            Slider::Might => self.might = value,
            Slider::Probably => self.probably = value,
            Slider::Other => self.other = value,
        }
        Ok(value)
    }

    pub fn is_complete(&self) -> bool {
        self.total() == SLIDER_TOTAL
    }

    pub fn submit(&self) -> Result<PredictionResponse> {
        if !self.is_complete() {
            return Err(ExperimentError::InvalidPrediction {
                total: self.total(),
            });
        }
        Ok(PredictionResponse {
            pred_might: self.might,
            pred_probably: self.probably,
            pred_other: self.other,
        })
    }
}

/// Probability mass a participant puts on each statement, summing to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub pred_might: u32,
    pub pred_probably: u32,
    pub pred_other: u32,
}

impl PredictionResponse {
    pub fn total(&self) -> u32 {
        self.pred_might + self.pred_probably + self.pred_other
    }
}

/// Row of the results export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial_index: usize,
    pub block_type: BlockKind,
    pub speaker_color: Option<SpeakerGroup>,
    #[serde(flatten)]
    pub trial: TrialConfig,
    pub response: Option<PredictionResponse>,
}

impl TrialRecord {
    pub fn new(trial_index: usize, block_type: BlockKind, trial: TrialConfig) -> Self {
        Self {
            trial_index,
            block_type,
            speaker_color: trial.speaker_group(),
            trial,
            response: None,
        }
    }

    pub fn with_response(mut self, response: PredictionResponse) -> Self {
        self.response = Some(response);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::info_screen;

    #[test]
    fn moved_slider_absorbs_excess() {
        let mut s = PredictionSliders::new();
        assert_eq!(s.set(Slider::Might, 70), Ok(70));
        assert_eq!(s.set(Slider::Probably, 50), Ok(30));
        assert_eq!(s.get(Slider::Probably), 30);
        assert_eq!(s.total(), 100);

        // lowering then raising a slider frees room again
        assert_eq!(s.set(Slider::Might, 20), Ok(20));
        assert_eq!(s.set(Slider::Other, 90), Ok(50));
        assert!(s.is_complete());
    }

    #[test]
    fn slider_values_must_be_percentages() {
        let mut s = PredictionSliders::new();
        assert_eq!(
            s.set(Slider::Other, 101),
            Err(ExperimentError::SliderOutOfRange(101))
        );
        assert_eq!(s.total(), 0);
    }

    #[test]
    fn submit_requires_full_total() {
        let mut s = PredictionSliders::new();
        s.set(Slider::Might, 40).unwrap();
        assert_eq!(
            s.submit(),
            Err(ExperimentError::InvalidPrediction { total: 40 })
        );
        s.set(Slider::Probably, 60).unwrap();
        let r = s.submit().unwrap();
        assert_eq!(r.total(), 100);
        assert_eq!(r.pred_probably, 60);
    }

    #[test]
    fn record_exports_flat_row() {
        let trial = info_screen("Let's see what the first one says.", 15, 15, 7);
        let response = PredictionResponse {
            pred_might: 10,
            pred_probably: 80,
            pred_other: 10,
        };
        let record = TrialRecord::new(4, BlockKind::Prediction, trial).with_response(response);
        assert_eq!(record.speaker_color, Some(SpeakerGroup::Yellow));

        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["block_type"], "prediction");
        assert_eq!(v["speaker_color"], "yellow");
        assert_eq!(v["count_class_b"], 15);
        assert_eq!(v["response"]["pred_probably"], 80);
    }
}
