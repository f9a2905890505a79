use std::fmt;
use std::str::FromStr;

use gumbex_core::{Randomness, UtteranceCategory};
use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, Result};

/// Sizes of the generated blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    /// Gumballs per machine in the condition design
    pub total: u32,
    pub sweep_repetitions: usize,
    pub critical_rows: usize,
    /// Rows at 100% with a bare statement
    pub certain_fillers: usize,
    /// Rows at the fixed off-threshold proportion
    pub hedge_fillers: usize,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            total: 30,
            sweep_repetitions: 3,
            critical_rows: 10,
            certain_fillers: 3,
            hedge_fillers: 7,
        }
    }
}

impl DesignConfig {
    pub fn condition_rows(&self) -> usize {
        self.critical_rows + self.certain_fillers + self.hedge_fillers
    }
}

/// How readily the exposure speaker commits to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerBias {
    Cautious,
    Confident,
}

impl SpeakerBias {
    /// Category used on critical rows for a machine at `proportion`.
    pub fn critical_category(&self, proportion: f64, speaker_threshold: f64) -> UtteranceCategory {
        let above = proportion >= speaker_threshold;
        match (self, above) {
            (SpeakerBias::Confident, true) | (SpeakerBias::Cautious, false) => {
                UtteranceCategory::Probably
            }
            (SpeakerBias::Confident, false) | (SpeakerBias::Cautious, true) => {
                UtteranceCategory::Might
            }
        }
    }

    /// Fixed proportion and category of the hedge fillers.
    pub fn hedge_filler(&self) -> (f64, UtteranceCategory) {
        match self {
            SpeakerBias::Confident => (0.25, UtteranceCategory::Might),
            SpeakerBias::Cautious => (0.90, UtteranceCategory::Probably),
        }
    }
}

impl FromStr for SpeakerBias {
    type Err = ExperimentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cautious" => Ok(SpeakerBias::Cautious),
            "confident" => Ok(SpeakerBias::Confident),
            _ => Err(ExperimentError::UnknownCondition(s.to_string())),
        }
    }
}

impl fmt::Display for SpeakerBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakerBias::Cautious => f.write_str("cautious"),
            SpeakerBias::Confident => f.write_str("confident"),
        }
    }
}

/// Conditions drawn once per participant. Fields are private so the
/// assignment cannot change after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionAssignment {
    prediction_condition: u8,
    speaker_bias: SpeakerBias,
    lexical_balance: u8,
}

impl ConditionAssignment {
    pub const PREDICTION_CONDITIONS: [u8; 4] = [0, 1, 2, 3];

    pub fn new(
        prediction_condition: u8,
        speaker_bias: SpeakerBias,
        lexical_balance: u8,
    ) -> Result<Self> {
        if prediction_condition > 3 {
            return Err(ExperimentError::InvalidAssignment {
                field: "prediction_condition",
                value: prediction_condition,
                max: 3,
            });
        }
        if lexical_balance > 1 {
            return Err(ExperimentError::InvalidAssignment {
                field: "lexical_balance",
                value: lexical_balance,
                max: 1,
            });
        }
        Ok(Self {
            prediction_condition,
            speaker_bias,
            lexical_balance,
        })
    }

    /// Draws every condition with one `sample_without_replacement` call each.
    pub fn draw<R: Randomness>(rng: &mut R) -> Self {
        let prediction_condition = rng
            .sample_without_replacement(&Self::PREDICTION_CONDITIONS, 1)
            .first()
            .copied()
            .unwrap_or(0);
        let speaker_bias = rng
            .sample_without_replacement(&[SpeakerBias::Cautious, SpeakerBias::Confident], 1)
            .first()
            .copied()
            .unwrap_or(SpeakerBias::Cautious);
        let lexical_balance = rng
            .sample_without_replacement(&[0u8, 1], 1)
            .first()
            .copied()
            .unwrap_or(0);
        Self {
            prediction_condition,
            speaker_bias,
            lexical_balance,
        }
    }

    pub fn prediction_condition(&self) -> u8 {
        self.prediction_condition
    }

    pub fn speaker_bias(&self) -> SpeakerBias {
        self.speaker_bias
    }

    pub fn lexical_balance(&self) -> u8 {
        self.lexical_balance
    }

    /// Words the green and yellow aliens use for gumballs.
    pub fn lexicon(&self) -> (&'static str, &'static str) {
        if self.lexical_balance == 1 {
            ("candy", "sweets")
        } else {
            ("sweets", "candy")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gumbex_core::{RngRandomness, ScriptedRandomness};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn critical_polarity_flips_with_bias() {
        use UtteranceCategory::*;
        assert_eq!(SpeakerBias::Confident.critical_category(0.6, 0.6), Probably);
        assert_eq!(SpeakerBias::Confident.critical_category(0.5, 0.6), Might);
        assert_eq!(SpeakerBias::Cautious.critical_category(0.6, 0.6), Might);
        assert_eq!(SpeakerBias::Cautious.critical_category(0.5, 0.6), Probably);
    }

    #[test]
    fn bias_parses_labels() {
        assert_eq!("confident".parse::<SpeakerBias>(), Ok(SpeakerBias::Confident));
        assert_eq!(" Cautious ".parse::<SpeakerBias>(), Ok(SpeakerBias::Cautious));
        assert_eq!(
            "bold".parse::<SpeakerBias>(),
            Err(ExperimentError::UnknownCondition("bold".into()))
        );
        assert_eq!(SpeakerBias::Cautious.to_string(), "cautious");
    }

    #[test]
    fn assignment_rejects_out_of_range() {
        assert!(ConditionAssignment::new(4, SpeakerBias::Cautious, 0).is_err());
        assert!(ConditionAssignment::new(0, SpeakerBias::Cautious, 2).is_err());
        let a = ConditionAssignment::new(3, SpeakerBias::Confident, 1).unwrap();
        assert_eq!(a.prediction_condition(), 3);
        assert_eq!(a.lexicon(), ("candy", "sweets"));
    }

    #[test]
    fn scripted_draw_takes_first_candidates() {
        let a = ConditionAssignment::draw(&mut ScriptedRandomness::default());
        assert_eq!(a.prediction_condition(), 0);
        assert_eq!(a.speaker_bias(), SpeakerBias::Cautious);
        assert_eq!(a.lexical_balance(), 0);
        assert_eq!(a.lexicon(), ("sweets", "candy"));
    }

    #[test]
    fn random_draws_stay_in_range() {
        let mut rng = RngRandomness::new(ChaCha8Rng::seed_from_u64(99));
        let mut seen = [false; 4];
        for _ in 0..200 {
            let a = ConditionAssignment::draw(&mut rng);
            assert!(a.prediction_condition() <= 3);
            assert!(a.lexical_balance() <= 1);
            seen[a.prediction_condition() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
