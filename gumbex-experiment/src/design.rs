//! Randomized trial lists for exposure and prediction blocks.
//!
//! Both builders are pure apart from the injected [`Randomness`]: the rows are
//! assembled in a fixed order and the final ordering comes from one shuffle.

use gumbex_core::{Gender, Randomness, TokenClass, UtteranceCategory};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DesignConfig, SpeakerBias};
use crate::error::{ExperimentError, Result};
use crate::trial::{TrialConfig, TrialSpec, make_trial_config};

/// (class A, class B) counts for the prediction sweep:
/// 0%, 10%, 25%, 40%, 50%, 60%, 75%, 90% and 100% class B out of 30.
pub const RATIO_TABLE: [(u32, u32); 9] = [
    (30, 0),
    (27, 3),
    (23, 7),
    (18, 12),
    (15, 15),
    (12, 18),
    (7, 23),
    (3, 27),
    (0, 30),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// Folder name of the speaker's recordings
    pub id: String,
    pub gender: Gender,
    pub marker: u8,
}

impl Speaker {
    pub fn new(id: &str, gender: Gender, marker: u8) -> Self {
        Self {
            id: id.to_string(),
            gender,
            marker,
        }
    }
}

fn check_threshold(threshold: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ExperimentError::InvalidThreshold(threshold))
    }
}

/// Prediction block: every ratio of [`RATIO_TABLE`] repeated
/// `sweep_repetitions` times, shuffled.
///
/// `threshold` is the speaker's own cut-off; it is recorded on each row but
/// does not change which machines are shown. It must lie in `0..=1`.
pub fn build_speaker_sweep<R: Randomness>(
    speaker: &Speaker,
    threshold: f64,
    config: &DesignConfig,
    rng: &mut R,
) -> Result<Vec<TrialConfig>> {
    let threshold = check_threshold(threshold)?;
    let header = speaker.gender.pronoun_phrase();
    let base: Vec<TrialConfig> = RATIO_TABLE
        .iter()
        .map(|&(a, b)| TrialConfig {
            count_class_a: a,
            count_class_b: b,
            special_marker: speaker.marker,
            header_text: header.to_string(),
            audio_ref: None,
            utterance_category: None,
            target_class: TokenClass::ClassB,
            proportion_target_class: f64::from(b) / f64::from(a + b),
            speaker_id: Some(speaker.id.clone()),
            speaker_gender: Some(speaker.gender),
            speaker_threshold: Some(threshold),
        })
        .collect();

    let mut rows: Vec<TrialConfig> = std::iter::repeat_n(&base, config.sweep_repetitions)
        .flatten()
        .cloned()
        .collect();
    rng.shuffle(&mut rows);

    debug!(speaker = %speaker.id, rows = rows.len(), "speaker sweep built");
    Ok(rows)
}

/// Exposure block for a speaker with the given bias.
///
/// Critical rows sit at `threshold` and are labelled by comparing the row's
/// proportion to the same `threshold`, so they all share one category.
/// Fillers are fixed: bare statements about full machines plus hedged
/// statements at the bias's off-threshold proportion.
///
/// Fails with [`ExperimentError::InvalidThreshold`] unless `threshold` is a
/// proportion in `0..=1`.
pub fn build_condition_design<R: Randomness>(
    bias: SpeakerBias,
    speaker: &Speaker,
    target: TokenClass,
    threshold: f64,
    config: &DesignConfig,
    rng: &mut R,
) -> Result<Vec<TrialConfig>> {
    let threshold = check_threshold(threshold)?;
    let row = |proportion: f64, category: UtteranceCategory| {
        make_trial_config(&TrialSpec {
            proportion,
            total: config.total,
            target,
            category,
            speaker_id: &speaker.id,
            gender: speaker.gender,
            marker: speaker.marker,
            speaker_threshold: Some(threshold),
        })
    };

    let critical = bias.critical_category(threshold, threshold);
    let (hedge_proportion, hedge_category) = bias.hedge_filler();

    let mut rows = Vec::with_capacity(config.condition_rows());
    rows.extend((0..config.critical_rows).map(|_| row(threshold, critical)));
    rows.extend((0..config.certain_fillers).map(|_| row(1.0, UtteranceCategory::Bare)));
    rows.extend((0..config.hedge_fillers).map(|_| row(hedge_proportion, hedge_category)));
    rng.shuffle(&mut rows);

    debug!(
        %bias,
        speaker = %speaker.id,
        ?critical,
        rows = rows.len(),
        "condition design built"
    );
    Ok(rows)
}
