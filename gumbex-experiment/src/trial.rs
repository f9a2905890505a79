use gumbex_core::{Gender, SpeakerGroup, TokenClass, UtteranceCategory};
use serde::{Deserialize, Serialize};

/// One screen's stimulus parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialConfig {
    pub count_class_a: u32,
    pub count_class_b: u32,
    /// Alien singled out on screen, 0 for none
    pub special_marker: u8,
    pub header_text: String,
    pub audio_ref: Option<String>,
    pub utterance_category: Option<UtteranceCategory>,
    pub target_class: TokenClass,
    /// Proportion the row was designed for
    pub proportion_target_class: f64,
    pub speaker_id: Option<String>,
    pub speaker_gender: Option<Gender>,
    pub speaker_threshold: Option<f64>,
}

impl TrialConfig {
    pub fn total(&self) -> u32 {
        self.count_class_a + self.count_class_b
    }

    pub fn count_target(&self) -> u32 {
        match self.target_class {
            TokenClass::ClassA => self.count_class_a,
            TokenClass::ClassB => self.count_class_b,
        }
    }

    pub fn count_other(&self) -> u32 {
        self.total() - self.count_target()
    }

    /// Share of target tokens actually on screen, after rounding.
    pub fn realized_proportion(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.count_target()) / f64::from(total),
        }
    }

    pub fn speaker_group(&self) -> Option<SpeakerGroup> {
        SpeakerGroup::from_marker(self.special_marker)
    }

    pub fn has_tokens(&self) -> bool {
        self.total() > 0
    }
}

/// Splits `total` tokens into (target, other) at `proportion`.
///
/// Rounds half away from zero (`f64::round`), so 7.5 becomes 8; the two
/// counts always add up to `total`.
pub fn split_counts(total: u32, proportion: f64) -> (u32, u32) {
    let p = proportion.clamp(0.0, 1.0);
    let target = (f64::from(total) * p).round() as u32;
    let target = target.min(total);
    (target, total - target)
}

/// Inputs for a speaker statement row
#[derive(Debug, Clone)]
pub struct TrialSpec<'a> {
    pub proportion: f64,
    pub total: u32,
    pub target: TokenClass,
    pub category: UtteranceCategory,
    pub speaker_id: &'a str,
    pub gender: Gender,
    pub marker: u8,
    pub speaker_threshold: Option<f64>,
}

pub fn make_trial_config(spec: &TrialSpec<'_>) -> TrialConfig {
    let (target, other) = split_counts(spec.total, spec.proportion);
    let (count_class_a, count_class_b) = match spec.target {
        TokenClass::ClassA => (target, other),
        TokenClass::ClassB => (other, target),
    };

    TrialConfig {
        count_class_a,
        count_class_b,
        special_marker: spec.marker,
        header_text: spec
            .category
            .text(spec.gender.pronoun_phrase(), spec.target.colour_name()),
        audio_ref: Some(spec.category.audio_ref(spec.speaker_id)),
        utterance_category: Some(spec.category),
        target_class: spec.target,
        proportion_target_class: spec.proportion.clamp(0.0, 1.0),
        speaker_id: Some(spec.speaker_id.to_string()),
        speaker_gender: Some(spec.gender),
        speaker_threshold: spec.speaker_threshold,
    }
}

/// Narration screen without a speaker statement.
pub fn info_screen(
    header: &str,
    count_class_a: u32,
    count_class_b: u32,
    marker: u8,
) -> TrialConfig {
    let total = count_class_a + count_class_b;
    TrialConfig {
        count_class_a,
        count_class_b,
        special_marker: marker,
        header_text: header.to_string(),
        audio_ref: None,
        utterance_category: None,
        target_class: TokenClass::ClassB,
        proportion_target_class: if total == 0 {
            0.0
        } else {
            f64::from(count_class_b) / f64::from(total)
        },
        speaker_id: None,
        speaker_gender: None,
        speaker_threshold: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(proportion: f64, target: TokenClass) -> TrialSpec<'static> {
        TrialSpec {
            proportion,
            total: 30,
            target,
            category: UtteranceCategory::Might,
            speaker_id: "brian",
            gender: Gender::Male,
            marker: 1,
            speaker_threshold: Some(0.6),
        }
    }

    #[test]
    fn split_rounds_half_away_from_zero() {
        assert_eq!(split_counts(30, 0.6), (18, 12));
        assert_eq!(split_counts(30, 0.31), (9, 21));
        assert_eq!(split_counts(30, 0.25), (8, 22));
        assert_eq!(split_counts(30, 0.9), (27, 3));
        assert_eq!(split_counts(30, 1.0), (30, 0));
        assert_eq!(split_counts(30, 0.0), (0, 30));
    }

    #[test]
    fn split_clamps_out_of_range() {
        assert_eq!(split_counts(30, 1.7), (30, 0));
        assert_eq!(split_counts(30, -0.2), (0, 30));
        assert_eq!(split_counts(0, 0.5), (0, 0));
    }

    #[test]
    fn counts_always_sum_to_total() {
        for i in 0..=100 {
            let (t, o) = split_counts(30, f64::from(i) / 100.0);
            assert_eq!(t + o, 30);
        }
    }

    #[test]
    fn target_class_decides_which_count_is_target() {
        let b = make_trial_config(&spec(0.6, TokenClass::ClassB));
        assert_eq!((b.count_class_a, b.count_class_b), (12, 18));
        assert_eq!(b.count_target(), 18);

        let a = make_trial_config(&spec(0.6, TokenClass::ClassA));
        assert_eq!((a.count_class_a, a.count_class_b), (18, 12));
        assert_eq!(a.count_other(), 12);
        assert_eq!(a.header_text, "He says, \"We might get a green one.\"");
    }

    #[test]
    fn statement_rows_carry_speaker_metadata() {
        let t = make_trial_config(&spec(0.25, TokenClass::ClassB));
        assert_eq!(t.audio_ref.as_deref(), Some("audio/brian/might.mp3"));
        assert_eq!(t.speaker_id.as_deref(), Some("brian"));
        assert_eq!(t.speaker_group(), Some(SpeakerGroup::Green));
        assert_eq!(t.proportion_target_class, 0.25);
        assert!((t.realized_proportion() - 8.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn info_screens_have_no_statement() {
        let t = info_screen("Here is a planet in outer space.", 0, 0, 0);
        assert!(!t.has_tokens());
        assert_eq!(t.utterance_category, None);
        assert_eq!(t.audio_ref, None);
        assert_eq!(t.realized_proportion(), 0.0);
        assert_eq!(t.speaker_group(), None);

        let t = info_screen("Machine", 15, 15, 1);
        assert_eq!(t.proportion_target_class, 0.5);
    }
}
