use gumbex_core::{BlockKind, Gender, Phase, Randomness, SpeakerGroup, TokenClass};
use serde::Serialize;
use tracing::info;

use crate::config::{ConditionAssignment, DesignConfig};
use crate::design::{Speaker, build_condition_design, build_speaker_sweep};
use crate::error::Result;
use crate::response::TrialRecord;
use crate::trial::{TrialConfig, info_screen};

const GREEN_SPEAKERS: [&str; 4] = ["brian", "jessica", "liam", "river"];
const YELLOW_SPEAKERS: [&str; 4] = ["patrick", "megan", "darren", "laura"];

const EXPOSURE_THRESHOLD: f64 = 0.6;

/// Marker shown on the same-speaker lead-in screens.
const LEAD_IN_MARKER: u8 = 3;

/// Alien introducing itself with its word for gumballs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollCallEntry {
    pub color: SpeakerGroup,
    pub idx: u8,
    pub speaker_id: String,
    pub word: String,
    pub audio_ref: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Globe(TrialConfig),
    RollCall(RollCallEntry),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub label: String,
    pub screens: Vec<Screen>,
}

impl Block {
    fn globe(kind: BlockKind, label: &str, trials: Vec<TrialConfig>) -> Self {
        Self {
            kind,
            label: label.to_string(),
            screens: trials.into_iter().map(Screen::Globe).collect(),
        }
    }

    pub fn trials(&self) -> impl Iterator<Item = &TrialConfig> {
        self.screens.iter().filter_map(|s| match s {
            Screen::Globe(t) => Some(t),
            Screen::RollCall(_) => None,
        })
    }
}

/// Ordered blocks for one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub assignment: ConditionAssignment,
    pub blocks: Vec<Block>,
}

impl Session {
    pub fn screen_count(&self) -> usize {
        self.blocks.iter().map(|b| b.screens.len()).sum()
    }

    pub fn prediction_trials(&self) -> impl Iterator<Item = &TrialConfig> {
        self.blocks
            .iter()
            .filter(|b| b.kind.is_prediction())
            .flat_map(Block::trials)
    }

    /// Every globe screen as an export row, numbered in presentation order.
    pub fn records(&self) -> Vec<TrialRecord> {
        self.blocks
            .iter()
            .flat_map(|b| b.trials().map(move |t| (b.kind, t)))
            .enumerate()
            .map(|(i, (kind, t))| TrialRecord::new(i, kind, t.clone()))
            .collect()
    }

    /// True when the non-intro blocks only move forward through the stages.
    pub fn follows_stage_order(&self) -> bool {
        let mut stages = self.blocks.iter().map(|b| b.kind).filter(|k| *k != BlockKind::Intro);
        let Some(mut prev) = stages.next() else {
            return true;
        };
        stages.all(|kind| {
            let reachable = std::iter::successors(prev.next(), BlockKind::next).any(|k| k == kind);
            prev = kind;
            reachable
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Green aliens first, then yellow, each saying its group's word.
pub fn build_roll_call(green_word: &str, yellow_word: &str) -> Vec<RollCallEntry> {
    let mut all = roll_call_group(SpeakerGroup::Green, &GREEN_SPEAKERS, green_word);
    all.extend(roll_call_group(SpeakerGroup::Yellow, &YELLOW_SPEAKERS, yellow_word));
    all
}

fn roll_call_group(color: SpeakerGroup, speakers: &[&str], word: &str) -> Vec<RollCallEntry> {
    speakers
        .iter()
        .zip(1u8..)
        .map(|(speaker, idx)| RollCallEntry {
            color,
            idx,
            speaker_id: speaker.to_string(),
            word: word.to_string(),
            audio_ref: format!("audio/{speaker}/{word}.mp3"),
        })
        .collect()
}

/// Speaker and threshold of the prediction block for each condition:
/// 0 baseline, 1 new yellow speaker, 2 new green speaker, 3 the exposure group's
/// second green speaker.
fn prediction_speaker(condition: u8) -> (Speaker, f64) {
    match condition {
        0 => (Speaker::new("sarah", Gender::Female, 6), 0.41),
        1 => (Speaker::new("will", Gender::Male, 7), 0.41),
        2 => (Speaker::new("liam", Gender::Male, 3), 0.41),
        _ => (Speaker::new("jessica", Gender::Female, 2), 0.31),
    }
}

fn intro_planet(green_word: &str, yellow_word: &str) -> Vec<TrialConfig> {
    [
        "Here is a planet in outer space.".to_string(),
        "These green aliens live here.".to_string(),
        "These yellow aliens are visiting from another planet.".to_string(),
        format!("On the green alien planet, they call gumballs {green_word}."),
        format!("On the yellow alien planet, they call gumballs {yellow_word}."),
        "All of these aliens like gumballs.".to_string(),
    ]
    .iter()
    .map(|h| info_screen(h, 0, 0, 0))
    .collect()
}

fn intro_machine() -> Vec<TrialConfig> {
    [
        ("Every day, new gumballs are delivered to their gumball machine.", 0),
        ("And the aliens get to take one out and add it to their collection.", 0),
        ("One of the aliens goes up to check what is in the machine.", 1),
        ("He says whether he thinks the aliens will get a blue gumball that day.", 1),
    ]
    .iter()
    .map(|&(header, marker)| info_screen(header, 15, 15, marker))
    .collect()
}

fn pre_prediction(condition: u8, speaker: &Speaker) -> Vec<TrialConfig> {
    let pronoun = speaker.gender.subject_pronoun();
    if condition == 3 {
        let going = match speaker.gender {
            Gender::Other => "are",
            Gender::Male | Gender::Female => "is",
        };
        vec![
            info_screen("You have now seen this alien talk for a while.", 0, 0, LEAD_IN_MARKER),
            info_screen(
                &format!("Now, you will guess what {pronoun} {going} going to say."),
                0,
                0,
                LEAD_IN_MARKER,
            ),
        ]
    } else {
        vec![info_screen(
            &format!("Next, you will see a new alien, and you will guess what {pronoun} will say."),
            0,
            0,
            0,
        )]
    }
}

/// Lays out the whole session for `assignment`.
///
/// Conditions 1-3 first expose the participant to a biased speaker; every
/// condition ends with a prediction sweep for a speaker picked by the
/// condition.
pub fn plan_session<R: Randomness>(
    assignment: &ConditionAssignment,
    config: &DesignConfig,
    rng: &mut R,
) -> Result<Session> {
    let condition = assignment.prediction_condition();
    let (green_word, yellow_word) = assignment.lexicon();

    let mut blocks = vec![
        Block::globe(BlockKind::Intro, "intro_planet", intro_planet(green_word, yellow_word)),
        Block {
            kind: BlockKind::RollCall,
            label: "alien_intro".to_string(),
            screens: build_roll_call(green_word, yellow_word)
                .into_iter()
                .map(Screen::RollCall)
                .collect(),
        },
        Block::globe(BlockKind::Intro, "intro_machine", intro_machine()),
    ];

    if condition != 0 {
        let exposure_speaker = Speaker::new("brian", Gender::Male, 1);
        blocks.push(Block::globe(
            BlockKind::Intro,
            "first_speaker",
            vec![info_screen("Let's see what the first one says.", 15, 15, 1)],
        ));
        blocks.push(Block::globe(
            BlockKind::Exposure,
            "exposure",
            build_condition_design(
                assignment.speaker_bias(),
                &exposure_speaker,
                TokenClass::ClassB,
                EXPOSURE_THRESHOLD,
                config,
                rng,
            )?,
        ));
    }

    let (speaker, threshold) = prediction_speaker(condition);
    blocks.push(Block::globe(
        BlockKind::Intro,
        "pre_prediction",
        pre_prediction(condition, &speaker),
    ));
    blocks.push(Block::globe(
        BlockKind::Prediction,
        "prediction",
        build_speaker_sweep(&speaker, threshold, config, rng)?,
    ));

    let session = Session {
        assignment: *assignment,
        blocks,
    };
    debug_assert!(session.follows_stage_order());
    info!(
        condition,
        bias = %assignment.speaker_bias(),
        lexical_balance = assignment.lexical_balance(),
        blocks = session.blocks.len(),
        screens = session.screen_count(),
        prediction_speaker = %speaker.id,
        "session planned"
    );
    Ok(session)
}
