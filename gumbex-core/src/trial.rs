use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Lead-in for the speaker's quoted statement.
    pub fn pronoun_phrase(&self) -> &'static str {
        match self {
            Gender::Female => "She says",
            Gender::Male => "He says",
            Gender::Other => "They say",
        }
    }

    pub fn subject_pronoun(&self) -> &'static str {
        match self {
            Gender::Female => "she",
            Gender::Male => "he",
            Gender::Other => "they",
        }
    }
}

/// What the speaker says about the next gumball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UtteranceCategory {
    Bare,
    Might,
    Probably,
}

impl UtteranceCategory {
    pub fn text(&self, pronoun_phrase: &str, colour: &str) -> String {
        match self {
            UtteranceCategory::Bare => {
                format!("{pronoun_phrase}, \"We will get a {colour} one.\"")
            }
            UtteranceCategory::Might => {
                format!("{pronoun_phrase}, \"We might get a {colour} one.\"")
            }
            UtteranceCategory::Probably => {
                format!("{pronoun_phrase}, \"We will probably get a {colour} one.\"")
            }
        }
    }

    pub fn audio_ref(&self, speaker_id: &str) -> String {
        let file = match self {
            UtteranceCategory::Bare => "bare",
            UtteranceCategory::Might => "might",
            UtteranceCategory::Probably => "probably",
        };
        format!("audio/{speaker_id}/{file}.mp3")
    }
}

/// Alien group a speaker belongs to, derived from the special marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerGroup {
    Green,
    Yellow,
}

impl SpeakerGroup {
    /// Markers 1-5 are green aliens, 6-10 yellow; 0 means no speaker.
    pub fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            1..=5 => Some(SpeakerGroup::Green),
            6..=10 => Some(SpeakerGroup::Yellow),
            _ => None,
        }
    }
}
