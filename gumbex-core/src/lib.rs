pub mod phase;
pub mod random;
pub mod token;
pub mod trial;

pub use phase::{BlockKind, Phase};
pub use random::{Randomness, RngRandomness, ScriptedRandomness};
pub use token::{Container, Point, Token, TokenClass};
pub use trial::{Gender, SpeakerGroup, UtteranceCategory};
