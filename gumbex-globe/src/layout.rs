use gumbex_core::{Container, Point, Randomness, Token, TokenClass};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GlobeError, Result};

/// Hard ceiling on tokens per globe; anything above is a caller bug.
pub const MAX_TOKENS: usize = 10_000;

const GLOBE_CENTER: Point = Point::new(50.0, 50.0);

/// Geometry knobs for placing gumballs, in percent of the globe width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobeTuning {
    pub token_radius: f64,
    /// How far inside the globe rim tokens must stay
    pub edge_margin: f64,
    /// 1.0 = tokens may touch, >1 leaves a gap
    pub separation_factor: f64,
    pub max_attempts: u32,
}

impl Default for GlobeTuning {
    fn default() -> Self {
        Self {
            token_radius: 5.0,
            edge_margin: 4.0,
            separation_factor: 1.2,
            max_attempts: 200,
        }
    }
}

impl GlobeTuning {
    pub fn container(&self) -> Container {
        Container {
            center: GLOBE_CENTER,
            radius: 50.0 - self.edge_margin - self.token_radius,
        }
    }

    /// Minimum distance between two token centres.
    pub fn min_separation(&self) -> f64 {
        2.0 * self.token_radius * self.separation_factor
    }

    fn validate(&self) -> Result<()> {
        if !(self.token_radius >= 0.0 && self.token_radius < 50.0) {
            return Err(GlobeError::InvalidTuning(format!(
                "token radius {}",
                self.token_radius
            )));
        }
        if !(self.edge_margin.is_finite() && self.container().radius > 0.0) {
            return Err(GlobeError::InvalidTuning(format!(
                "effective radius {}",
                self.container().radius
            )));
        }
        if !(self.separation_factor >= 0.0) {
            return Err(GlobeError::InvalidTuning(format!(
                "separation factor {}",
                self.separation_factor
            )));
        }
        Ok(())
    }
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Class A tokens first, then class B.
    pub tokens: Vec<Token>,
    /// Tokens that ran out of attempts and were dropped at the centre.
    pub fallbacks: usize,
}

impl Placement {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.fallbacks > 0
    }

    pub fn count(&self, class: TokenClass) -> usize {
        self.tokens.iter().filter(|t| t.class == class).count()
    }
}

/// Places `count_a` class A and `count_b` class B tokens inside the globe by
/// rejection sampling.
///
/// A token that cannot find a free spot within `max_attempts` candidates is
/// put at the exact centre and counted in [`Placement::fallbacks`]; crowding
/// degrades the layout rather than failing it.
pub fn place<R: Randomness>(
    count_a: usize,
    count_b: usize,
    tuning: &GlobeTuning,
    rng: &mut R,
) -> Result<Placement> {
    tuning.validate()?;
    let requested = count_a.saturating_add(count_b);
    if requested > MAX_TOKENS {
        return Err(GlobeError::TooManyTokens {
            requested,
            max: MAX_TOKENS,
        });
    }

    let container = tuning.container();
    let mut tokens: Vec<Token> = Vec::with_capacity(requested);
    let mut fallbacks = 0;

    let classes = std::iter::repeat_n(TokenClass::ClassA, count_a)
        .chain(std::iter::repeat_n(TokenClass::ClassB, count_b));
    for class in classes {
        let position = match sample_position(&tokens, tuning, &container, rng) {
            Some(p) => p,
            None => {
                fallbacks += 1;
                debug!(index = tokens.len(), ?class, "no free spot, placing at centre");
                container.center
            }
        };
        tokens.push(Token { position, class });
    }

    if fallbacks > 0 {
        warn!(
            fallbacks,
            requested, "degraded placement: tokens stacked at globe centre"
        );
    }

    Ok(Placement { tokens, fallbacks })
}

/// Like [`place`] but accepts signed counts, rejecting negatives.
pub fn place_signed<R: Randomness>(
    count_a: i64,
    count_b: i64,
    tuning: &GlobeTuning,
    rng: &mut R,
) -> Result<Placement> {
    let a = usize::try_from(count_a).map_err(|_| GlobeError::InvalidCount {
        class: "class A",
        count: count_a,
    })?;
    let b = usize::try_from(count_b).map_err(|_| GlobeError::InvalidCount {
        class: "class B",
        count: count_b,
    })?;
    place(a, b, tuning, rng)
}

fn sample_position<R: Randomness>(
    placed: &[Token],
    tuning: &GlobeTuning,
    container: &Container,
    rng: &mut R,
) -> Option<Point> {
    let r = tuning.token_radius;
    let span = 100.0 - 2.0 * r;
    let min_sep = tuning.min_separation();

    for _ in 0..tuning.max_attempts {
        let candidate = Point::new(r + rng.uniform() * span, r + rng.uniform() * span);

        if !container.contains(&candidate) {
            continue;
        }
        if placed
            .iter()
            .all(|t| t.position.distance(&candidate) >= min_sep)
        {
            return Some(candidate);
        }
    }
    None
}
