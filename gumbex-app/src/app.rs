use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use gumbex_core::{Phase, RngRandomness, Token};
use gumbex_experiment::{
    ConditionAssignment, DesignConfig, Session, SpeakerBias, TrialConfig, TrialRecord,
    plan_session,
};
use gumbex_globe::{DEFAULT_SPEED, GlobeTuning, MotionSimulator, place};
use gumbex_timing::{CalibrationStats, FrameScheduler, HighPrecisionTimer, Timer};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub seed: Option<u64>,
    pub condition: Option<u8>,
    pub bias: Option<SpeakerBias>,
    pub lexical_balance: Option<u8>,
    pub ticks: u64,
    pub fps: Option<f64>,
    pub output: Option<PathBuf>,
}

/// Outcome of animating one globe screen.
#[derive(Debug, Clone, Serialize)]
pub struct GlobeRun {
    pub trial_index: usize,
    pub fallbacks: usize,
    pub frames: u64,
    pub final_tokens: Vec<Token>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub session: Session,
    pub records: Vec<TrialRecord>,
    pub globes: Vec<GlobeRun>,
    pub frame_stats: FrameStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameStats {
    pub frames: u64,
    pub average_frame_time_ms: f64,
    pub jitter_ms: f64,
    pub effective_fps: f64,
}

impl From<(&CalibrationStats, u64)> for FrameStats {
    fn from((stats, frames): (&CalibrationStats, u64)) -> Self {
        Self {
            frames,
            average_frame_time_ms: stats.average_frame_time_ns / 1_000_000.0,
            jitter_ms: stats.jitter_ns / 1_000_000.0,
            effective_fps: stats.effective_fps,
        }
    }
}

pub struct App {
    options: AppOptions,
    seed: u64,
    rng: RngRandomness<ChaCha8Rng>,
    scheduler: FrameScheduler,
    timer: HighPrecisionTimer,
    motion: MotionSimulator,
    tuning: GlobeTuning,
    design: DesignConfig,
}

impl App {
    pub fn new(options: AppOptions) -> Result<Self> {
        if let Some(fps) = options.fps {
            if !(fps.is_finite() && fps > 0.0) {
                bail!("--fps must be a positive number, got {fps}");
            }
        }
        let seed = options.seed.unwrap_or_else(|| rand::rng().random());
        let rng = RngRandomness::new(ChaCha8Rng::seed_from_u64(seed));

        Ok(Self {
            options,
            seed,
            rng,
            scheduler: FrameScheduler::new(),
            timer: HighPrecisionTimer::new(),
            motion: MotionSimulator::new(),
            tuning: GlobeTuning::default(),
            design: DesignConfig::default(),
        })
    }

    pub fn run(mut self) -> Result<()> {
        info!(seed = self.seed, "=== GUMBALL SESSION ===");

        let assignment = self.assign_conditions()?;
        let session = plan_session(&assignment, &self.design, &mut self.rng)?;
        let globes = self.animate_session(&session)?;

        let stats = self.timer.calibration_stats();
        let frame_stats = FrameStats::from((&stats, self.scheduler.frame_count()));
        info!(
            frames = frame_stats.frames,
            avg_ms = format_args!("{:.3}", frame_stats.average_frame_time_ms),
            jitter_ms = format_args!("{:.3}", frame_stats.jitter_ms),
            "animation finished"
        );

        let degraded = globes.iter().filter(|g| g.fallbacks > 0).count();
        if degraded > 0 {
            warn!(degraded, "some globes used centre fallback placements");
        }

        let report = RunReport {
            seed: self.seed,
            records: session.records(),
            session,
            globes,
            frame_stats,
        };
        self.write_report(&report)
    }

    /// Draws the participant's conditions once; command-line values win.
    fn assign_conditions(&mut self) -> Result<ConditionAssignment> {
        let drawn = ConditionAssignment::draw(&mut self.rng);
        let assignment = ConditionAssignment::new(
            self.options.condition.unwrap_or(drawn.prediction_condition()),
            self.options.bias.unwrap_or(drawn.speaker_bias()),
            self.options.lexical_balance.unwrap_or(drawn.lexical_balance()),
        )?;
        info!(
            prediction_condition = assignment.prediction_condition(),
            speaker_condition = %assignment.speaker_bias(),
            lexical_balance = assignment.lexical_balance(),
            "conditions assigned"
        );
        Ok(assignment)
    }

    fn animate_session(&mut self, session: &Session) -> Result<Vec<GlobeRun>> {
        let budget = self.options.fps.map(|fps| Duration::from_secs_f64(1.0 / fps));
        let mut runs = Vec::new();
        let mut index = 0;

        for block in &session.blocks {
            info!(block = %block.label, kind = ?block.kind, screens = block.screens.len(), "block");
            for trial in block.trials() {
                if block.kind.shows_globe() && trial.has_tokens() {
                    runs.push(self.animate_trial(index, trial, budget)?);
                }
                index += 1;
            }
        }
        Ok(runs)
    }

    fn animate_trial(
        &mut self,
        index: usize,
        trial: &TrialConfig,
        budget: Option<Duration>,
    ) -> Result<GlobeRun> {
        let placement = place(
            trial.count_class_a as usize,
            trial.count_class_b as usize,
            &self.tuning,
            &mut self.rng,
        )
        .with_context(|| format!("placing gumballs for trial {index}"))?;

        let container = Some(self.tuning.container());
        let handle = self.motion.start(
            &placement.tokens,
            container,
            DEFAULT_SPEED,
            &mut self.rng,
            &mut self.scheduler,
        );
        self.scheduler
            .run_frames(self.options.ticks, &mut self.timer, budget);
        let final_tokens = match handle {
            Some(handle) => {
                self.motion.stop(&handle, &mut self.scheduler);
                handle.tokens()
            }
            None => Vec::new(),
        };

        debug!(
            trial = index,
            header = %trial.header_text,
            a = trial.count_class_a,
            b = trial.count_class_b,
            fallbacks = placement.fallbacks,
            "globe animated"
        );

        Ok(GlobeRun {
            trial_index: index,
            fallbacks: placement.fallbacks,
            frames: self.options.ticks,
            final_tokens,
        })
    }

    fn write_report(&self, report: &RunReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        match &self.options.output {
            Some(path) => {
                fs::write(path, json)
                    .with_context(|| format!("writing report to {}", path.display()))?;
                info!(path = %path.display(), "report saved");
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(condition: u8, output: PathBuf) -> AppOptions {
        AppOptions {
            seed: Some(5),
            condition: Some(condition),
            bias: Some(SpeakerBias::Confident),
            lexical_balance: Some(1),
            ticks: 3,
            fps: None,
            output: Some(output),
        }
    }

    #[test]
    fn baseline_run_writes_report() {
        let path = std::env::temp_dir().join(format!("gumbex-report-{}.json", std::process::id()));
        App::new(options(0, path.clone())).unwrap().run().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();
        let report: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(report["seed"], 5);
        assert_eq!(report["session"]["assignment"]["prediction_condition"], 0);
        // 6 + 4 intro, 1 lead-in, 27 prediction
        assert_eq!(report["records"].as_array().unwrap().len(), 38);
        // machine intro screens and prediction rows carry gumballs
        let globes = report["globes"].as_array().unwrap();
        assert_eq!(globes.len(), 31);
        assert!(globes.iter().all(|g| g["frames"] == 3));
        assert_eq!(report["frame_stats"]["frames"], 93);
    }

    #[test]
    fn same_seed_same_session() {
        let dir = std::env::temp_dir();
        let a = dir.join(format!("gumbex-a-{}.json", std::process::id()));
        let b = dir.join(format!("gumbex-b-{}.json", std::process::id()));
        App::new(options(2, a.clone())).unwrap().run().unwrap();
        App::new(options(2, b.clone())).unwrap().run().unwrap();

        let ra: serde_json::Value = serde_json::from_str(&fs::read_to_string(&a).unwrap()).unwrap();
        let rb: serde_json::Value = serde_json::from_str(&fs::read_to_string(&b).unwrap()).unwrap();
        fs::remove_file(&a).ok();
        fs::remove_file(&b).ok();
        assert_eq!(ra["session"], rb["session"]);
        assert_eq!(ra["globes"], rb["globes"]);
    }

    #[test]
    fn rejects_bad_frame_rate() {
        let mut o = options(0, PathBuf::from("unused.json"));
        o.fps = Some(0.0);
        assert!(App::new(o).is_err());
    }
}
