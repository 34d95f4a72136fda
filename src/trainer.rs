//! # Training loop
//!
//! Drives episodes against an [`Environment`] inside a wall-clock budget,
//! feeding every transition to the agent and calling `learn` after each step.
//! After each episode the score (steps survived) enters a rolling window; the
//! run stops as soon as the window mean is *below* the configured threshold.

use std::time::{Duration, Instant};

use crate::agent::traits::QFunction;
use crate::agent::DqnAgent;
use crate::config::DqnConfig;
use crate::env::Environment;
use crate::error::Result;
use crate::metrics::ScoreWindow;
use crate::replay_buffer::Experience;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopReason {
    /// The wall-clock budget ran out
    TimeBudget,
    /// The optional episode cap was reached
    EpisodeLimit,
    /// The rolling mean score dropped below the threshold
    LowAverage { episode: usize, mean: f32 },
}

/// What happened during one episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    pub episode: usize,
    pub score: usize,
    pub epsilon: f32,
    /// Mean of the learning-step losses, `None` if no learning step ran
    pub mean_loss: Option<f32>,
    pub window_mean: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

pub struct Trainer<E: Environment, Q: QFunction> {
    env: E,
    agent: DqnAgent<Q>,
    window: ScoreWindow,
    max_episode_steps: usize,
    stop_below_mean: f32,
    time_budget: Duration,
    max_episodes: Option<usize>,
    episode: usize,
}

impl<E: Environment, Q: QFunction> Trainer<E, Q> {
    pub fn new(env: E, agent: DqnAgent<Q>, config: &DqnConfig) -> Self {
        let window = match config.window_sentinel {
            Some(sentinel) => ScoreWindow::with_sentinel(config.score_window, sentinel),
            None => ScoreWindow::new(config.score_window),
        };
        Trainer {
            env,
            agent,
            window,
            max_episode_steps: config.max_episode_steps,
            stop_below_mean: config.stop_below_mean,
            time_budget: config.time_budget(),
            max_episodes: config.max_episodes,
            episode: 0,
        }
    }

    /// Plays one episode to completion or to the step cap.
    /// Returns the score (steps taken) and the mean loss of the learning steps
    /// that ran during the episode.
    pub fn run_episode(&mut self) -> Result<(usize, Option<f32>)> {
        let mut state = self.env.reset();
        let mut score = 0;
        let mut loss_sum = 0.0;
        let mut loss_count = 0usize;

        loop {
            score += 1;
            let action = self.agent.act(state.view())?;
            let step = self.env.step(action)?;
            let done = step.done;

            self.agent.observe(Experience {
                state,
                action,
                reward: step.reward,
                next_state: step.next_state.clone(),
                done,
            });
            state = step.next_state;

            if let Some(loss) = self.agent.learn()? {
                loss_sum += loss;
                loss_count += 1;
            }

            if done || score >= self.max_episode_steps {
                break;
            }
        }

        let mean_loss = (loss_count > 0).then(|| loss_sum / loss_count as f32);
        Ok((score, mean_loss))
    }

    /// Books a finished episode and applies the stopping rule.
    pub fn on_episode_end(&mut self, score: usize) -> Option<StopReason> {
        self.episode += 1;
        self.window.push(score as f32);
        let mean = self.window.mean().unwrap_or(score as f32);

        if mean < self.stop_below_mean {
            return Some(StopReason::LowAverage { episode: self.episode, mean });
        }
        None
    }

    /// Runs episodes until the time budget, the episode cap or the stopping rule ends the run.
    pub fn run(&mut self) -> Result<TrainingSummary> {
        self.run_with(|_| {})
    }

    /// Like [`Trainer::run`], calling `on_episode` after every finished episode.
    pub fn run_with<F: FnMut(&EpisodeReport)>(&mut self, mut on_episode: F) -> Result<TrainingSummary> {
        let start = Instant::now();

        let stop_reason = loop {
            if start.elapsed() >= self.time_budget {
                break StopReason::TimeBudget;
            }
            if self.max_episodes.map_or(false, |cap| self.episode >= cap) {
                break StopReason::EpisodeLimit;
            }

            let (score, mean_loss) = self.run_episode()?;
            let stop = self.on_episode_end(score);

            let report = EpisodeReport {
                episode: self.episode,
                score,
                epsilon: self.agent.epsilon(),
                mean_loss,
                window_mean: self.window.mean().unwrap_or(score as f32),
            };
            tracing::info!(
                episode = report.episode,
                epsilon = format_args!("{:.5}", report.epsilon),
                score = report.score,
                "episode finished"
            );
            on_episode(&report);

            if let Some(reason) = stop {
                break reason;
            }
        };

        let summary = TrainingSummary {
            episodes: self.episode,
            stop_reason,
            elapsed: start.elapsed(),
        };
        tracing::info!(episodes = summary.episodes, reason = ?summary.stop_reason, "training stopped");
        Ok(summary)
    }

    pub fn episode(&self) -> usize {
        self.episode
    }

    pub fn window(&self) -> &ScoreWindow {
        &self.window
    }

    pub fn agent(&self) -> &DqnAgent<Q> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut DqnAgent<Q> {
        &mut self.agent
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn into_agent(self) -> DqnAgent<Q> {
        self.agent
    }
}
