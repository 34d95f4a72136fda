use sisyphus::{
    agent::{traits::QFunction, DqnAgent},
    config::DqnConfig,
    env::{Environment, MountainCar, Step},
    error::Result,
    trainer::{StopReason, Trainer},
};
use ndarray::{array, Array1};

/// Reward 1 for action 1, 0 otherwise; episodes last three steps.
struct PickOne {
    t: usize,
}

impl Environment for PickOne {
    fn state_size(&self) -> usize {
        2
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Array1<f32> {
        self.t = 0;
        array![0.0, 1.0]
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        self.t += 1;
        Ok(Step {
            next_state: array![self.t as f32 / 3.0, 1.0],
            reward: if action == 1 { 1.0 } else { 0.0 },
            done: self.t >= 3,
        })
    }
}

#[test]
fn test_end_to_end_training_on_mountain_car() {
    let config = DqnConfig {
        hidden_sizes: vec![16, 16],
        buffer_capacity: 200,
        batch_size: 16,
        max_episode_steps: 150,
        max_episodes: Some(4),
        stop_below_mean: 0.0,
        ..DqnConfig::default()
    };
    let env = MountainCar::new(config.seed);
    let agent = DqnAgent::from_config(&config, env.state_size(), env.num_actions()).unwrap();
    let mut trainer = Trainer::new(env, agent, &config);

    let mut scores = Vec::new();
    let summary = trainer.run_with(|report| scores.push(report.score)).unwrap();

    assert_eq!(summary.stop_reason, StopReason::EpisodeLimit);
    assert_eq!(scores.len(), 4);
    assert!(scores.iter().all(|&s| s >= 1 && s <= 150));

    let agent = trainer.agent();
    assert_eq!(agent.buffer().len(), 200);
    assert!(agent.train_steps() > 0);
    assert!(agent.epsilon() < 1.0);
    assert!(agent.epsilon() >= config.epsilon_min);
}

#[test]
fn test_agent_learns_to_prefer_rewarded_action() {
    let config = DqnConfig {
        hidden_sizes: vec![16, 16],
        buffer_capacity: 60,
        batch_size: 16,
        learning_rate: 0.01,
        discount_factor: 0.5,
        epsilon_decay: 0.97,
        epsilon_min: 0.3,
        max_episodes: Some(300),
        stop_below_mean: 0.0,
        seed: 17,
        ..DqnConfig::default()
    };
    let env = PickOne { t: 0 };
    let agent = DqnAgent::from_config(&config, 2, 2).unwrap();
    let mut trainer = Trainer::new(env, agent, &config);
    trainer.run().unwrap();

    let mut agent = trainer.into_agent();
    let q = agent.q_function_mut();
    for state in [array![0.0, 1.0], array![1.0 / 3.0, 1.0], array![2.0 / 3.0, 1.0]] {
        let values = q.predict(state.view()).unwrap();
        assert!(values[1] > values[0], "values for {:?} were {:?}", state, values);
    }
}
