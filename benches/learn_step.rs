//! Cost of a single replay learning step with the reference network size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sisyphus::agent::DqnAgent;
use sisyphus::config::DqnConfig;
use sisyphus::env::{Environment, MountainCar};
use sisyphus::replay_buffer::Experience;

fn filled_agent(capacity: usize) -> DqnAgent {
    let config = DqnConfig {
        buffer_capacity: capacity,
        ..DqnConfig::default()
    };
    let mut env = MountainCar::new(config.seed);
    let mut agent = DqnAgent::from_config(&config, env.state_size(), env.num_actions()).unwrap();

    let mut state = env.reset();
    for i in 0..capacity {
        let action = i % 3;
        let step = env.step(action).unwrap();
        agent.observe(Experience {
            state,
            action,
            reward: step.reward,
            next_state: step.next_state.clone(),
            done: step.done,
        });
        state = if step.done { env.reset() } else { step.next_state };
    }
    agent
}

fn bench_learn(c: &mut Criterion) {
    let mut agent = filled_agent(1_000);
    c.bench_function("learn_batch_32", |b| {
        b.iter(|| black_box(agent.learn().unwrap()))
    });

    let mut agent = filled_agent(1_000);
    let state = ndarray::array![-0.5, 0.0];
    c.bench_function("act", |b| {
        b.iter(|| black_box(agent.act(state.view()).unwrap()))
    });
}

criterion_group!(benches, bench_learn);
criterion_main!(benches);
