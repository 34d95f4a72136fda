use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::replay_buffer::{ReplayBuffer, Experience};

fn numbered(i: usize) -> Experience {
    Experience {
        state: array![i as f32],
        action: i % 3,
        reward: i as f32,
        next_state: array![(i + 1) as f32],
        done: false,
    }
}

#[test]
fn test_replay_buffer_add_and_sample() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut replay_buffer = ReplayBuffer::new(10);
    let experience = Experience {
        state: array![0.5, -0.5],
        action: 0,
        reward: 1.0,
        next_state: array![0.6, -0.4],
        done: false,
    };
    replay_buffer.add(experience.clone());
    assert_eq!(replay_buffer.len(), 1);
    let sample = replay_buffer.sample(1, &mut rng);
    assert_eq!(sample[0], &experience);
}

#[test]
fn test_replay_buffer_evicts_oldest() {
    let mut buffer = ReplayBuffer::new(3);

    for i in 0..5 {
        buffer.add(numbered(i));
    }

    assert_eq!(buffer.len(), 3);
    assert!(buffer.is_full());
    let states: Vec<f32> = buffer.iter().map(|e| e.state[0]).collect();
    assert_eq!(states, vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_replay_buffer_is_empty() {
    let mut buffer = ReplayBuffer::new(10);
    assert!(buffer.is_empty());
    assert!(!buffer.is_full());

    buffer.add(numbered(0));

    assert!(!buffer.is_empty());
    buffer.clear();
    assert!(buffer.is_empty());
}

#[test]
fn test_replay_buffer_sample_without_replacement() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut buffer = ReplayBuffer::new(10);
    for i in 0..10 {
        buffer.add(numbered(i));
    }

    for _ in 0..50 {
        let sample = buffer.sample(6, &mut rng);
        assert_eq!(sample.len(), 6);
        let mut rewards: Vec<i64> = sample.iter().map(|e| e.reward as i64).collect();
        rewards.sort_unstable();
        rewards.dedup();
        assert_eq!(rewards.len(), 6);
    }
}

#[test]
fn test_replay_buffer_sample_size() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut buffer = ReplayBuffer::new(10);
    for i in 0..5 {
        buffer.add(numbered(i));
    }

    assert_eq!(buffer.sample(1, &mut rng).len(), 1);
    assert_eq!(buffer.sample(3, &mut rng).len(), 3);
    // Sampling more than available returns everything
    assert_eq!(buffer.sample(10, &mut rng).len(), 5);
}

#[test]
fn test_replay_buffer_sampling_covers_every_entry() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut buffer = ReplayBuffer::new(4);
    for i in 0..4 {
        buffer.add(numbered(i));
    }

    let mut seen = [0usize; 4];
    for _ in 0..4000 {
        for e in buffer.sample(1, &mut rng) {
            seen[e.reward as usize] += 1;
        }
    }
    for &count in seen.iter() {
        assert!((count as i64 - 1000).abs() < 150, "counts were {:?}", seen);
    }
}
