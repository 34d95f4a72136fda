use crate::env::{Environment, MountainCar};
use crate::error::SisyphusError;

#[test]
fn test_reset_starts_in_valley() {
    let mut env = MountainCar::new(1);
    for _ in 0..100 {
        let state = env.reset();
        assert_eq!(state.len(), 2);
        assert!(state[0] >= -0.6 && state[0] < -0.4);
        assert_eq!(state[1], 0.0);
    }
}

#[test]
fn test_same_seed_same_episode() {
    let mut a = MountainCar::new(7);
    let mut b = MountainCar::new(7);
    assert_eq!(a.reset(), b.reset());
    for action in [0, 2, 1, 2, 2, 0] {
        assert_eq!(a.step(action).unwrap(), b.step(action).unwrap());
    }
}

#[test]
fn test_state_stays_in_bounds() {
    let mut env = MountainCar::new(3);
    env.reset();
    for i in 0..5000 {
        let action = if (i / 40) % 2 == 0 { 0 } else { 2 };
        let step = env.step(action).unwrap();
        assert_eq!(step.reward, -1.0);
        assert!(step.next_state[0] >= -1.2 && step.next_state[0] <= 0.6);
        assert!(step.next_state[1].abs() <= 0.07 + 1e-6);
        if step.done {
            break;
        }
    }
}

#[test]
fn test_left_wall_stops_the_car() {
    let mut env = MountainCar::new(0);
    env.reset();
    for i in 0..2000 {
        // Swing left hard enough to hit the wall
        let action = if env.velocity() > 0.0 || i < 10 { 2 } else { 0 };
        let step = env.step(action).unwrap();
        if step.next_state[0] <= -1.2 {
            assert!(step.next_state[1] >= 0.0);
        }
        if step.done {
            break;
        }
    }
}

#[test]
fn test_oscillating_policy_reaches_goal() {
    let mut env = MountainCar::new(2);
    env.reset();
    let mut reached = false;
    for _ in 0..1000 {
        // Push in the direction of motion to pump energy into the car
        let action = if env.velocity() < 0.0 { 0 } else { 2 };
        let step = env.step(action).unwrap();
        if step.done {
            assert!(env.position() >= 0.5);
            reached = true;
            break;
        }
    }
    assert!(reached);
}

#[test]
fn test_invalid_action() {
    let mut env = MountainCar::new(0);
    env.reset();
    assert!(matches!(env.step(3), Err(SisyphusError::InvalidAction { action: 3, max_actions: 3 })));
}
