use std::collections::VecDeque;

/// The most recent `capacity` episode scores and their mean.
#[derive(Debug, Clone)]
pub struct ScoreWindow {
    scores: VecDeque<f32>,
    capacity: usize,
}

impl ScoreWindow {
    pub fn new(capacity: usize) -> Self {
        ScoreWindow {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// A window that starts out holding `sentinel`, so early means are pulled
    /// towards it until enough real scores push it out.
    pub fn with_sentinel(capacity: usize, sentinel: f32) -> Self {
        let mut window = Self::new(capacity);
        window.push(sentinel);
        window
    }

    pub fn push(&mut self, score: f32) {
        if self.capacity == 0 {
            return;
        }
        if self.scores.len() >= self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    /// `None` while the window is empty
    pub fn mean(&self) -> Option<f32> {
        if self.scores.is_empty() {
            return None;
        }
        Some(self.scores.iter().sum::<f32>() / self.scores.len() as f32)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.scores.iter()
    }
}
