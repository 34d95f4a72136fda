pub mod window;

pub use window::ScoreWindow;
