use std::time::{Duration, Instant};

/// Per-session statistics shown next to the board
///
/// Only time spent running counts towards `elapsed_time`; pauses freeze it.
pub struct GameMetrics {
    running_since: Option<Instant>,
    accumulated: Duration,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub best_session_score: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            accumulated: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            games_played: 0,
            best_session_score: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.accumulated
            + self
                .running_since
                .map_or(Duration::ZERO, |since| since.elapsed());
    }

    /// The clock runs from a start or resume
    pub fn on_running(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// The clock stops on pause and game over
    pub fn on_stopped(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
        self.update();
    }

    pub fn on_reset(&mut self) {
        self.running_since = None;
        self.accumulated = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.on_stopped();
        self.games_played += 1;
        if final_score > self.best_session_score {
            self.best_session_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
