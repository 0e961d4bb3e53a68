//! The stopwatch implementation for the game.
//!
//! The clock is started by the first opened cell and frozen for good once the game ends, so unlike a general purpose
//! stopwatch it never resumes: starting again begins a new measurement.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy)]
pub struct Stopwatch {
    /// The time the stopwatch has been started last time (`None` if it has never been started yet).
    start_time: Option<Instant>,
    /// The measured time, set once the stopwatch gets stopped.
    frozen: Option<Duration>,
}

impl Stopwatch {
    /// Starts a new measurement from now, dropping the frozen value (if any).
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.frozen = None;
    }

    /// Stops the stopwatch, freezing the elapsed time at its current value.
    pub fn stop(&mut self) {
        self.frozen = Some(self.get_elapsed_time());
    }

    /// Returns the frozen time if the stopwatch has been stopped, the live time since the start if it's running, and
    /// zero if it has never been started.
    pub fn get_elapsed_time(&self) -> Duration {
        match (self.frozen, self.start_time) {
            (Some(frozen), _) => frozen,
            (None, Some(start_time)) => start_time.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    /// The moment of the last start.
    pub fn get_start_time(&self) -> Option<Instant> {
        self.start_time
    }

    pub fn is_running(&self) -> bool {
        self.start_time.is_some() && self.frozen.is_none()
    }
}

#[cfg(test)]
mod test {
    use super::Stopwatch;
    use std::time::Duration;

    static SLEEP_MS: i64 = 50;
    static TOLERANCE_PERCENTAGE: f64 = 0.3;

    #[test]
    fn a_stopwatch_that_has_never_been_started_has_zero_as_the_elapsed_time_value() {
        let sw = Stopwatch::default();
        assert_eq!(sw.get_elapsed_time().as_millis(), 0);
        assert!(sw.get_start_time().is_none());
        assert!(!sw.is_running());
    }

    #[test]
    fn stopping_a_stopwatch_that_has_never_been_started_freezes_zero() {
        let mut sw = Stopwatch::default();
        sw.stop();

        assert_eq!(sw.get_elapsed_time(), Duration::ZERO);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn the_stopwatch_correctly_measures_the_elapsed_time() {
        let mut sw = Stopwatch::default();
        sw.start();
        assert!(sw.is_running());

        sleep_ms(SLEEP_MS);

        assert_sw_near(sw, SLEEP_MS);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn the_time_is_not_running_when_the_stopwatch_is_stopped() {
        let mut sw = Stopwatch::default();
        sw.start();

        sleep_ms(SLEEP_MS);

        sw.stop();
        assert!(!sw.is_running());
        assert_sw_near(sw, SLEEP_MS);

        sleep_ms(SLEEP_MS);

        assert_sw_near(sw, SLEEP_MS);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn starting_again_begins_a_new_measurement() {
        let mut sw = Stopwatch::default();
        sw.start();

        sleep_ms(SLEEP_MS);

        sw.stop();
        sw.start();

        assert!(sw.is_running());
        assert_sw_near(sw, 0);
    }

    // helpers

    fn sleep_ms(ms: i64) {
        std::thread::sleep(Duration::from_millis(ms as u64))
    }

    fn assert_sw_near(sw: Stopwatch, elapsed: i64) {
        fn assert_near(x: i64, y: i64, tolerance: i64) {
            let diff = (x - y).abs();
            if diff > tolerance {
                panic!("Expected {:?}, got {:?}", x, y);
            }
        }

        // never tolerate less than a few milliseconds of scheduling noise
        let tolerance_value = ((TOLERANCE_PERCENTAGE * elapsed as f64) as i64).max(10);

        assert_near(
            elapsed,
            sw.get_elapsed_time().as_millis() as i64,
            tolerance_value,
        );
    }
}
