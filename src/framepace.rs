use std::time::{Duration, Instant};

use log::debug;

/// How often the average frame rate is logged
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Caps the loop to a fixed frame rate and keeps a running frame count
pub struct Framepacer {
    frame_start: Instant,
    limit: Option<Duration>,

    frames: u64,
    report_start: Instant,
    report_frames: u64,
}

impl Framepacer {
    pub fn new(framerate: Option<u32>) -> Self {
        let limit = framerate
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / fps as f64));
        let now = Instant::now();

        Self {
            frame_start: now,
            limit,

            frames: 0,
            report_start: now,
            report_frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Sleep out the rest of the frame budget, if there is one
    pub fn end_frame(&mut self) {
        if let Some(limit) = self.limit {
            // Sleep coarsely, then spin for the last stretch
            const ACCURACY: Duration = Duration::from_micros(100);

            let elapsed = self.frame_start.elapsed();
            if let Some(sleep_time) = limit.checked_sub(elapsed + ACCURACY) {
                std::thread::sleep(sleep_time);
            }
            while self.frame_start.elapsed() < limit {
                std::thread::yield_now();
            }
        }

        self.frames += 1;
        self.report_frames += 1;

        let window = self.report_start.elapsed();
        if window >= REPORT_INTERVAL {
            debug!(
                "{:.1} fps over the last {:.1}s ({} frames total)",
                self.report_frames as f64 / window.as_secs_f64(),
                window.as_secs_f64(),
                self.frames
            );
            self.report_start = Instant::now();
            self.report_frames = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_without_a_framerate() {
        assert_eq!(Framepacer::new(None).limit(), None);
        assert_eq!(Framepacer::new(Some(0)).limit(), None);
    }

    #[test]
    fn counts_frames() {
        let mut pacer = Framepacer::new(None);
        for _ in 0..3 {
            pacer.begin_frame();
            pacer.end_frame();
        }
        assert_eq!(pacer.frames(), 3);
    }

    #[test]
    fn holds_each_frame_to_the_limit() {
        let mut pacer = Framepacer::new(Some(100));
        assert_eq!(pacer.limit(), Some(Duration::from_millis(10)));

        let start = Instant::now();
        pacer.begin_frame();
        pacer.end_frame();
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
