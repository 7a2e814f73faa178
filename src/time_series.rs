/// One live WPM reading taken on a tick, `t` in seconds since session start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub t: f64,
    pub wpm: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.t, p.wpm)
    }
}

/// WPM samples for the results chart, at most one per whole second
#[derive(Debug, Clone, Default)]
pub struct WpmSamples {
    points: Vec<TimeSeriesPoint>,
}

impl WpmSamples {
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Record a reading unless one already exists for that second
    pub fn record(&mut self, elapsed_ms: i64, wpm: u32) {
        if elapsed_ms < 1_000 {
            return;
        }
        let t = (elapsed_ms / 1_000) as f64;
        if self.points.last().is_some_and(|p| p.t >= t) {
            return;
        }
        self.points.push(TimeSeriesPoint::new(t, wpm as f64));
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn as_tuples(&self) -> Vec<(f64, f64)> {
        self.points.iter().copied().map(Into::into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_one_point_per_second() {
        let mut samples = WpmSamples::default();
        samples.record(500, 10);
        samples.record(1_000, 20);
        samples.record(1_900, 30);
        samples.record(2_100, 40);

        assert_eq!(
            samples.as_tuples(),
            vec![(1.0, 20.0), (2.0, 40.0)]
        );
    }

    #[test]
    fn clear_empties() {
        let mut samples = WpmSamples::default();
        samples.record(3_000, 1);
        samples.clear();
        assert!(samples.points().is_empty());
    }
}
