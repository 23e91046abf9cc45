use std::collections::VecDeque;

/// Extra points kept beyond the visible window.
const CAPACITY_SLACK: usize = 20;
/// Smallest capacity derived by [`HistoryBuffer::for_window`].
const MIN_WINDOW_CAPACITY: usize = 40;

/// One history entry.  The three values always refer to the same sampling
/// instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub elapsed_seconds: f64,
    pub cpu_percent:     f64,
    pub ram_percent:     f64,
}

/// Rolling history of (time, CPU, RAM) samples for graph rendering.
///
/// Points live in a single ring so the time, CPU and RAM series can never
/// drift out of alignment: eviction always drops a whole point.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    points:   VecDeque<HistoryPoint>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `capacity` points (minimum 1).
    ///
    /// Storage grows with the points actually appended, so a huge capacity
    /// costs nothing up front.
    pub fn new(capacity: usize) -> Self {
        Self {
            points:   VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Size a buffer for `history_seconds` of samples taken every
    /// `interval_ms`, plus slack.
    pub fn for_window(history_seconds: u64, interval_ms: u64) -> Self {
        let visible = history_seconds.saturating_mul(1000) / interval_ms.max(1);
        let visible = usize::try_from(visible).unwrap_or(usize::MAX);
        Self::new(visible.saturating_add(CAPACITY_SLACK).max(MIN_WINDOW_CAPACITY))
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn append(&mut self, elapsed_seconds: f64, cpu_percent: f64, ram_percent: f64) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(HistoryPoint {
            elapsed_seconds,
            cpu_percent,
            ram_percent,
        });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently appended point.
    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    /// The trailing `min(size, len)` points, oldest first.
    pub fn last_k(&self, size: usize) -> impl ExactSizeIterator<Item = &HistoryPoint> + '_ {
        self.points.range(self.points.len().saturating_sub(size)..)
    }

    pub fn time_points(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.elapsed_seconds).collect()
    }

    pub fn cpu_points(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.cpu_percent).collect()
    }

    pub fn ram_points(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ram_percent).collect()
    }

    /// Trailing `size` CPU values.
    pub fn cpu_window(&self, size: usize) -> Vec<f64> {
        self.last_k(size).map(|p| p.cpu_percent).collect()
    }

    /// Trailing `size` RAM values.
    pub fn ram_window(&self, size: usize) -> Vec<f64> {
        self.last_k(size).map(|p| p.ram_percent).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_keeps_recent_points() {
        let mut history = HistoryBuffer::new(3);
        history.append(1.0, 10.0, 20.0);
        history.append(2.0, 11.0, 21.0);
        history.append(3.0, 12.0, 22.0);
        history.append(4.0, 13.0, 23.0);

        assert_eq!(history.time_points(), vec![2.0, 3.0, 4.0]);
        assert_eq!(history.cpu_points(), vec![11.0, 12.0, 13.0]);
        assert_eq!(history.ram_points(), vec![21.0, 22.0, 23.0]);
    }

    #[test]
    fn eviction_is_fifo_across_all_series() {
        let capacity = 5;
        let mut history = HistoryBuffer::new(capacity);
        for i in 1..=12 {
            let i = f64::from(i);
            history.append(i, i + 100.0, i + 200.0);

            let len = history.len();
            assert!(len <= capacity);
            assert_eq!(history.time_points().len(), len);
            assert_eq!(history.cpu_points().len(), len);
            assert_eq!(history.ram_points().len(), len);
        }

        let expected: Vec<f64> = (8..=12).map(f64::from).collect();
        assert_eq!(history.time_points(), expected);
        assert_eq!(history.cpu_points(), expected.iter().map(|t| t + 100.0).collect::<Vec<_>>());
        assert_eq!(history.ram_points(), expected.iter().map(|t| t + 200.0).collect::<Vec<_>>());
    }

    #[test]
    fn last_k_returns_most_recent_in_order() {
        let mut history = HistoryBuffer::new(10);
        for i in 0..6 {
            history.append(f64::from(i), f64::from(i * 10), 0.0);
        }

        let times: Vec<f64> = history.last_k(3).map(|p| p.elapsed_seconds).collect();
        assert_eq!(times, vec![3.0, 4.0, 5.0]);
        assert_eq!(history.cpu_window(2), vec![40.0, 50.0]);
    }

    #[test]
    fn last_k_larger_than_history_returns_everything() {
        let mut history = HistoryBuffer::new(10);
        assert_eq!(history.last_k(4).len(), 0);

        history.append(1.0, 5.0, 6.0);
        history.append(2.0, 7.0, 8.0);
        assert_eq!(history.last_k(100).len(), 2);
        assert_eq!(history.ram_window(100), vec![6.0, 8.0]);
    }

    #[test]
    fn capacity_derivation_includes_slack() {
        assert_eq!(HistoryBuffer::for_window(30, 1000).capacity(), 50);
        assert_eq!(HistoryBuffer::for_window(10, 1000).capacity(), 40);
        assert_eq!(HistoryBuffer::for_window(60, 250).capacity(), 260);
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let mut history = HistoryBuffer::new(0);
        history.append(1.0, 1.0, 1.0);
        history.append(2.0, 2.0, 2.0);
        assert_eq!(history.latest().map(|p| p.elapsed_seconds), Some(2.0));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn huge_window_saturates_and_allocates_lazily() {
        let mut history = HistoryBuffer::for_window(u64::MAX / 1000, 250);
        assert!(history.capacity() > 1_000_000);

        history.append(1.0, 10.0, 20.0);
        history.append(2.0, 11.0, 21.0);
        assert_eq!(history.len(), 2);
        assert_eq!(history.cpu_points(), vec![10.0, 11.0]);

        let overflowing = HistoryBuffer::for_window(u64::MAX, 0);
        assert_eq!(overflowing.capacity(), usize::MAX);
    }
}
