//! Fixed-capacity position history for a single body.

use nalgebra::Point2;

/// Default number of samples kept per body
pub const DEFAULT_TRAIL_CAPACITY: usize = 2000;

/// Circular buffer of recent positions.
///
/// Once full, each new sample overwrites the oldest one. A buffer with zero
/// capacity silently ignores every sample.
///
/// # Examples
///
/// ```
/// use nalgebra::Point2;
/// use orrery::trail::TrailBuffer;
///
/// let mut trail = TrailBuffer::new(3);
/// for i in 0..5 {
///     trail.record(Point2::new(i as f64, 0.0));
/// }
///
/// let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
/// assert_eq!(xs, vec![2.0, 3.0, 4.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    points: Vec<Point2<f64>>,
    head: usize,
    count: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: vec![Point2::origin(); capacity],
            head: 0,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    /// Number of valid samples, never more than the capacity
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Index of the slot the next sample will be written to
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn record(&mut self, point: Point2<f64>) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }

        self.points[self.head] = point;
        self.head = (self.head + 1) % capacity;
        if self.count < capacity {
            self.count += 1;
        }
    }

    /// Valid samples from oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Point2<f64>> + '_ {
        let capacity = self.capacity();
        let start = self.oldest_index();
        (0..self.count).map(move |offset| self.points[(start + offset) % capacity])
    }

    /// Consecutive `(older, newer)` pairs, ready to be drawn as line segments
    pub fn segments(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        self.iter().zip(self.iter().skip(1))
    }

    pub fn latest(&self) -> Option<Point2<f64>> {
        if self.count == 0 {
            return None;
        }
        let capacity = self.capacity();
        Some(self.points[(self.head + capacity - 1) % capacity])
    }

    fn oldest_index(&self) -> usize {
        let capacity = self.capacity();
        if capacity == 0 {
            0
        } else {
            (self.head + capacity - self.count) % capacity
        }
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_CAPACITY)
    }
}
