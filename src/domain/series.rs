// Sliding multi-channel series for the distance chart
use serde::Serialize;
use std::collections::VecDeque;

/// Number of points kept on the chart.
pub const SERIES_CAPACITY: usize = 20;

/// One chart sample. Unavailable channels are gaps (`None`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub front: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl SeriesPoint {
    pub fn new(label: String, front: Option<f64>, left: Option<f64>, right: Option<f64>) -> Self {
        Self {
            label,
            front,
            left,
            right,
        }
    }
}

/// Fixed-capacity FIFO of chart points, oldest first.
#[derive(Debug, Clone)]
pub struct SlidingSeriesBuffer {
    points: VecDeque<SeriesPoint>,
    capacity: usize,
}

impl SlidingSeriesBuffer {
    pub fn new() -> Self {
        Self::with_capacity(SERIES_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a point, evicting the single oldest one when over capacity.
    pub fn push(&mut self, point: SeriesPoint) {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn snapshot(&self) -> Vec<SeriesPoint> {
        self.points.iter().cloned().collect()
    }
}

impl Default for SlidingSeriesBuffer {
    fn default() -> Self {
        Self::new()
    }
}
