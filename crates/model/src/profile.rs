use serde::{Deserialize, Serialize};

use crate::ModelError;

pub const DEFAULT_SMOOTHING_WINDOW: usize = 15;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Sample {
    pub elevation: f64,
    /// Cumulative meters from the route start.
    pub distance: f64,
    #[serde(default)]
    pub smoothed_elevation: f64,
}

impl Sample {
    pub fn new(elevation: f64, distance: f64) -> Self {
        Self { elevation, distance, smoothed_elevation: 0.0 }
    }
}

/// Ordered, never empty sequence of samples with non-decreasing distance.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Profile {
    samples: Vec<Sample>,
}

impl Profile {
    pub fn new(samples: Vec<Sample>) -> Result<Self, ModelError> {
        if samples.is_empty() {
            return Err(ModelError::EmptyProfile);
        }
        for (i, w) in samples.windows(2).enumerate() {
            if w[1].distance < w[0].distance {
                return Err(ModelError::NonMonotonicDistance {
                    index: i + 1,
                    previous: w[0].distance,
                    current: w[1].distance,
                });
            }
        }
        Ok(Self { samples })
    }

    /// Builds a profile from `(elevation, cumulative distance)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(pairs.into_iter().map(|(e, d)| Sample::new(e, d)).collect())
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> &Sample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn total_km(&self) -> f64 {
        0.001 * self.last().distance
    }

    /// Index of the sample closest to `km`; the earlier sample wins an exact tie.
    pub fn nearest_index(&self, km: f64) -> usize {
        let target = km * 1000.0;
        let mut best = 0;
        let mut bd = f64::INFINITY;
        for (i, s) in self.samples.iter().enumerate() {
            let dd = (s.distance - target).abs();
            if dd < bd {
                bd = dd;
                best = i;
            }
        }
        best
    }

    pub fn nearest_sample(&self, km: f64) -> &Sample {
        &self.samples[self.nearest_index(km)]
    }

    /// Stores a centered moving average of the raw elevation in every sample.
    /// The window shrinks at both ends of the profile instead of wrapping.
    pub fn smooth_elevation(&mut self, window: usize) {
        let smoothed = moving_average(&self.samples, window);
        for (s, v) in self.samples.iter_mut().zip(smoothed) {
            s.smoothed_elevation = v;
        }
    }
}

fn moving_average(samples: &[Sample], window: usize) -> Vec<f64> {
    let n = samples.len();
    let window = window.max(1);
    let behind = window / 2;
    let ahead = window.div_ceil(2);

    let mut out = vec![0.0; n];
    for (i, v) in out.iter_mut().enumerate() {
        let from = i.saturating_sub(behind);
        let to = (i + ahead).min(n);
        let sum: f64 = samples[from..to].iter().map(|s| s.elevation).sum();
        *v = sum / (to - from) as f64;
    }
    out
}
