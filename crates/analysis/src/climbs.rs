use model::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tuning of the climb detector. Defaults are the values the categories were calibrated on.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Coarse stride, in samples.
    pub step: usize,
    /// Percent grade above which the road counts as climbing.
    pub grad_high: f64,
    /// Percent grade below which a long look-back stops absorbing descents.
    pub grad_low: f64,
    /// Look-back distances for start extension, in multiples of `step`, smallest first.
    pub offset_multipliers: Vec<usize>,
    /// Offsets longer than this many steps also stop on a `grad_low` descent.
    pub long_offset_multiplier: usize,
    pub min_length_km: f64,
    /// Resume the coarse scan below the extended start instead of just below the top.
    /// Avoids nested climbs but can swallow an earlier climb into a later one.
    pub resume_below_start: bool,
    pub label: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            step: 8,
            grad_high: 1.0,
            grad_low: -3.0,
            offset_multipliers: vec![1, 2, 3, 4, 8, 16, 24, 32],
            long_offset_multiplier: 6,
            min_length_km: 0.35,
            resume_below_start: false,
            label: "Detected climb".into(),
        }
    }
}

pub fn detect_climbs(profile: &Profile, total_km: f64) -> Vec<Mark> {
    detect_climbs_with(profile, total_km, &DetectorConfig::default())
}

/// Finds categorized climbs on the raw elevation of `profile`.
///
/// A coarse backward scan proposes `(top, start)` pairs, the top is moved to the
/// local summit and the start to the point giving the hardest climb. Climbs of
/// category `N` or not longer than `min_length_km` are dropped. Output is unordered.
pub fn detect_climbs_with(profile: &Profile, total_km: f64, cfg: &DetectorConfig) -> Vec<Mark> {
    let step = cfg.step.max(1);
    let size = profile.len();
    let data = padded(profile.samples(), step);

    let candidates = find_candidate_pairs(&data, size, step, cfg);
    let mut climbs = Vec::with_capacity(candidates.len());

    for (rough_top, rough_start) in candidates {
        let top_idx = find_precise_top(&data, size, rough_top, step);
        let start_idx = find_precise_start(&data, top_idx, rough_start, step);
        let (start, top) = (data[start_idx], data[top_idx]);
        if top.elevation <= start.elevation {
            continue;
        }

        let top_km = 0.001 * top.distance;
        let start_km = 0.001 * start.distance;
        if top_km - start_km <= cfg.min_length_km {
            debug!(top_km, start_km, "climb too short");
            continue;
        }
        let category = Category::between(&start, &top);
        if category == Category::N {
            debug!(top_km, start_km, "climb without category");
            continue;
        }

        climbs.push(Mark::climb(cfg.label.clone(), top_km, top, start_km, start, Some(category), total_km));
    }

    climbs
}

// Zero-elevation tail so that look-ahead past the last sample stays in bounds.
fn padded(samples: &[Sample], step: usize) -> Vec<Sample> {
    let mut data = Vec::with_capacity(samples.len() + step);
    data.extend_from_slice(samples);
    if let Some(last) = samples.last() {
        let end = last.distance;
        data.extend((1..=step).map(|i| Sample::new(0.0, end + i as f64)));
    }
    data
}

// None when both samples share a distance; such pairs satisfy no threshold.
fn grade(data: &[Sample], from: usize, to: usize) -> Option<f64> {
    let (a, b) = (&data[from], &data[to]);
    (b.distance > a.distance).then(|| gradient(a, b))
}

fn above(g: Option<f64>, threshold: f64) -> bool {
    g.is_some_and(|g| g > threshold)
}

fn below(g: Option<f64>, threshold: f64) -> bool {
    g.is_some_and(|g| g < threshold)
}

fn find_candidate_pairs(data: &[Sample], size: usize, step: usize, cfg: &DetectorConfig) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    if size == 0 {
        return pairs;
    }
    let offsets: Vec<usize> = cfg.offset_multipliers.iter().map(|m| m * step).collect();
    let long_offset = cfg.long_offset_multiplier * step;

    let mut index = (size - 1) / step * step;
    while index >= step {
        let flattens = below(grade(data, index, index + step), cfg.grad_high);
        if flattens && above(grade(data, index - step, index), cfg.grad_high) {
            let top = index;
            let mut start = top - step;

            // greedy: every successful extension restarts from the smallest offset
            'extend: loop {
                for &offset in &offsets {
                    if start < offset {
                        continue;
                    }
                    let to_next = grade(data, start - offset, start);
                    let to_top = grade(data, start - offset, top);

                    if above(to_next, cfg.grad_high) {
                        start -= offset;
                        continue 'extend;
                    }
                    if below(to_top, cfg.grad_high) || (offset > long_offset && below(to_next, cfg.grad_low)) {
                        break;
                    }
                }
                break;
            }

            debug!(top, start, "climb candidate");
            pairs.push((top, start));
            if cfg.resume_below_start {
                index = start;
            }
        }
        match index.checked_sub(step) {
            Some(i) => index = i,
            None => break,
        }
    }

    pairs
}

fn find_precise_top(data: &[Sample], size: usize, rough_top: usize, step: usize) -> usize {
    let from = rough_top.saturating_sub(step);
    let to = (rough_top + step).min(size - 1);

    let mut best = rough_top;
    let mut max_elevation = f64::NEG_INFINITY;
    for (i, s) in data.iter().enumerate().take(to + 1).skip(from) {
        if s.elevation > max_elevation {
            max_elevation = s.elevation;
            best = i;
        }
    }
    best
}

fn find_precise_start(data: &[Sample], top: usize, rough_start: usize, step: usize) -> usize {
    let summit = &data[top];
    let lowest = rough_start.saturating_sub(step);

    let mut best = rough_start;
    let mut max_value = 0.0;
    for i in (lowest..top).rev() {
        let s = &data[i];
        if s.elevation >= summit.elevation || s.distance >= summit.distance {
            continue;
        }
        let value = climb_value(s, summit);
        if value > max_value {
            max_value = value;
            best = i;
        }
    }
    best
}
