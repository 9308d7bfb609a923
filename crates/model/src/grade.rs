use serde::{Deserialize, Serialize};

use crate::Sample;

/// Climb difficulty, declared from easiest to hardest so that `Ord` follows difficulty.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    N,
    C4,
    C3,
    C2,
    C1,
    HC,
}

impl Category {
    /// Strict thresholds: a value sitting exactly on a boundary falls into the easier tier.
    pub fn from_climb_value(value: f64) -> Self {
        if value > 800.0 {
            Category::HC
        } else if value > 400.0 {
            Category::C1
        } else if value > 200.0 {
            Category::C2
        } else if value > 100.0 {
            Category::C3
        } else if value > 50.0 {
            Category::C4
        } else {
            Category::N
        }
    }

    pub fn between(start: &Sample, end: &Sample) -> Self {
        Self::from_climb_value(climb_value(start, end))
    }

    /// Text shown inside the category badge.
    pub fn symbol(&self) -> &'static str {
        match self {
            Category::HC => "HC",
            Category::C1 => "1",
            Category::C2 => "2",
            Category::C3 => "3",
            Category::C4 => "4",
            Category::N => "",
        }
    }
}

/// Percent grade from `start` to `end`. Not finite when both share a distance.
pub fn gradient(start: &Sample, end: &Sample) -> f64 {
    let delta_elevation = end.elevation - start.elevation;
    let distance = end.distance - start.distance;
    100.0 * delta_elevation / distance
}

/// Work-like score `10 * Δe² / Δd`; only meaningful for ascending pairs.
pub fn climb_value(start: &Sample, end: &Sample) -> f64 {
    let delta_elevation = end.elevation - start.elevation;
    let distance = end.distance - start.distance;
    10.0 * delta_elevation * delta_elevation / distance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_thresholds_are_strict() {
        assert_eq!(Category::from_climb_value(800.0), Category::C1);
        assert_eq!(Category::from_climb_value(800.1), Category::HC);
        assert_eq!(Category::from_climb_value(400.0), Category::C2);
        assert_eq!(Category::from_climb_value(200.0), Category::C3);
        assert_eq!(Category::from_climb_value(100.0), Category::C4);
        assert_eq!(Category::from_climb_value(50.0), Category::N);
        assert_eq!(Category::from_climb_value(0.0), Category::N);
    }

    #[test]
    fn test_category_ordering() {
        assert!(Category::HC > Category::C1);
        assert!(Category::C1 > Category::C2);
        assert!(Category::C4 > Category::N);
        let hardest = [Category::C3, Category::HC, Category::C4].into_iter().max();
        assert_eq!(hardest, Some(Category::HC));
    }

    #[test]
    fn test_gradient_and_climb_value() {
        let a = Sample::new(100.0, 1000.0);
        let b = Sample::new(150.0, 2000.0);
        assert!((gradient(&a, &b) - 5.0).abs() < 1e-9);
        // 10 * 50^2 / 1000
        assert!((climb_value(&a, &b) - 25.0).abs() < 1e-9);
        assert!(gradient(&b, &Sample::new(100.0, 3000.0)) < 0.0);
        assert_eq!(Category::between(&a, &b), Category::N);
    }

    #[test]
    fn test_category_serializes_by_name() {
        let s = serde_json::to_string(&Category::HC).unwrap();
        assert_eq!(s, "\"HC\"");
        let c: Category = serde_json::from_str("\"C2\"").unwrap();
        assert_eq!(c, Category::C2);
    }
}
