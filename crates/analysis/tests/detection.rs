//! End-to-end climb detection scenarios

use analysis::{detect_climbs, detect_into_route, prepare_route, DetectorConfig};
use model::{Category, Mark, Profile, TrackMeta};

fn profile_from(elevation: impl Fn(usize) -> f64, n: usize, spacing_m: f64) -> Profile {
    Profile::from_pairs((0..n).map(|i| (elevation(i), spacing_m * i as f64))).unwrap()
}

fn sorted(mut climbs: Vec<Mark>) -> Vec<Mark> {
    climbs.sort_by(|a, b| a.position.total_cmp(&b.position));
    climbs
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[test]
fn test_linear_climb_then_flat() {
    // 200 samples, 50 m apart: 5% up to km 9.0, flat afterwards
    let profile = profile_from(|i| 2.5 * i.min(180) as f64, 200, 50.0);
    let climbs = detect_climbs(&profile, profile.total_km());
    assert_eq!(climbs.len(), 1);

    let climb = &climbs[0];
    let info = climb.climb_info().unwrap();
    assert_close(climb.position, 9.0);
    assert_close(info.start_position, 0.0);
    assert_close(info.gradient, 5.0);
    // 10 * 450^2 / 9000 = 225
    assert_eq!(info.category, Category::C2);
    assert_eq!(info.category, Category::between(&info.start_sample, &climb.sample));
    assert!(info.is_final_climb);
    assert_eq!(climb.label, "Detected climb");
    assert_eq!(info.souvenir, "");
}

#[test]
fn test_two_climbs_separated_by_descent() {
    let mut x = 100.0;
    let mut pairs = Vec::new();
    for i in 0..400 {
        x += match i {
            0..=79 => 0.0,
            80..=159 => 4.0,
            160..=199 => -3.0,
            200..=239 => 0.0,
            240..=329 => 6.0,
            _ => -1.0,
        };
        pairs.push((x, 50.0 * i as f64));
    }
    let profile = Profile::from_pairs(pairs).unwrap();
    let climbs = sorted(detect_climbs(&profile, profile.total_km()));
    assert_eq!(climbs.len(), 2);

    let first = climbs[0].climb_info().unwrap();
    assert_close(climbs[0].position, 7.95);
    assert_close(first.start_position, 3.95);
    assert_close(first.gradient, 8.0);
    assert_eq!(first.category, Category::C2);

    let second = climbs[1].climb_info().unwrap();
    assert_close(climbs[1].position, 16.45);
    assert_close(second.start_position, 11.95);
    assert_close(second.gradient, 12.0);
    assert_eq!(second.category, Category::C1);

    assert!(!first.is_final_climb && !second.is_final_climb);
}

#[test]
fn test_climb_ending_at_route_end() {
    let profile = profile_from(|i| if i < 100 { 0.0 } else { 8.0 * (i - 100) as f64 }, 141, 50.0);
    let climbs = detect_climbs(&profile, profile.total_km());
    assert_eq!(climbs.len(), 1);
    let info = climbs[0].climb_info().unwrap();
    assert_close(climbs[0].position, 7.0);
    assert_close(info.start_position, 5.0);
    assert_eq!(info.category, Category::C1);
    assert!(info.is_final_climb);
}

#[test]
fn test_short_ramp_is_rejected() {
    // 300 m at 20%: categorized, but not longer than 0.35 km
    let profile = profile_from(|i| 10.0 * i.clamp(40, 46).saturating_sub(40) as f64, 100, 50.0);
    assert!(detect_climbs(&profile, profile.total_km()).is_empty());
}

#[test]
fn test_gentle_rise_has_no_category() {
    // 2 km at 1.5%
    let profile = profile_from(|i| 0.75 * i.clamp(20, 60).saturating_sub(20) as f64, 100, 50.0);
    assert!(detect_climbs(&profile, profile.total_km()).is_empty());
}

#[test]
fn test_degenerate_profiles_yield_nothing() {
    let single = Profile::from_pairs([(120.0, 0.0)]).unwrap();
    assert!(detect_climbs(&single, single.total_km()).is_empty());

    let same_distance = Profile::from_pairs((0..50).map(|i| (100.0 + i as f64, 0.0))).unwrap();
    assert!(detect_climbs(&same_distance, same_distance.total_km()).is_empty());

    let short = profile_from(|i| 30.0 * i as f64, 7, 50.0);
    assert!(detect_climbs(&short, short.total_km()).is_empty());
}

#[test]
fn test_detected_climbs_respect_length_and_category() {
    let profile = profile_from(
        |i| {
            let x = i as f64;
            300.0 + 120.0 * (x / 60.0).sin() + 40.0 * (x / 13.0).sin() + 0.05 * x
        },
        1500,
        25.0,
    );
    let climbs = detect_climbs(&profile, profile.total_km());
    assert!(!climbs.is_empty());
    for climb in &climbs {
        let info = climb.climb_info().unwrap();
        assert!(climb.position - info.start_position > 0.35);
        assert_ne!(info.category, Category::N);
        assert!(info.start_position < climb.position);
        assert!(info.gradient > 0.0);
    }
}

#[test]
fn test_detected_climbs_survive_metadata_round_trip() {
    let pairs: Vec<(f64, f64)> = (0..200).map(|i| (2.5 * i.min(180) as f64, 50.0 * i as f64)).collect();
    let (mut route, _) = prepare_route(pairs.clone(), None, "ramp", 15).unwrap();
    detect_into_route(&mut route, &DetectorConfig::default());
    route.departure = "Bourg".into();

    let meta = route.export_meta();
    let json = serde_json::to_string(&meta).unwrap();
    let reloaded: TrackMeta = serde_json::from_str(&json).unwrap();

    let (again, report) = prepare_route(pairs, Some(&reloaded), "ramp", 15).unwrap();
    assert!(report.is_clean());
    assert_eq!(again.export_meta(), meta);
    assert_eq!(again.marks()[0].climb_info().unwrap().category, Category::C2);
    assert!(again.final_climb().is_some());
}
