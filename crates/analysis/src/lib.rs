use model::*;
use serde_json::{json, Value};
use tracing::info;

mod climbs;

pub use climbs::{detect_climbs, detect_climbs_with, DetectorConfig};

/// Builds a route from `(elevation, cumulative distance)` pairs: the profile is
/// smoothed with `window` first, then the metadata (if any) is imported.
pub fn prepare_route<I>(
    pairs: I,
    meta: Option<&TrackMeta>,
    name: &str,
    window: usize,
) -> Result<(Route, ImportReport), ModelError>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut profile = Profile::from_pairs(pairs)?;
    profile.smooth_elevation(window);
    Ok(Route::with_meta(profile, meta, name))
}

/// Runs the detector over the route's profile and merges the climbs into its marks.
/// Returns how many climbs were added.
pub fn detect_into_route(route: &mut Route, cfg: &DetectorConfig) -> usize {
    let climbs = detect_climbs_with(route.profile(), route.total_km(), cfg);
    let added = climbs.len();
    route.add_marks(climbs);
    info!(route = %route.name, added, "climb detection done");
    added
}

pub fn climb_summary(route: &Route) -> Value {
    let climbs: Vec<(&Mark, &ClimbInfo)> = route
        .marks()
        .iter()
        .filter_map(|m| m.climb_info().map(|c| (m, c)))
        .collect();

    let hardest = climbs.iter().map(|(_, c)| c.category).max();
    let gain_m: f64 = climbs
        .iter()
        .map(|(m, c)| (m.sample.elevation - c.start_sample.elevation).max(0.0))
        .sum();
    let longest_km = climbs
        .iter()
        .filter_map(|(m, _)| m.length_km())
        .fold(0.0_f64, f64::max);

    json!({
        "name": route.name,
        "total_km": route.total_km(),
        "climbs": climbs.len(),
        "hardest": hardest,
        "climbing_gain_m": gain_m,
        "longest_climb_km": longest_km,
        "final_climb": route.final_climb().map(|m| m.label.clone())
    })
}
