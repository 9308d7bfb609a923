use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use model::*;

/// Reads a profile from a CSV file with `elevation,distance` columns.
/// A `smoothed_elevation` column, if present, is ignored.
pub fn import_profile_csv(path: &Path) -> Result<Profile> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening profile {}", path.display()))?;
    let mut pairs = Vec::new();
    for (i, rec) in rdr.deserialize().enumerate() {
        let r: ProfileRow = rec.with_context(|| format!("row {} of {}", i + 1, path.display()))?;
        pairs.push((r.elevation, r.distance));
    }
    let profile = Profile::from_pairs(pairs)
        .with_context(|| format!("invalid profile {}", path.display()))?;
    debug!(path = %path.display(), samples = profile.len(), "profile imported");
    Ok(profile)
}

pub fn export_profile_csv(profile: &Profile, path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    for s in profile.samples() {
        w.serialize(ProfileRow {
            elevation: s.elevation,
            distance: s.distance,
            smoothed_elevation: Some(s.smoothed_elevation),
        })?;
    }
    w.flush()?;
    Ok(())
}

/// Metadata sidecar of a profile: same directory and stem, `.json` extension.
pub fn meta_path_for(profile_path: &Path) -> PathBuf {
    profile_path.with_extension("json")
}

/// `Ok(None)` when there is no metadata file yet.
pub fn load_meta(path: &Path) -> Result<Option<TrackMeta>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    let meta: TrackMeta = serde_json::from_str(&text)
        .with_context(|| format!("parsing metadata {}", path.display()))?;
    Ok(Some(meta))
}

pub fn save_meta(path: &Path, meta: &TrackMeta) -> Result<()> {
    let f = File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, meta)?;
    w.flush()?;
    Ok(())
}

/// Loads a profile, smooths it with `window` and applies its metadata sidecar.
/// The route is named after the file stem.
pub fn load_route(profile_path: &Path, window: usize) -> Result<(Route, ImportReport)> {
    let mut profile = import_profile_csv(profile_path)?;
    profile.smooth_elevation(window);

    let meta = load_meta(&meta_path_for(profile_path))?;
    let name = profile_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (route, report) = Route::with_meta(profile, meta.as_ref(), name);
    for (index, error) in report.rejected() {
        warn!(route = %route.name, index, %error, "mark record not loaded");
    }
    Ok((route, report))
}

/// Writes the route's metadata next to its profile and returns the path written.
pub fn save_route_meta(route: &Route, profile_path: &Path) -> Result<PathBuf> {
    let path = meta_path_for(profile_path);
    save_meta(&path, &route.export_meta())?;
    Ok(path)
}

#[derive(Serialize, Deserialize)]
struct ProfileRow {
    elevation: f64,
    distance: f64,
    #[serde(default)]
    smoothed_elevation: Option<f64>,
}
