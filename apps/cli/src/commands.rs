use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use analysis::{climb_summary, detect_into_route, DetectorConfig};
use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use model::{Mark, Route, DEFAULT_SMOOTHING_WINDOW};
use tracing::info;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// CSV profile with `elevation,distance` columns
    pub profile: PathBuf,

    /// Moving-average window for the smoothed elevation
    #[arg(long, default_value_t = DEFAULT_SMOOTHING_WINDOW)]
    pub window: usize,
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    #[command(flatten)]
    pub input: ProfileArgs,

    /// JSON detector configuration; missing fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the merged marks to the metadata sidecar
    #[arg(long, action = ArgAction::SetTrue)]
    pub write: bool,
}

pub fn load_config(path: Option<&Path>) -> Result<DetectorConfig> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", p.display()))
        }
        None => Ok(DetectorConfig::default()),
    }
}

pub fn detect(args: &DetectArgs, out: &mut impl Write) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let (mut route, _) = iox::load_route(&args.input.profile, args.input.window)?;

    // climbs from an earlier run are replaced, hand-made marks are kept
    let kept: Vec<Mark> = route
        .marks()
        .iter()
        .filter(|m| !(m.climb_info().is_some() && m.label == cfg.label))
        .cloned()
        .collect();
    route.replace_marks(kept);
    detect_into_route(&mut route, &cfg);

    write_marks(&route, out)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&climb_summary(&route))?)?;

    if args.write {
        let path = iox::save_route_meta(&route, &args.input.profile)?;
        info!(path = %path.display(), "metadata written");
    }
    Ok(())
}

pub fn marks(args: &ProfileArgs, out: &mut impl Write) -> Result<()> {
    let (route, report) = iox::load_route(&args.profile, args.window)?;
    write_marks(&route, out)?;
    for kind in report.unknown_types() {
        writeln!(out, "unknown mark type: {kind}")?;
    }
    Ok(())
}

pub fn nearest(profile: &Path, km: f64, window: usize, out: &mut impl Write) -> Result<()> {
    let (route, _) = iox::load_route(profile, window)?;
    let s = route.nearest_sample(km);
    writeln!(
        out,
        "{:.3} km: elevation {:.1} m (smoothed {:.1} m)",
        0.001 * s.distance,
        s.elevation,
        s.smoothed_elevation
    )?;
    Ok(())
}

fn write_marks(route: &Route, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{} ({:.1} km)", route.name, route.total_km())?;
    for m in route.marks() {
        let badge = m
            .climb_info()
            .map(|c| format!(" [{}]", c.category.symbol()))
            .unwrap_or_default();
        writeln!(out, "{:>7.1}  {}{}  {}", m.position, m.type_name(), badge, m.caption().join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_ramp(dir: &Path) -> PathBuf {
        let path = dir.join("ramp.csv");
        let mut body = String::from("elevation,distance\n");
        for i in 0..200 {
            body.push_str(&format!("{},{}\n", 2.5 * i.min(180) as f64, 50.0 * i as f64));
        }
        fs::write(&path, body).unwrap();
        path
    }

    fn detect_args(profile: PathBuf, write: bool) -> DetectArgs {
        DetectArgs {
            input: ProfileArgs { profile, window: DEFAULT_SMOOTHING_WINDOW },
            config: None,
            write,
        }
    }

    #[test]
    fn test_detect_writes_sidecar_once() {
        let dir = tempdir().unwrap();
        let profile = write_ramp(dir.path());

        let mut out = Vec::new();
        detect(&detect_args(profile.clone(), true), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Climb [2]"));
        assert!(text.contains("(9.0km à 5.0%)"));

        // a second run replaces the detected climb instead of duplicating it
        detect(&detect_args(profile.clone(), true), &mut Vec::new()).unwrap();
        let meta = iox::load_meta(&iox::meta_path_for(&profile)).unwrap().unwrap();
        assert_eq!(meta.marks.len(), 1);
        assert_eq!(meta.marks[0].kind, "Climb");
    }

    #[test]
    fn test_marks_and_nearest() {
        let dir = tempdir().unwrap();
        let profile = write_ramp(dir.path());
        fs::write(
            iox::meta_path_for(&profile),
            r#"{ "marks": [ { "type": "Feed", "name": "Ravito", "position": 4.0 } ] }"#,
        )
        .unwrap();

        let mut out = Vec::new();
        marks(&ProfileArgs { profile: profile.clone(), window: 15 }, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Feed"));
        assert!(text.contains("unknown mark type: Feed"));

        let mut out = Vec::new();
        nearest(&profile, 1.0, 15, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("1.000 km: elevation 50.0 m"));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("detector.json");
        fs::write(&path, r#"{ "label": "Auto", "min_length_km": 1.0 }"#).unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.label, "Auto");
        assert_eq!(cfg.step, 8);
        assert_eq!(load_config(None).unwrap(), DetectorConfig::default());
    }
}
