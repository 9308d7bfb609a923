use tracing::warn;

use crate::{Mark, MarkError, MarkKind, MarkRecord, Profile, Sample, TrackMeta};

#[derive(Clone, Debug, PartialEq)]
pub enum ImportIssue {
    /// Record kept as a `MarkKind::Unknown` stub.
    UnknownType { index: usize, kind: String },
    /// Record dropped from the import.
    Rejected { index: usize, error: MarkError },
}

/// Per-record outcome of a metadata import. Issues never abort the import.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ImportReport {
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn unknown_types(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().filter_map(|i| match i {
            ImportIssue::UnknownType { kind, .. } => Some(kind.as_str()),
            ImportIssue::Rejected { .. } => None,
        })
    }

    pub fn rejected(&self) -> impl Iterator<Item = (usize, &MarkError)> {
        self.issues.iter().filter_map(|i| match i {
            ImportIssue::Rejected { index, error } => Some((*index, error)),
            ImportIssue::UnknownType { .. } => None,
        })
    }
}

/// A route: its profile, its marks sorted by position, and the route-level metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub name: String,
    pub departure: String,
    pub arrival: String,
    pub is_time_trial: bool,
    profile: Profile,
    marks: Vec<Mark>,
}

impl Route {
    pub fn new(profile: Profile, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            departure: String::new(),
            arrival: String::new(),
            is_time_trial: false,
            profile,
            marks: Vec::new(),
        }
    }

    pub fn with_meta(profile: Profile, meta: Option<&TrackMeta>, name: impl Into<String>) -> (Self, ImportReport) {
        let mut route = Self::new(profile, name);
        let report = match meta {
            Some(m) => route.load_meta(m),
            None => ImportReport::default(),
        };
        (route, report)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn total_km(&self) -> f64 {
        self.profile.total_km()
    }

    pub fn nearest_sample(&self, km: f64) -> &Sample {
        self.profile.nearest_sample(km)
    }

    /// Replaces every mark at once; the new collection is sorted before it is visible.
    pub fn replace_marks(&mut self, mut marks: Vec<Mark>) {
        sort_by_position(&mut marks);
        self.marks = marks;
    }

    pub fn add_marks<I: IntoIterator<Item = Mark>>(&mut self, marks: I) {
        self.marks.extend(marks);
        sort_by_position(&mut self.marks);
    }

    /// The climb whose summit lies within the last 2 km, if any.
    pub fn final_climb(&self) -> Option<&Mark> {
        self.marks.iter().find(|m| m.is_final_climb())
    }

    /// Builds one mark, resolving its positions to the nearest profile samples.
    /// Unknown types become `MarkKind::Unknown` stubs rather than errors.
    pub fn mark_from_record(&self, r: &MarkRecord) -> Result<Mark, MarkError> {
        let sample = *self.nearest_sample(r.position);
        let mark = match r.kind.as_str() {
            "Climb" => {
                let start = require(r, r.start_position, "startPosition")?;
                check_span(r, start, r.position)?;
                Mark::climb(
                    r.name.clone(),
                    r.position,
                    sample,
                    start,
                    *self.nearest_sample(start),
                    r.category,
                    self.total_km(),
                )
                .with_souvenir(r.souvenir.clone().unwrap_or_default())
            }
            "Sector" | "SteepPart" => {
                let end = require(r, r.end_position, "endPosition")?;
                check_span(r, r.position, end)?;
                let end_sample = *self.nearest_sample(end);
                if r.kind == "Sector" {
                    Mark::sector(r.name.clone(), r.position, sample, end, end_sample)
                } else {
                    Mark::steep_part(r.name.clone(), r.position, sample, end, end_sample)
                }
            }
            "Sprint" => Mark::new(r.name.clone(), r.position, sample, MarkKind::Sprint),
            "Intermediate" => Mark::new(r.name.clone(), r.position, sample, MarkKind::Intermediate),
            "Town" => Mark::new(r.name.clone(), r.position, sample, MarkKind::Town),
            "Departement" => Mark::new(r.name.clone(), r.position, sample, MarkKind::Departement),
            other => {
                warn!(route = %self.name, kind = other, name = %r.name, "unknown mark type, keeping a stub");
                Mark::new(r.name.clone(), r.position, sample, MarkKind::Unknown(other.to_string()))
            }
        };
        Ok(mark)
    }

    /// Takes over the document's route fields and replaces all marks.
    /// Records that cannot be built are skipped and listed in the report.
    pub fn load_meta(&mut self, meta: &TrackMeta) -> ImportReport {
        let mut report = ImportReport::default();
        let mut marks = Vec::with_capacity(meta.marks.len());
        for (index, r) in meta.marks.iter().enumerate() {
            match self.mark_from_record(r) {
                Ok(m) => {
                    if let MarkKind::Unknown(kind) = &m.kind {
                        report.issues.push(ImportIssue::UnknownType { index, kind: kind.clone() });
                    }
                    marks.push(m);
                }
                Err(error) => {
                    warn!(route = %self.name, index, %error, "skipping mark record");
                    report.issues.push(ImportIssue::Rejected { index, error });
                }
            }
        }
        self.set_route_fields(meta);
        self.replace_marks(marks);
        report
    }

    /// Like `load_meta`, but the first malformed record aborts the import and
    /// leaves the route untouched.
    pub fn try_load_meta(&mut self, meta: &TrackMeta) -> Result<ImportReport, MarkError> {
        let mut report = ImportReport::default();
        let mut marks = Vec::with_capacity(meta.marks.len());
        for (index, r) in meta.marks.iter().enumerate() {
            let m = self.mark_from_record(r)?;
            if let MarkKind::Unknown(kind) = &m.kind {
                report.issues.push(ImportIssue::UnknownType { index, kind: kind.clone() });
            }
            marks.push(m);
        }
        self.set_route_fields(meta);
        self.replace_marks(marks);
        Ok(report)
    }

    pub fn export_meta(&self) -> TrackMeta {
        TrackMeta {
            departure: self.departure.clone(),
            arrival: self.arrival.clone(),
            is_time_trial: self.is_time_trial,
            marks: self.marks.iter().map(export_mark).collect(),
        }
    }

    fn set_route_fields(&mut self, meta: &TrackMeta) {
        self.departure = meta.departure.clone();
        self.arrival = meta.arrival.clone();
        self.is_time_trial = meta.is_time_trial;
    }
}

fn export_mark(m: &Mark) -> MarkRecord {
    let mut r = MarkRecord::new(m.type_name(), m.label.clone(), m.position);
    match &m.kind {
        MarkKind::Climb(c) => {
            r.souvenir = Some(c.souvenir.clone());
            r.start_position = Some(c.start_position);
            r.category = Some(c.category);
        }
        MarkKind::Sector(span) | MarkKind::SteepPart(span) => {
            r.end_position = Some(span.end_position);
        }
        MarkKind::Sprint
        | MarkKind::Intermediate
        | MarkKind::Town
        | MarkKind::Departement
        | MarkKind::Unknown(_) => {}
    }
    r
}

fn sort_by_position(marks: &mut [Mark]) {
    marks.sort_by(|a, b| a.position.total_cmp(&b.position));
}

fn require(r: &MarkRecord, value: Option<f64>, field: &'static str) -> Result<f64, MarkError> {
    value.ok_or_else(|| MarkError::MissingField { kind: r.kind.clone(), name: r.name.clone(), field })
}

fn check_span(r: &MarkRecord, start: f64, end: f64) -> Result<(), MarkError> {
    if start < end {
        Ok(())
    } else {
        Err(MarkError::InvalidSpan { kind: r.kind.clone(), name: r.name.clone(), start, end })
    }
}
