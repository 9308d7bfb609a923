use crate::{gradient, Category, Sample};

/// Fields only a climb carries. `position` of the owning mark is the summit.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimbInfo {
    pub souvenir: String,
    pub start_position: f64,
    pub start_sample: Sample,
    pub gradient: f64,
    pub category: Category,
    pub is_final_climb: bool,
}

/// End of a sector or steep part; the owning mark holds the start.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanInfo {
    pub end_position: f64,
    pub end_sample: Sample,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MarkKind {
    Climb(ClimbInfo),
    Sector(SpanInfo),
    SteepPart(SpanInfo),
    Sprint,
    Intermediate,
    Town,
    Departement,
    /// Record of a type this version does not know; keeps the original type string.
    Unknown(String),
}

impl MarkKind {
    pub fn type_name(&self) -> &str {
        match self {
            MarkKind::Climb(_) => "Climb",
            MarkKind::Sector(_) => "Sector",
            MarkKind::SteepPart(_) => "SteepPart",
            MarkKind::Sprint => "Sprint",
            MarkKind::Intermediate => "Intermediate",
            MarkKind::Town => "Town",
            MarkKind::Departement => "Departement",
            MarkKind::Unknown(t) => t.as_str(),
        }
    }
}

/// A labeled point (or span) of interest along a route.
///
/// `position` is in km; `sample` is a copy of the profile sample nearest to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    pub label: String,
    pub position: f64,
    pub sample: Sample,
    pub kind: MarkKind,
}

impl Mark {
    pub fn new(label: impl Into<String>, position: f64, sample: Sample, kind: MarkKind) -> Self {
        Self { label: label.into(), position, sample, kind }
    }

    /// Climb from `start_sample` up to `sample`. Without an explicit category it is
    /// derived from the two samples. The caller guarantees `start_position < position`.
    pub fn climb(
        label: impl Into<String>,
        position: f64,
        sample: Sample,
        start_position: f64,
        start_sample: Sample,
        category: Option<Category>,
        total_km: f64,
    ) -> Self {
        let info = ClimbInfo {
            souvenir: String::new(),
            start_position,
            start_sample,
            gradient: gradient(&start_sample, &sample),
            category: category.unwrap_or_else(|| Category::between(&start_sample, &sample)),
            is_final_climb: total_km - position < 2.0,
        };
        Self::new(label, position, sample, MarkKind::Climb(info))
    }

    pub fn sector(label: impl Into<String>, position: f64, sample: Sample, end_position: f64, end_sample: Sample) -> Self {
        Self::new(label, position, sample, MarkKind::Sector(SpanInfo { end_position, end_sample }))
    }

    pub fn steep_part(label: impl Into<String>, position: f64, sample: Sample, end_position: f64, end_sample: Sample) -> Self {
        Self::new(label, position, sample, MarkKind::SteepPart(SpanInfo { end_position, end_sample }))
    }

    pub fn with_souvenir(mut self, souvenir: impl Into<String>) -> Self {
        if let MarkKind::Climb(info) = &mut self.kind {
            info.souvenir = souvenir.into();
        }
        self
    }

    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    pub fn climb_info(&self) -> Option<&ClimbInfo> {
        match &self.kind {
            MarkKind::Climb(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_final_climb(&self) -> bool {
        self.climb_info().is_some_and(|c| c.is_final_climb)
    }

    pub fn end_position(&self) -> Option<f64> {
        match &self.kind {
            MarkKind::Sector(span) | MarkKind::SteepPart(span) => Some(span.end_position),
            _ => None,
        }
    }

    /// Length in km of a climb, sector or steep part.
    pub fn length_km(&self) -> Option<f64> {
        match &self.kind {
            MarkKind::Climb(c) => Some(self.position - c.start_position),
            MarkKind::Sector(span) | MarkKind::SteepPart(span) => Some(span.end_position - self.position),
            _ => None,
        }
    }

    /// Percent grade of a climb (start to summit) or a steep part (start to end).
    pub fn gradient(&self) -> Option<f64> {
        match &self.kind {
            MarkKind::Climb(c) => Some(c.gradient),
            MarkKind::SteepPart(span) => Some(gradient(&self.sample, &span.end_sample)),
            _ => None,
        }
    }

    /// Text lines a renderer places next to the mark.
    pub fn caption(&self) -> Vec<String> {
        let with_elevation = format!("{} {:.0}m", self.label, self.sample.elevation);
        match &self.kind {
            MarkKind::Climb(c) => vec![
                with_elevation,
                format!("({:.1}km à {:.1}%)", self.position - c.start_position, c.gradient),
            ],
            MarkKind::Sector(span) => {
                vec![format!("{with_elevation} ({}m)", sector_meters(self.position, span.end_position))]
            }
            MarkKind::SteepPart(span) => vec![format!(
                "Entrée {:.1}km à {:.1}%",
                span.end_position - self.position,
                gradient(&self.sample, &span.end_sample)
            )],
            MarkKind::Sprint | MarkKind::Intermediate | MarkKind::Town => vec![with_elevation],
            MarkKind::Departement | MarkKind::Unknown(_) => vec![self.label.clone()],
        }
    }
}

/// Sector length in meters, on a 0.1 km step.
fn sector_meters(start_km: f64, end_km: f64) -> i64 {
    ((end_km - start_km) * 10.0).round() as i64 * 100
}
