//! Route profile and mark model used by climbmark

mod error;
mod grade;
mod mark;
mod meta;
mod profile;
mod route;

pub use error::{MarkError, ModelError};
pub use grade::{climb_value, gradient, Category};
pub use mark::{ClimbInfo, Mark, MarkKind, SpanInfo};
pub use meta::{MarkRecord, TrackMeta};
pub use profile::{Profile, Sample, DEFAULT_SMOOTHING_WINDOW};
pub use route::{ImportIssue, ImportReport, Route};
