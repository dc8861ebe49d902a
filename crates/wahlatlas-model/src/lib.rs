#![forbid(unsafe_code)]

mod district;
mod fragment;
mod resolve;
mod result;
mod sources;
mod state;

pub const CRATE_NAME: &str = "wahlatlas-model";

pub use district::DistrictKey;
pub use fragment::Fragment;
pub use resolve::{resolve_district_id, ResolveError};
pub use result::{
    CandidateCard, ChartFragment, DistrictResult, ElectedRunnerUp, ElectionTableRow, StatItem,
    SvgFragment, ABSENT_CELL, UNNAMED_CHART_CLASS,
};
pub use sources::{render_url, source_descriptor, ExtractorKind, SourceDescriptor, UrlError};
pub use state::{StateKey, ValidationError};
