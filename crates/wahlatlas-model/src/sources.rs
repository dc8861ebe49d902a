use crate::state::StateKey;
use std::fmt::{Display, Formatter};

/// Tags for the field extractors a source page supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractorKind {
    VoteTable,
    Statistics,
    Charts,
    ElectedRunnerUp,
    TurnoutChart,
    PartyShares,
    JsonAsset,
}

/// Immutable per-state source configuration, created once and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub state: StateKey,
    /// `{district}` is always substituted; `{stateNumber}` only exists in the
    /// federal template.
    pub url_template: &'static str,
    /// GeoJSON property carrying the district number for this state.
    pub district_property: &'static str,
    pub extractors: &'static [ExtractorKind],
    /// The NRW live page and the RLP JSON asset are served uncached.
    pub cacheable: bool,
}

static SH: SourceDescriptor = SourceDescriptor {
    state: StateKey::Sh,
    url_template: "https://www.wahlen-sh.de/ltw_2022/ergebnispraesentation_wahlkreis_{district}.html",
    district_property: "WKNR_int",
    extractors: &[
        ExtractorKind::VoteTable,
        ExtractorKind::Statistics,
        ExtractorKind::Charts,
        ExtractorKind::ElectedRunnerUp,
        ExtractorKind::TurnoutChart,
    ],
    cacheable: true,
};

static BREMEN: SourceDescriptor = SourceDescriptor {
    state: StateKey::Bremen,
    url_template: "https://www.wahlen-bremen.de/Wahlen/2023_05_14/ergebnisse_stadtbezirk_{district}.html",
    district_property: "nummer",
    extractors: &[
        ExtractorKind::VoteTable,
        ExtractorKind::Statistics,
        ExtractorKind::Charts,
        ExtractorKind::TurnoutChart,
    ],
    cacheable: true,
};

static BERLIN: SourceDescriptor = SourceDescriptor {
    state: StateKey::Berlin,
    url_template: "https://www.wahlen-berlin.de/wahlen/BE2023/AFSPRAES/agh/ergebnisse_wahlkreis_{district}.html",
    district_property: "parentNr",
    extractors: &[
        ExtractorKind::VoteTable,
        ExtractorKind::Statistics,
        ExtractorKind::Charts,
        ExtractorKind::ElectedRunnerUp,
        ExtractorKind::TurnoutChart,
    ],
    cacheable: true,
};

static BRANDENBURG: SourceDescriptor = SourceDescriptor {
    state: StateKey::Brandenburg,
    url_template: "https://wahlergebnisse.brandenburg.de/12/500/20240922/landtagswahl_land/ergebnisse_wahlkreis_{district}.html",
    district_property: "gebietNr",
    extractors: &[
        ExtractorKind::VoteTable,
        ExtractorKind::Statistics,
        ExtractorKind::Charts,
        ExtractorKind::ElectedRunnerUp,
        ExtractorKind::TurnoutChart,
    ],
    cacheable: true,
};

static BUNDESTAG: SourceDescriptor = SourceDescriptor {
    state: StateKey::Bundestag,
    url_template: "https://www.bundeswahlleiter.de/bundestagswahlen/2021/ergebnisse/bund-99/land-{stateNumber}/wahlkreis-{district}.html",
    district_property: "WKR_NR",
    extractors: &[
        ExtractorKind::VoteTable,
        ExtractorKind::Statistics,
        ExtractorKind::Charts,
    ],
    cacheable: true,
};

static NRW: SourceDescriptor = SourceDescriptor {
    state: StateKey::Nrw,
    url_template: "https://www.wahlergebnisse.nrw/landtagswahlen/2022/aktuell/a{district}lw2200.shtml",
    district_property: "LWKNR",
    extractors: &[ExtractorKind::PartyShares],
    cacheable: false,
};

static RLP: SourceDescriptor = SourceDescriptor {
    state: StateKey::Rlp,
    url_template: "https://wahlen.rlp-ltw-2021.23degrees.eu/assets/json/{district}.json",
    district_property: "code",
    extractors: &[ExtractorKind::JsonAsset],
    cacheable: false,
};

/// Exhaustive descriptor lookup; an unregistered state cannot exist.
#[must_use]
pub fn source_descriptor(state: StateKey) -> &'static SourceDescriptor {
    match state {
        StateKey::Sh => &SH,
        StateKey::Bremen => &BREMEN,
        StateKey::Berlin => &BERLIN,
        StateKey::Brandenburg => &BRANDENBURG,
        StateKey::Bundestag => &BUNDESTAG,
        StateKey::Nrw => &NRW,
        StateKey::Rlp => &RLP,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlError {
    MissingStateNumber { state: StateKey },
}

impl Display for UrlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStateNumber { state } => write!(
                f,
                "source url for state `{state}` requires a stateNumber parameter"
            ),
        }
    }
}

impl std::error::Error for UrlError {}

const DISTRICT_PLACEHOLDER: &str = "{district}";
const STATE_NUMBER_PLACEHOLDER: &str = "{stateNumber}";

pub fn render_url(
    descriptor: &SourceDescriptor,
    district: &str,
    state_number: Option<&str>,
) -> Result<String, UrlError> {
    let mut url = descriptor.url_template.replace(DISTRICT_PLACEHOLDER, district);
    if url.contains(STATE_NUMBER_PLACEHOLDER) {
        let Some(number) = state_number.map(str::trim).filter(|n| !n.is_empty()) else {
            return Err(UrlError::MissingStateNumber {
                state: descriptor.state,
            });
        };
        url = url.replace(STATE_NUMBER_PLACEHOLDER, number);
    }
    Ok(url)
}
