use serde::{Deserialize, Serialize};

use crate::date_utils::LAST_YEAR;
use crate::models::ledger::{Domain, Scaling};

/// How amounts are normalized for display.
///
/// `Total` and `Absolute` read the same ledger and only differ in how the
/// numbers are formatted; `PerCapita` reads the per-capita ledgers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    #[default]
    Total,
    PerCapita,
    Absolute,
}

impl Normalization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Normalization::Total => "total",
            Normalization::PerCapita => "per_capita",
            Normalization::Absolute => "absolute",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "total" => Some(Normalization::Total),
            "per_capita" => Some(Normalization::PerCapita),
            "absolute" => Some(Normalization::Absolute),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Normalization::Total => "In Miljarden",
            Normalization::PerCapita => "Per Persoon",
            Normalization::Absolute => "Volledig Bedrag",
        }
    }

    pub fn is_per_capita(&self) -> bool {
        matches!(self, Normalization::PerCapita)
    }

    pub fn all() -> &'static [Normalization] {
        &[
            Normalization::Total,
            Normalization::PerCapita,
            Normalization::Absolute,
        ]
    }
}

/// Drill-down position. The selected agency and bureau live inside the
/// variants so they cannot be present at the wrong level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum Level {
    #[default]
    Root,
    Agency {
        agency: String,
    },
    Bureau {
        agency: String,
        bureau: String,
    },
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Root => "root",
            Level::Agency { .. } => "agency",
            Level::Bureau { .. } => "bureau",
        }
    }
}

/// Distinguishes a view refresh from a drill-down click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Stay at the current level and re-read the figures.
    #[default]
    Refresh,
    /// Move one level down (or wrap to root) before reading.
    Advance,
}

/// Everything the dashboard needs to know to decide what to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub year: i32,
    pub domain: Domain,
    pub scaling: Scaling,
    pub normalization: Normalization,
    #[serde(flatten)]
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_drilled: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            year: LAST_YEAR,
            domain: Domain::Expenses,
            scaling: Scaling::Raw,
            normalization: Normalization::Total,
            level: Level::Root,
            last_drilled: None,
        }
    }
}

impl ViewState {
    pub fn selected_agency(&self) -> Option<&str> {
        match &self.level {
            Level::Root => None,
            Level::Agency { agency } | Level::Bureau { agency, .. } => Some(agency),
        }
    }

    pub fn selected_bureau(&self) -> Option<&str> {
        match &self.level {
            Level::Bureau { bureau, .. } => Some(bureau),
            _ => None,
        }
    }

    pub fn at_root(&self) -> bool {
        matches!(self.level, Level::Root)
    }

    /// Name of the agency or bureau currently shown, if any.
    pub fn level_name(&self) -> Option<&str> {
        self.selected_bureau().or_else(|| self.selected_agency())
    }
}
