use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

// ── Effort ────────────────────────────────────────────────────────────────────

/// One athlete's attempt at a segment, as listed on the leaderboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Effort {
    pub rank: Option<u32>,
    pub name: String,
    pub activity_id: Option<String>,
    pub elapsed: ElapsedTime,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ElapsedTime {
    Seconds(u32),
    /// Link text that matched no known time format, kept verbatim.
    Unparsed(String),
}

impl ElapsedTime {
    pub fn seconds(&self) -> Option<u32> {
        match self {
            ElapsedTime::Seconds(s) => Some(*s),
            ElapsedTime::Unparsed(_) => None,
        }
    }
}

// ── Row diagnostics ───────────────────────────────────────────────────────────

/// Why a leaderboard row did not turn into a clean effort.
#[derive(Debug, Clone, Error, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowIssue {
    #[error("expected at least 2 cells, found {found}")]
    TooFewCells { found: usize },

    #[error("no cell links to an activity")]
    MissingActivityLink,

    #[error("unrecognised time {raw:?}")]
    UnparsedTime { raw: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RowWarning {
    /// Zero-based index among data rows (header excluded).
    pub row: usize,
    pub issue: RowIssue,
}

// ── Leaderboards ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Leaderboard {
    pub efforts: Vec<Effort>,
    pub warnings: Vec<RowWarning>,
}

impl Leaderboard {
    /// Current record holder: the first listed effort.
    pub fn kom(&self) -> Option<&Effort> {
        self.efforts.first()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentLeaderboard {
    pub segment_id: String,
    pub url: String,
    pub scraped_at: NaiveDateTime,
    #[serde(flatten)]
    pub leaderboard: Leaderboard,
}
