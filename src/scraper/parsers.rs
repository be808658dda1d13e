use crate::config::LeaderboardConfig;
use crate::error::LayoutError;
use crate::models::{Effort, ElapsedTime, Leaderboard, RowIssue, RowWarning};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::cleaner::{normalise_text, parse_elapsed, parse_rank};

// ── Layout ────────────────────────────────────────────────────────────────────

/// Compiled form of [`LeaderboardConfig`].
#[derive(Debug, Clone)]
pub struct LeaderboardLayout {
    heading_sel: Selector,
    heading: Option<String>,
    table_sel: Selector,
    row_sel: Selector,
    cell_sel: Selector,
    link_sel: Selector,
    rank_column: Option<usize>,
    name_column: usize,
    activity_path: String,
}

fn compile(field: &'static str, selector: &str) -> Result<Selector, LayoutError> {
    Selector::parse(selector).map_err(|e| LayoutError {
        field,
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

impl LeaderboardLayout {
    pub fn from_config(config: &LeaderboardConfig) -> Result<Self, LayoutError> {
        let heading = config
            .heading
            .as_deref()
            .map(normalise_text)
            .filter(|h| !h.is_empty());

        Ok(Self {
            heading_sel: compile("heading", &config.heading_selector)?,
            heading,
            table_sel: compile("table", &config.table_selector)?,
            row_sel: compile("row", "tr")?,
            cell_sel: compile("cell", "td")?,
            link_sel: compile("link", "a[href]")?,
            rank_column: config.rank_column,
            name_column: config.name_column,
            activity_path: config.activity_path.clone(),
        })
    }
}

// ── Locator ───────────────────────────────────────────────────────────────────

/// Find the leaderboard table: the element right after the configured
/// heading, or the first matching table when no heading is configured.
fn find_table<'a>(doc: &'a Html, layout: &LeaderboardLayout) -> Option<ElementRef<'a>> {
    let Some(wanted) = &layout.heading else {
        return doc.select(&layout.table_sel).next();
    };

    doc.select(&layout.heading_sel)
        .filter(|h| normalise_text(&h.text().collect::<String>()).eq_ignore_ascii_case(wanted))
        .find_map(|h| {
            h.next_siblings()
                .find_map(ElementRef::wrap)
                .filter(|table| layout.table_sel.matches(table))
        })
}

/// Data rows of the leaderboard, in page order, header row dropped.
///
/// An empty vec means either no leaderboard on the page or no entries in it.
pub fn locate_rows<'a>(doc: &'a Html, layout: &LeaderboardLayout) -> Vec<ElementRef<'a>> {
    let Some(table) = find_table(doc, layout) else {
        warn!("No leaderboard table found on page");
        return vec![];
    };

    table.select(&layout.row_sel).skip(1).collect()
}

// ── Rows ──────────────────────────────────────────────────────────────────────

/// Turn one leaderboard row into an effort.
///
/// The time link is looked up in every cell; the first link to an activity
/// with non-empty text wins. An unrecognised time still yields an effort,
/// with [`ElapsedTime::Unparsed`].
pub fn parse_row(row: ElementRef<'_>, layout: &LeaderboardLayout) -> Result<Effort, RowIssue> {
    let cells: Vec<ElementRef<'_>> = row.select(&layout.cell_sel).collect();

    if cells.len() < 2 {
        return Err(RowIssue::TooFewCells { found: cells.len() });
    }
    let Some(name_cell) = cells.get(layout.name_column) else {
        return Err(RowIssue::TooFewCells { found: cells.len() });
    };

    let name = normalise_text(&name_cell.text().collect::<String>());
    let rank = layout
        .rank_column
        .and_then(|i| cells.get(i))
        .and_then(|cell| parse_rank(&cell.text().collect::<String>()));

    for cell in &cells {
        for link in cell.select(&layout.link_sel) {
            let Some(activity_id) = link
                .value()
                .attr("href")
                .and_then(|href| activity_id_from_href(href, &layout.activity_path))
            else {
                continue;
            };

            let raw_time = link.inner_html().trim().to_string();
            if raw_time.is_empty() {
                continue;
            }

            let elapsed = match parse_elapsed(&raw_time) {
                Some(secs) => ElapsedTime::Seconds(secs),
                None => ElapsedTime::Unparsed(raw_time),
            };

            return Ok(Effort {
                rank,
                name,
                activity_id: Some(activity_id),
                elapsed,
            });
        }
    }

    Err(RowIssue::MissingActivityLink)
}

/// "/activities/123?foo" → "123"
///
/// The activity path must open the URL path; absolute links are reduced to
/// their path first.
fn activity_id_from_href(href: &str, activity_path: &str) -> Option<String> {
    let path = match Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href.to_string(),
    };
    let id: String = path
        .strip_prefix(activity_path)?
        .chars()
        .take_while(|c| !matches!(c, '/' | '?' | '#'))
        .collect();

    if id.is_empty() { None } else { Some(id) }
}

// ── Page ──────────────────────────────────────────────────────────────────────

/// Extract every effort from a segment page. Never fails: row problems are
/// reported in [`Leaderboard::warnings`].
pub fn extract_leaderboard(html: &str, layout: &LeaderboardLayout) -> Leaderboard {
    let doc = Html::parse_document(html);
    let mut board = Leaderboard::default();

    for (row, tr) in locate_rows(&doc, layout).into_iter().enumerate() {
        match parse_row(tr, layout) {
            Ok(effort) => {
                if let ElapsedTime::Unparsed(raw) = &effort.elapsed {
                    warn!("Row {}: could not parse time {:?} for {}", row, raw, effort.name);
                    board.warnings.push(RowWarning {
                        row,
                        issue: RowIssue::UnparsedTime { raw: raw.clone() },
                    });
                }
                board.efforts.push(effort);
            }
            Err(issue) => {
                warn!("Row {}: skipped ({})", row, issue);
                board.warnings.push(RowWarning { row, issue });
            }
        }
    }

    debug!(
        "{} efforts extracted, {} warnings",
        board.efforts.len(),
        board.warnings.len()
    );
    board
}

// ── Tests ─────────────────────────────────────────────────────────────────────
