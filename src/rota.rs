//! On-call rota retrieval and parsing.
//!
//! The rota is a published spreadsheet exported as CSV. Row 0 holds the
//! column titles (date column first, then Consultant, Day SpR, Night SpR),
//! row 1 is unused, and row 2 onwards are days starting from today.

use log::{debug, info};
use thiserror::Error;

/// Index of today's row in the sheet.
pub const FIRST_DAY_ROW: usize = 2;
/// Number of role columns after the date column.
pub const ROLE_COLUMNS: usize = 3;
/// Largest accepted day offset (0 = today, 1 = tomorrow).
pub const MAX_DAY_OFFSET: usize = 1;

#[derive(Debug, Error)]
pub enum RotaError {
    #[error("Failed to fetch rota: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rota request returned HTTP {0}")]
    Status(u16),

    #[error("Failed to parse rota CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No data found in the sheet.")]
    NoData,

    #[error("Rota has no row {0}")]
    MissingRow(usize),
}

/// Download the CSV export as text.
pub async fn fetch_csv(url: &str) -> Result<String, RotaError> {
    info!("Fetching rota from {}", url);
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RotaError::Status(status.as_u16()));
    }
    let body = response.text().await?;
    debug!("Fetched {} bytes of rota CSV", body.len());
    Ok(body)
}

/// Fetch and parse in one step.
pub async fn load(url: &str) -> Result<RotaSheet, RotaError> {
    let csv = fetch_csv(url).await?;
    RotaSheet::parse(&csv)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaEntry {
    pub role: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaDay {
    pub date: String,
    pub entries: Vec<RotaEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaSheet {
    rows: Vec<Vec<String>>,
}

impl RotaSheet {
    /// Rows are counted by line, so a blank line still occupies its row.
    pub fn parse(text: &str) -> Result<Self, RotaError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RotaError::NoData);
        }

        let rows = trimmed
            .split('\n')
            .map(|line| parse_row(line.strip_suffix('\r').unwrap_or(line)))
            .collect::<Result<Vec<_>, _>>()?;

        if rows.len() < 2 {
            return Err(RotaError::NoData);
        }
        debug!("Parsed rota with {} row(s)", rows.len());
        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Role titles from the header row, date column skipped.
    pub fn headers(&self) -> Vec<String> {
        self.rows[0].iter().skip(1).take(ROLE_COLUMNS).cloned().collect()
    }

    /// The rota for `offset` days from today.
    pub fn day(&self, offset: usize) -> Result<RotaDay, RotaError> {
        let index = FIRST_DAY_ROW + offset;
        let row = self.rows.get(index).ok_or(RotaError::MissingRow(index))?;
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();

        let entries = self
            .headers()
            .into_iter()
            .enumerate()
            .map(|(i, role)| RotaEntry { role, name: cell(i + 1) })
            .collect();

        Ok(RotaDay { date: cell(0), entries })
    }
}

fn parse_row(line: &str) -> Result<Vec<String>, RotaError> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut reader =
        csv::ReaderBuilder::new().has_headers(false).flexible(true).from_reader(line.as_bytes());
    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(|cell| cell.trim().to_string()).collect()),
        None => Ok(Vec::new()),
    }
}

/// Day selector passed to the widget (`0` today, `1` tomorrow).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetParameter {
    pub offset: usize,
    /// Set when a number outside the accepted range was given.
    pub invalid: bool,
}

impl WidgetParameter {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match leading_integer(raw) {
            Some(n) if (0..=MAX_DAY_OFFSET as i64).contains(&n) => {
                Self { offset: n as usize, invalid: false }
            }
            Some(n) => {
                debug!("Widget parameter {} out of range, showing today", n);
                Self { offset: 0, invalid: true }
            }
            None => Self::default(),
        }
    }
}

/// Integer at the start of `raw`, ignoring anything after it ("1 day" is 1).
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let digits_start = usize::from(raw.starts_with(['+', '-']));
    let digits_len = raw[digits_start..].bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }
    raw[..digits_start + digits_len].parse().ok()
}
