//! A1 range notation.
//!
//! Converts between row/column indices and the string ranges the Sheets API
//! accepts, such as `'Sheet1'!B2:C3`, `2:5`, `B:D` or `A5:A`.
//!
//! Rows and columns are 1-based, as in the spreadsheet UI. Negative indices
//! count from the end (`-1` is the last row or column) and can only be
//! rendered once the sheet's [`GridSize`] is known.
//!
//! ```
//! use gapiutils::sheets::a1::SheetSlice;
//!
//! let slice = SheetSlice::sheet("Sheet1").rows(2..=3).cols(2..=3);
//! assert_eq!(slice.to_a1(None).unwrap(), "'Sheet1'!B2:C3");
//!
//! let parsed: SheetSlice = "'Sheet1'!B2:C3".parse().unwrap();
//! assert_eq!(parsed, slice);
//! ```

use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GoogleError, Result};

/// Sheet addressed when a range names none.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Widest grid the Sheets API allows (column `ZZZ`).
pub const MAX_COLUMNS: u32 = 18278;

/// A single cell key, e.g. `B2`, `$B$2`, `B` or `2`.
static CELL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?([A-Za-z]*)\$?([0-9]*)$").expect("Invalid cell regex")
});

/// Convert a 1-based column number to letters: 1 = `A`, 26 = `Z`, 27 = `AA`.
pub fn column_to_letters(col: u32) -> Result<String> {
    if col == 0 {
        return Err(GoogleError::InvalidRange(
            "column numbers start at 1".to_string(),
        ));
    }

    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();

    Ok(String::from_utf8_lossy(&letters).into_owned())
}

/// Convert column letters to a 1-based column number: `A` = 1, `AA` = 27.
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(GoogleError::InvalidRange(format!(
            "invalid column letters '{}'",
            letters
        )));
    }

    let too_large = || GoogleError::InvalidRange(format!("column '{}' is too large", letters));

    let col = letters.bytes().try_fold(0u32, |acc, b| {
        acc.checked_mul(26)
            .and_then(|acc| acc.checked_add(u32::from(b.to_ascii_uppercase() - b'A') + 1))
            .ok_or_else(too_large)
    })?;

    if col > MAX_COLUMNS {
        return Err(too_large());
    }
    Ok(col)
}

/// Quote a sheet name, doubling any embedded single quotes.
pub fn quote_sheet_name(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

/// Prefix `range_name` with a quoted sheet name.
///
/// An empty range addresses the whole sheet.
pub fn format_range_name(range_name: &str, sheet_name: Option<&str>) -> String {
    match sheet_name {
        Some(sheet) if range_name.is_empty() => quote_sheet_name(sheet),
        Some(sheet) => format!("{}!{}", quote_sheet_name(sheet), range_name),
        None => range_name.to_string(),
    }
}

/// Format a single cell key, e.g. `(2, 3)` as `C2`.
pub fn number_to_a1(row: u32, col: u32, sheet_name: Option<&str>) -> Result<String> {
    if row == 0 {
        return Err(GoogleError::InvalidRange(
            "row numbers start at 1".to_string(),
        ));
    }
    let key = format!("{}{}", column_to_letters(col)?, row);
    Ok(format_range_name(&key, sheet_name))
}

/// Parse a cell key into `(row, column)`.
///
/// Row-only keys (`"5"`) and column-only keys (`"B"`) return `None` for the
/// missing side. Absolute markers (`$`) are ignored.
pub fn a1_to_rc(key: &str) -> Result<(Option<u32>, Option<u32>)> {
    let invalid = || GoogleError::InvalidRange(format!("invalid cell reference '{}'", key));

    let captures = CELL_REGEX.captures(key.trim()).ok_or_else(invalid)?;
    let letters = &captures[1];
    let digits = &captures[2];

    if letters.is_empty() && digits.is_empty() {
        return Err(invalid());
    }

    let col = if letters.is_empty() {
        None
    } else {
        Some(letters_to_column(letters)?)
    };
    let row = if digits.is_empty() {
        None
    } else {
        match digits.parse::<u32>() {
            Ok(0) | Err(_) => return Err(invalid()),
            Ok(row) => Some(row),
        }
    };

    Ok((row, col))
}

/// Number of rows and columns in a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

/// A row or column index: positive is 1-based, negative counts from the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Index(i32);

impl Index {
    pub fn new(ix: i32) -> Self {
        Self(ix)
    }

    pub fn get(&self) -> i32 {
        self.0
    }

    pub fn is_from_end(&self) -> bool {
        self.0 < 0
    }

    /// Resolve to a 1-based position, using `len` for negative indices.
    pub fn resolve(&self, len: Option<u32>) -> Result<u32> {
        match self.0 {
            0 => Err(GoogleError::InvalidRange(
                "index 0 is invalid, indices start at 1".to_string(),
            )),
            ix if ix > 0 => Ok(ix as u32),
            ix => {
                let len = len.ok_or_else(|| {
                    GoogleError::InvalidRange(format!(
                        "negative index {} needs the sheet size",
                        ix
                    ))
                })?;
                let back = ix.unsigned_abs();
                if back > len {
                    return Err(GoogleError::InvalidRange(format!(
                        "index {} is out of bounds for length {}",
                        ix, len
                    )));
                }
                Ok(len - back + 1)
            }
        }
    }
}

impl From<i32> for Index {
    fn from(ix: i32) -> Self {
        Self(ix)
    }
}

/// Inclusive span along one axis; `None` bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Option<Index>,
    pub end: Option<Index>,
}

impl Span {
    /// Both ends open.
    pub const FULL: Span = Span {
        start: None,
        end: None,
    };

    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        Self {
            start: start.map(Index),
            end: end.map(Index),
        }
    }

    /// Span covering a single row or column.
    pub fn single(ix: i32) -> Self {
        Self::new(Some(ix), Some(ix))
    }

    pub fn is_full(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    fn has_negative(&self) -> bool {
        self.start.is_some_and(|i| i.is_from_end()) || self.end.is_some_and(|i| i.is_from_end())
    }

    fn resolve(&self, len: Option<u32>) -> Result<(Option<u32>, Option<u32>)> {
        let start = self.start.map(|i| i.resolve(len)).transpose()?;
        let end = self.end.map(|i| i.resolve(len)).transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(GoogleError::InvalidRange(format!(
                    "span starts at {} but ends at {}",
                    start, end
                )));
            }
        }
        Ok((start, end))
    }
}

/// Inclusive index for an exclusive end bound.
fn exclusive_end(end: i32) -> Index {
    if end == 0 {
        Index(0)
    } else {
        Index(end.saturating_sub(1))
    }
}

impl From<i32> for Span {
    fn from(ix: i32) -> Self {
        Span::single(ix)
    }
}

impl From<Range<i32>> for Span {
    fn from(r: Range<i32>) -> Self {
        Span {
            start: Some(Index(r.start)),
            end: Some(exclusive_end(r.end)),
        }
    }
}

impl From<RangeInclusive<i32>> for Span {
    fn from(r: RangeInclusive<i32>) -> Self {
        Span::new(Some(*r.start()), Some(*r.end()))
    }
}

impl From<RangeFrom<i32>> for Span {
    fn from(r: RangeFrom<i32>) -> Self {
        Span::new(Some(r.start), None)
    }
}

impl From<RangeTo<i32>> for Span {
    fn from(r: RangeTo<i32>) -> Self {
        Span {
            start: None,
            end: Some(exclusive_end(r.end)),
        }
    }
}

impl From<RangeToInclusive<i32>> for Span {
    fn from(r: RangeToInclusive<i32>) -> Self {
        Span::new(None, Some(r.end))
    }
}

impl From<RangeFull> for Span {
    fn from(_: RangeFull) -> Self {
        Span::FULL
    }
}

impl FromStr for Span {
    type Err = GoogleError;

    /// Parse `"B"`, `"B:D"`, `"3"`, `"3:5"` or an open side such as `"B:"`.
    /// Letters are read as column numbers.
    fn from_str(s: &str) -> Result<Self> {
        fn bound(part: &str) -> Result<Option<Index>> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            if let Ok(n) = part.parse::<i32>() {
                return Ok(Some(Index(n)));
            }
            let col = letters_to_column(part)?;
            i32::try_from(col)
                .map(|c| Some(Index(c)))
                .map_err(|_| GoogleError::InvalidRange(format!("column '{}' is too large", part)))
        }

        match s.split_once(':') {
            Some((start, end)) => Ok(Span {
                start: bound(start)?,
                end: bound(end)?,
            }),
            None => {
                let ix = bound(s)?.ok_or_else(|| GoogleError::InvalidRange("empty span".into()))?;
                Ok(Span {
                    start: Some(ix),
                    end: Some(ix),
                })
            }
        }
    }
}

/// A sheet name together with a range inside it.
///
/// The range is either a row/column selection built with [`rows`](Self::rows)
/// and [`cols`](Self::cols), or a raw A1 string set with
/// [`range`](Self::range). A slice with neither addresses the whole sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SheetSlice {
    sheet_name: Option<String>,
    range_name: Option<String>,
    rows: Option<Span>,
    cols: Option<Span>,
}

impl SheetSlice {
    /// An empty slice: no sheet, whole range.
    pub fn new() -> Self {
        Self::default()
    }

    /// A whole sheet.
    pub fn sheet(name: impl Into<String>) -> Self {
        Self {
            sheet_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the sheet name.
    pub fn in_sheet(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Select rows. Replaces any raw range.
    pub fn rows(mut self, rows: impl Into<Span>) -> Self {
        self.rows = Some(rows.into());
        self.range_name = None;
        self
    }

    /// Select columns. Replaces any raw range.
    pub fn cols(mut self, cols: impl Into<Span>) -> Self {
        self.cols = Some(cols.into());
        self.range_name = None;
        self
    }

    /// Select a single cell.
    pub fn cell(self, row: i32, col: i32) -> Self {
        self.rows(row).cols(col)
    }

    /// Use a raw A1 range such as `"A1:B2"`. Replaces any row/column selection.
    pub fn range(mut self, range_name: impl Into<String>) -> Self {
        self.range_name = Some(range_name.into());
        self.rows = None;
        self.cols = None;
        self
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }

    pub fn range_name(&self) -> Option<&str> {
        self.range_name.as_deref()
    }

    pub fn row_span(&self) -> Option<Span> {
        self.rows
    }

    pub fn col_span(&self) -> Option<Span> {
        self.cols
    }

    /// Whether a range is selected (rows, columns or a raw range).
    pub fn has_range(&self) -> bool {
        self.range_name.is_some() || self.rows.is_some() || self.cols.is_some()
    }

    /// Narrow this slice by `inner`.
    ///
    /// The inner sheet name and range win where they are set; otherwise the
    /// outer ones are kept.
    pub fn slice(&self, inner: &SheetSlice) -> SheetSlice {
        let mut merged = if inner.has_range() {
            inner.clone()
        } else {
            SheetSlice {
                sheet_name: None,
                ..self.clone()
            }
        };
        merged.sheet_name = inner.sheet_name.clone().or_else(|| self.sheet_name.clone());
        merged
    }

    /// Whether rendering needs the sheet's grid size: negative indices, or an
    /// open end that A1 notation cannot express on its own.
    pub fn needs_grid(&self) -> bool {
        if self.range_name.is_some() {
            return false;
        }
        let rows = self.rows.unwrap_or(Span::FULL);
        let cols = self.cols.unwrap_or(Span::FULL);

        if rows.has_negative() || cols.has_negative() {
            return true;
        }
        match (rows.is_full(), cols.is_full()) {
            (true, true) => false,
            (false, true) => rows.end.is_none(),
            (true, false) => cols.end.is_none(),
            (false, false) => cols.end.is_none(),
        }
    }

    /// Render the slice in A1 notation.
    ///
    /// `grid` is needed when [`needs_grid`](Self::needs_grid) is true.
    pub fn to_a1(&self, grid: Option<GridSize>) -> Result<String> {
        let range = match self.range_name {
            Some(ref raw) => raw.clone(),
            None => self.grid_range(grid)?,
        };
        Ok(format_range_name(&range, self.sheet_name.as_deref()))
    }

    fn grid_range(&self, grid: Option<GridSize>) -> Result<String> {
        let rows = self.rows.unwrap_or(Span::FULL);
        let cols = self.cols.unwrap_or(Span::FULL);

        let (r1, r2) = rows.resolve(grid.map(|g| g.rows))?;
        let (c1, c2) = cols.resolve(grid.map(|g| g.cols))?;

        let open_end = |axis: &str, len: Option<u32>| {
            len.ok_or_else(|| {
                GoogleError::InvalidRange(format!("open-ended {} need the sheet size", axis))
            })
        };

        match (rows.is_full(), cols.is_full()) {
            (true, true) => Ok(String::new()),
            (false, true) => {
                let end = match r2 {
                    Some(end) => end,
                    None => open_end("rows", grid.map(|g| g.rows))?,
                };
                Ok(format!("{}:{}", r1.unwrap_or(1), end))
            }
            (true, false) => {
                let end = match c2 {
                    Some(end) => end,
                    None => open_end("columns", grid.map(|g| g.cols))?,
                };
                Ok(format!(
                    "{}:{}",
                    column_to_letters(c1.unwrap_or(1))?,
                    column_to_letters(end)?
                ))
            }
            (false, false) => {
                let start = number_to_a1(r1.unwrap_or(1), c1.unwrap_or(1), None)?;
                let end_col = match c2 {
                    Some(end) => end,
                    None => open_end("columns", grid.map(|g| g.cols))?,
                };
                // An open row end stays open: `A5:A` runs to the last row.
                let end = match r2 {
                    Some(row) => number_to_a1(row, end_col, None)?,
                    None => column_to_letters(end_col)?,
                };
                if start == end {
                    Ok(start)
                } else {
                    Ok(format!("{}:{}", start, end))
                }
            }
        }
    }
}

impl From<&str> for SheetSlice {
    /// A bare sheet name.
    fn from(sheet_name: &str) -> Self {
        SheetSlice::sheet(sheet_name)
    }
}

impl From<String> for SheetSlice {
    fn from(sheet_name: String) -> Self {
        SheetSlice::sheet(sheet_name)
    }
}

impl fmt::Display for SheetSlice {
    /// Render without a grid size, falling back to the whole sheet (or
    /// [`DEFAULT_SHEET_NAME`] when no sheet is set) when the selection cannot
    /// be expressed without one.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_a1(None) {
            Ok(a1) => f.write_str(&a1),
            Err(_) => {
                let sheet = self.sheet_name.as_deref().unwrap_or(DEFAULT_SHEET_NAME);
                f.write_str(&format_range_name("", Some(sheet)))
            }
        }
    }
}

/// Split `'My Sheet'!A1:B2` into the unquoted sheet name and the remainder.
fn split_sheet(s: &str) -> Result<(Option<String>, Option<&str>)> {
    if let Some(rest) = s.strip_prefix('\'') {
        let mut name = String::new();
        let mut chars = rest.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c != '\'' {
                name.push(c);
                continue;
            }
            if let Some((_, '\'')) = chars.peek() {
                name.push('\'');
                chars.next();
                continue;
            }
            let after = &rest[i + 1..];
            return match after.strip_prefix('!') {
                Some(range) => Ok((Some(name), Some(range))),
                None if after.is_empty() => Ok((Some(name), None)),
                None => Err(GoogleError::InvalidRange(format!(
                    "unexpected '{}' after sheet name",
                    after
                ))),
            };
        }
        return Err(GoogleError::InvalidRange(format!(
            "unterminated sheet name in '{}'",
            s
        )));
    }

    match s.split_once('!') {
        Some((sheet, range)) => Ok((Some(sheet.to_string()), Some(range))),
        None => Ok((None, Some(s))),
    }
}

/// Parse a range body such as `B2:C3`, `2:5`, `B:D` or `A5:A` into spans.
fn parse_range(range: &str) -> Result<(Option<Span>, Option<Span>)> {
    let (start, end) = match range.split_once(':') {
        Some((start, end)) => (a1_to_rc(start)?, a1_to_rc(end)?),
        None => {
            let key = a1_to_rc(range)?;
            (key, key)
        }
    };

    let to_i32 = |v: Option<u32>| -> Result<Option<i32>> {
        v.map(|v| {
            i32::try_from(v).map_err(|_| GoogleError::InvalidRange(format!("{} is too large", v)))
        })
        .transpose()
    };

    let rows = match (start.0, end.0) {
        (None, None) => None,
        (r1, r2) => Some(Span::new(to_i32(r1)?, to_i32(r2)?)),
    };
    let cols = match (start.1, end.1) {
        (None, None) => None,
        (c1, c2) => Some(Span::new(to_i32(c1)?, to_i32(c2)?)),
    };
    Ok((rows, cols))
}

impl FromStr for SheetSlice {
    type Err = GoogleError;

    /// Parse A1 notation back into a slice.
    ///
    /// A string without `!` that is not a valid range is read as a sheet name.
    /// Unquoted names of up to three letters, or letters followed by digits,
    /// are valid ranges: `Jan` is columns `JAN:JAN` and `Q1` is a cell. Quote
    /// such sheet names (`'Jan'`, `'Q1'`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(SheetSlice::new());
        }

        let (sheet_name, range) = split_sheet(s)?;

        let Some(range) = range.filter(|r| !r.is_empty()) else {
            return Ok(SheetSlice {
                sheet_name,
                ..SheetSlice::default()
            });
        };

        match parse_range(range) {
            Ok((rows, cols)) => Ok(SheetSlice {
                sheet_name,
                range_name: None,
                rows,
                cols,
            }),
            Err(_) if sheet_name.is_none() => Ok(SheetSlice::sheet(range)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(1).unwrap(), "A");
        assert_eq!(column_to_letters(26).unwrap(), "Z");
        assert_eq!(column_to_letters(27).unwrap(), "AA");
        assert_eq!(column_to_letters(52).unwrap(), "AZ");
        assert_eq!(column_to_letters(702).unwrap(), "ZZ");
        assert_eq!(column_to_letters(703).unwrap(), "AAA");
        assert!(column_to_letters(0).is_err());
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(letters_to_column("A").unwrap(), 1);
        assert_eq!(letters_to_column("z").unwrap(), 26);
        assert_eq!(letters_to_column("AA").unwrap(), 27);
        assert_eq!(letters_to_column("ZZ").unwrap(), 702);
        assert!(letters_to_column("").is_err());
        assert!(letters_to_column("A1").is_err());
        assert!(letters_to_column("AAAA").is_err());
    }

    #[test]
    fn test_letters_roundtrip_through_boundaries() {
        for col in [1, 25, 26, 27, 51, 52, 53, 676, 677, 702, 703, 18278] {
            let letters = column_to_letters(col).unwrap();
            assert_eq!(letters_to_column(&letters).unwrap(), col, "{}", letters);
        }
    }

    #[test]
    fn test_number_to_a1() {
        assert_eq!(number_to_a1(2, 3, None).unwrap(), "C2");
        assert_eq!(number_to_a1(1, 1, Some("Sheet1")).unwrap(), "'Sheet1'!A1");
        assert!(number_to_a1(0, 1, None).is_err());
    }

    #[test]
    fn test_a1_to_rc() {
        assert_eq!(a1_to_rc("B2").unwrap(), (Some(2), Some(2)));
        assert_eq!(a1_to_rc("$AA$10").unwrap(), (Some(10), Some(27)));
        assert_eq!(a1_to_rc("5").unwrap(), (Some(5), None));
        assert_eq!(a1_to_rc("c").unwrap(), (None, Some(3)));
        assert!(a1_to_rc("").is_err());
        assert!(a1_to_rc("A0").is_err());
        assert!(a1_to_rc("2B").is_err());
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Sheet1"), "'Sheet1'");
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
        assert_eq!(format_range_name("", Some("Data")), "'Data'");
        assert_eq!(format_range_name("A1", None), "A1");
    }

    #[test]
    fn test_index_resolve() {
        assert_eq!(Index::new(3).resolve(None).unwrap(), 3);
        assert_eq!(Index::new(-1).resolve(Some(10)).unwrap(), 10);
        assert_eq!(Index::new(-10).resolve(Some(10)).unwrap(), 1);
        assert!(Index::new(-11).resolve(Some(10)).is_err());
        assert!(Index::new(-1).resolve(None).is_err());
        assert!(Index::new(0).resolve(Some(10)).is_err());
    }

    #[test]
    fn test_span_from_ranges() {
        assert_eq!(Span::from(4), Span::new(Some(4), Some(4)));
        assert_eq!(Span::from(2..5), Span::new(Some(2), Some(4)));
        assert_eq!(Span::from(2..=5), Span::new(Some(2), Some(5)));
        assert_eq!(Span::from(2..), Span::new(Some(2), None));
        assert_eq!(Span::from(..3), Span::new(None, Some(2)));
        assert_eq!(Span::from(..=3), Span::new(None, Some(3)));
        assert_eq!(Span::from(..), Span::FULL);
        assert_eq!(Span::from(1..-1), Span::new(Some(1), Some(-2)));
    }

    #[test]
    fn test_span_from_str() {
        assert_eq!("B".parse::<Span>().unwrap(), Span::single(2));
        assert_eq!("B:D".parse::<Span>().unwrap(), Span::new(Some(2), Some(4)));
        assert_eq!("3:".parse::<Span>().unwrap(), Span::new(Some(3), None));
        assert!("".parse::<Span>().is_err());
        assert!("B2".parse::<Span>().is_err());
    }
}
