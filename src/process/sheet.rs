// src/process/sheet.rs

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;
use tracing::{debug, instrument, trace};

/// The World Bank indicator sheet, after the fixed preamble has been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    /// From the "Last Updated Date" line of the preamble.
    pub last_updated: NaiveDate,
    /// Column names of the header row ("Country Name", "Country Code", ..., "1960", ...).
    pub headers: Vec<String>,
    /// One entry per country or aggregate, aligned with `headers`.
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Population figures lag the update date by one year.
    pub fn report_year(&self) -> i32 {
        self.last_updated.year() - 1
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Every line of the export ends with a stray comma, which would otherwise
/// become an empty last field. Drops one comma directly before `\r\n`, `\n`,
/// a bare `\r` or the end of input.
pub fn remove_trailing_comma(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ',' && matches!(chars.peek(), None | Some('\r') | Some('\n')) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Line-by-line reader over the preamble that can hand off the remainder to
/// the CSV reader. A line ends at `\r\n`, `\n` or a bare `\r`, the same set the
/// csv reader accepts for the body.
#[derive(Debug)]
pub struct LineCursor<'a> {
    remaining: &'a str,
    line_no: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            remaining: text,
            line_no: 0,
        }
    }

    /// Number of lines consumed so far.
    pub fn position(&self) -> usize {
        self.line_no
    }

    pub fn next_line(&mut self) -> Result<&'a str> {
        if self.remaining.is_empty() {
            bail!("unexpected end of input after line {}", self.line_no);
        }
        let (line, rest) = match self.remaining.find(|c: char| c == '\r' || c == '\n') {
            Some(idx) => {
                let after = &self.remaining[idx..];
                let width = if after.starts_with("\r\n") { 2 } else { 1 };
                (&self.remaining[..idx], &self.remaining[idx + width..])
            }
            None => (self.remaining, ""),
        };
        self.remaining = rest;
        self.line_no += 1;
        trace!(line_no = self.line_no, line, "read line");
        Ok(line)
    }

    /// Discard exactly `line_count` lines. Zero is rejected so that a
    /// miscounted layout never passes silently.
    pub fn skip_line(&mut self, line_count: usize) -> Result<()> {
        if line_count == 0 {
            bail!("skip_line needs a positive line count");
        }
        for _ in 0..line_count {
            let line = self
                .next_line()
                .with_context(|| format!("skipping {} line(s)", line_count))?;
            debug!(line_no = self.line_no, line, "skipped");
        }
        Ok(())
    }

    pub fn rest(&self) -> &'a str {
        self.remaining
    }
}

/// Parse the `"Last Updated Date","YYYY-MM-DD"` line (trailing comma already removed).
pub fn parse_last_updated(line: &str) -> Result<NaiveDate> {
    let fields: Vec<&str> = line.split(',').collect();
    let [_, date] = fields.as_slice() else {
        bail!(
            "expected 2 fields in update-date line, found {}: {:?}",
            fields.len(),
            line
        );
    };
    let date = clean_str(date);
    NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .with_context(|| format!("parsing last update date {:?}", date))
}

/// Trim whitespace and strip outer quotes if present.
fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse the decoded export. Layout, by position:
/// 1. data source (ignored)
/// 2. blank (ignored)
/// 3. `"Last Updated Date","YYYY-MM-DD"`
/// 4. blank (ignored)
/// 5. header row
/// 6. data rows
#[instrument(level = "info", skip(content), fields(len = content.len()))]
pub fn parse_sheet(content: &str) -> Result<Sheet> {
    let content = remove_trailing_comma(content);
    let mut cursor = LineCursor::new(&content);

    cursor.skip_line(2)?;
    let last_updated = parse_last_updated(cursor.next_line()?)
        .with_context(|| format!("line {}", cursor.position()))?;
    cursor.skip_line(1)?;

    let body = cursor.rest();
    let header_line = body.split(|c: char| c == '\r' || c == '\n').next().unwrap_or("");
    if header_line.trim().is_empty() {
        bail!("missing header row at line {}", cursor.position() + 1);
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .context("reading header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(%last_updated, columns = headers.len(), rows = rows.len(), "parsed sheet");
    Ok(Sheet {
        last_updated,
        headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\"Data Source\",\"World Development Indicators\",\r\n\
\r\n\
\"Last Updated Date\",\"2024-06-28\",\r\n\
\r\n\
\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"2022\",\"2023\",\r\n\
\"Aruba\",\"ABW\",\"Population, total\",\"SP.POP.TOTL\",\"107310\",\"107359\",\r\n\
\"Africa Eastern and Southern\",\"AFE\",\"Population, total\",\"SP.POP.TOTL\",\"720859132\",\"\",\r\n";

    #[test]
    fn remove_trailing_comma_is_idempotent() {
        let once = remove_trailing_comma(SAMPLE);
        let twice = remove_trailing_comma(&once);
        assert_eq!(once, twice);
        assert!(!once.contains(",\r\n"));
        assert!(once.contains("\"SP.POP.TOTL\",\"107310\",\"107359\"\r\n"));
    }

    #[test]
    fn remove_trailing_comma_handles_each_terminator() {
        assert_eq!(remove_trailing_comma("a,b,\r\nc,"), "a,b\r\nc");
        assert_eq!(remove_trailing_comma("a,\nb,\rc"), "a\nb\rc");
        assert_eq!(remove_trailing_comma("a,b"), "a,b");
    }

    #[test]
    fn skip_line_rejects_zero() {
        let mut cursor = LineCursor::new("a\nb\n");
        let err = cursor.skip_line(0).unwrap_err();
        assert!(err.to_string().contains("positive"), "{err}");
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn skip_line_past_end_is_an_error() {
        let mut cursor = LineCursor::new("only\n");
        assert!(cursor.skip_line(2).is_err());
    }

    #[test]
    fn cursor_strips_carriage_returns() -> Result<()> {
        let mut cursor = LineCursor::new("one\r\ntwo\nthree");
        cursor.skip_line(1)?;
        assert_eq!(cursor.next_line()?, "two");
        assert_eq!(cursor.rest(), "three");
        assert_eq!(cursor.next_line()?, "three");
        assert!(cursor.next_line().is_err());
        Ok(())
    }

    #[test]
    fn cursor_splits_on_bare_carriage_return() -> Result<()> {
        let mut cursor = LineCursor::new("one\rtwo\r\n\rthree\r");
        assert_eq!(cursor.next_line()?, "one");
        assert_eq!(cursor.next_line()?, "two");
        assert_eq!(cursor.next_line()?, "");
        assert_eq!(cursor.next_line()?, "three");
        assert_eq!(cursor.position(), 4);
        assert!(cursor.next_line().is_err());
        Ok(())
    }

    #[test]
    fn parses_carriage_return_only_file() -> Result<()> {
        let classic_mac = SAMPLE.replace("\r\n", "\r");
        let sheet = parse_sheet(&classic_mac)?;
        assert_eq!(sheet.report_year(), 2023);
        assert_eq!(sheet.headers.len(), 6);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0][1], "ABW");
        Ok(())
    }

    #[test]
    fn update_line_gives_report_year() -> Result<()> {
        let line = remove_trailing_comma("\"\",  \"2021-01-01\",");
        let date = parse_last_updated(&line)?;
        assert_eq!(date.year(), 2021);

        let content = "x\n\n\"\",  \"2021-01-01\",\n\n\"Country Code\",\"2020\",\n";
        let sheet = parse_sheet(content)?;
        assert_eq!(sheet.last_updated.year(), 2021);
        assert_eq!(sheet.report_year(), 2020);
        assert!(sheet.rows.is_empty());
        Ok(())
    }

    #[test]
    fn update_line_with_extra_field_fails() {
        assert!(parse_last_updated("\"Last Updated Date\",\"2021-01-01\",\"x\"").is_err());
        assert!(parse_last_updated("\"Last Updated Date\",\"January 2021\"").is_err());
    }

    #[test]
    fn parses_full_sample() -> Result<()> {
        let sheet = parse_sheet(SAMPLE)?;
        assert_eq!(sheet.last_updated, NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
        assert_eq!(sheet.report_year(), 2023);
        assert_eq!(sheet.headers.len(), 6);
        assert_eq!(sheet.column_index("Country Code"), Some(1));
        assert_eq!(sheet.column_index("2023"), Some(5));
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0][2], "Population, total");
        assert_eq!(sheet.rows[1][5], "");
        Ok(())
    }

    #[test]
    fn shifted_layout_is_a_parse_failure() {
        // the update-date line moved up by one
        let shifted = "\"Data Source\",\"WDI\",\r\n\"Last Updated Date\",\"2024-06-28\",\r\n\r\n\r\n\"Country Code\",\"2023\",\r\n";
        assert!(parse_sheet(shifted).is_err());
    }

    #[test]
    fn ragged_row_is_a_parse_failure() {
        let ragged = "a\n\n\"Last Updated Date\",\"2024-06-28\"\n\n\"Country Code\",\"2023\"\n\"ABW\"\n";
        assert!(parse_sheet(ragged).is_err());
    }
}
