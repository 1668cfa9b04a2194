// Reader for the whitespace-aligned text tables embedded in the stats caches.
//
// Columns are separated by runs of two or more spaces (tabs count as two), so
// single spaces inside a cell such as "Strike Rate" or "Eden Gardens, Kolkata"
// survive. Rows may carry one extra leading field: a printed row index.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table has no header row")]
    Empty,

    #[error("row {line} has {found} fields, header has {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("table has no `{0}` column")]
    MissingColumn(String),
}

/// A parsed table: a header and rows of raw cell text.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn split_cells(line: &str) -> Vec<String> {
    line.replace('\t', "  ")
        .split("  ")
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a numeric cell. A trailing `*` (not-out marker) is ignored; dashes
/// and other placeholders read as missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim().trim_end_matches('*').replace(',', "");
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Table {
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header_line) = lines.next().ok_or(TableError::Empty)?;
        let headers = split_cells(header_line);
        if headers.is_empty() {
            return Err(TableError::Empty);
        }

        let mut rows = Vec::new();
        for (idx, line) in lines {
            let mut cells = split_cells(line);
            if cells.len() == headers.len() + 1 {
                cells.remove(0);
            }
            if cells.len() != headers.len() {
                return Err(TableError::RaggedRow {
                    line: idx + 1,
                    expected: headers.len(),
                    found: cells.len(),
                });
            }
            rows.push(cells);
        }

        Ok(Table { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column, matched case-insensitively with `_` and space equal.
    pub fn column(&self, name: &str) -> Option<usize> {
        let norm = |s: &str| s.trim().to_lowercase().replace('_', " ");
        let wanted = norm(name);
        self.headers.iter().position(|h| norm(h) == wanted)
    }

    pub fn require(&self, name: &str) -> Result<usize, TableError> {
        self.column(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Numeric value of a cell, `None` when absent or not a number.
    pub fn number(&self, row: usize, col: Option<usize>) -> Option<f64> {
        col.and_then(|c| self.cell(row, c)).and_then(parse_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENUE: &str = "\
   venue                              Matches  Runs  Strike_Rate  Average
0  Wankhede Stadium, Mumbai           12       410   148.55       37.27
1  Eden Gardens, Kolkata              5        96    121.52       19.20
";

    #[test]
    fn index_column_is_dropped() {
        let t = Table::parse(VENUE).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.column("venue"), Some(0));
        let venue = t.require("venue").unwrap();
        assert_eq!(t.cell(1, venue), Some("Eden Gardens, Kolkata"));
        assert_eq!(t.number(0, t.column("Strike Rate")), Some(148.55));
    }

    #[test]
    fn rows_without_index_parse_too() {
        let text = "Opposition  Runs  Strike Rate\nv MI  45*  150.0\nv CSK  -  0\n";
        let t = Table::parse(text).unwrap();
        assert_eq!(t.len(), 2);
        let runs = t.column("Runs");
        assert_eq!(t.number(0, runs), Some(45.0));
        assert_eq!(t.number(1, runs), None);
        assert_eq!(t.number(0, t.column("strike rate")), Some(150.0));
    }

    #[test]
    fn ragged_row_is_an_error() {
        let text = "A  B  C\n1  2\n";
        assert_eq!(
            Table::parse(text),
            Err(TableError::RaggedRow {
                line: 2,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn empty_text_is_an_error() {
        assert_eq!(Table::parse("  \n\n"), Err(TableError::Empty));
    }

    #[test]
    fn missing_column_is_reported() {
        let t = Table::parse("A  B\n1  2\n").unwrap();
        assert_eq!(t.require("Economy"), Err(TableError::MissingColumn("Economy".into())));
        assert_eq!(t.number(0, t.column("Economy")), None);
    }

    #[test]
    fn number_parsing() {
        assert_eq!(parse_number(" 7.25 "), Some(7.25));
        assert_eq!(parse_number("1,024"), Some(1024.0));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("DNB"), None);
    }
}
