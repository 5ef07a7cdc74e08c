//! Plain-text table layout shared by the inspection reports.

/// Columns are padded to their widest cell plus this many spaces.
pub const DEFAULT_COLUMN_GAP: usize = 4;

/// Monotonic row/footnote counter with an explicit reset point.
///
/// One `Sequence` is owned per document build and threaded through every
/// table rendered into that document, so numbering continues across tables
/// and starts over only when the caller calls [`Sequence::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    start: u64,
    next: u64,
}

impl Sequence {
    pub fn new(start: u64) -> Self {
        Self { start, next: start }
    }

    /// Hand out the current number and advance.
    pub fn next_value(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }

    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = self.start;
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Left-aligned, width-padded text table.
#[derive(Debug, Clone)]
pub struct TableLayout {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    gap: usize,
}

impl TableLayout {
    pub fn new<I, S>(headers: I, gap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            gap,
        }
    }

    /// Rows shorter than the header are padded with empty cells.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len().max(row.len()), String::new());
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header line, a `=` rule as wide as the padded columns, then rows.
    /// Trailing padding is trimmed from every line.
    ///
    /// With `numbering`, a leading `#` column is added and filled from the
    /// sequence, which keeps counting across calls.
    pub fn render(&self, numbering: Option<&mut Sequence>) -> String {
        let mut headers = self.headers.clone();
        let mut rows = self.rows.clone();
        if let Some(seq) = numbering {
            headers.insert(0, "#".to_string());
            for row in &mut rows {
                row.insert(0, seq.next_value().to_string());
            }
        }

        let widths: Vec<usize> = (0..headers.len())
            .map(|col| {
                let cells = rows
                    .iter()
                    .filter_map(|r| r.get(col))
                    .map(|c| c.chars().count());
                cells
                    .chain(std::iter::once(headers[col].chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(1)
                    + self.gap
            })
            .collect();

        let mut out = String::new();
        out.push_str(&format_line(&headers, &widths));
        out.push('\n');
        out.push_str(&"=".repeat(widths.iter().sum()));
        out.push('\n');
        for row in &rows {
            out.push_str(&format_line(row, &widths));
            out.push('\n');
        }
        out
    }
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (cell, &width) in cells.iter().zip(widths) {
        line.push_str(&format!("{:<width$}", cell, width = width));
    }
    line.trim_end().to_string()
}
