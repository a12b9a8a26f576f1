//! Column-oriented numeric tables loaded from simulator sweep CSVs.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// A sweep result set: one header row naming the columns, then numeric rows.
///
/// Rows keep the file order so charts plot the sweep exactly as the
/// simulator emitted it. All columns share one row count by construction.
#[derive(Debug, Clone)]
pub struct ResultTable {
    headers: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ResultTable {
    /// Load a table from a CSV file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse a table from in-memory CSV text.
    ///
    /// The first non-blank line is the header; every following non-blank line
    /// must carry the same field count with all fields numeric. Simulator
    /// output is plain comma-separated numbers, so no quoting is handled.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut lines = raw.lines().enumerate();
        let header = loop {
            match lines.next() {
                Some((_, line)) if line.trim().is_empty() => continue,
                Some((_, line)) => break line,
                None => bail!("empty table: no header row"),
            }
        };

        let headers: Vec<String> = header.split(',').map(|h| h.trim().to_string()).collect();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

        for (lineno, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != headers.len() {
                bail!(
                    "line {}: expected {} fields, got {}",
                    lineno + 1,
                    headers.len(),
                    fields.len()
                );
            }
            for (column, field) in columns.iter_mut().zip(&fields) {
                let value: f64 = field.trim().parse().with_context(|| {
                    format!("line {}: invalid numeric value {:?}", lineno + 1, field.trim())
                })?;
                column.push(value);
            }
        }

        Ok(Self { headers, columns })
    }

    /// Number of data rows.
    pub fn rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Look up a column by header name. Missing columns are a schema error
    /// that names what was asked for and what the table actually has.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        let idx = self
            .headers
            .iter()
            .position(|h| h == name)
            .with_context(|| {
                format!("missing column {:?} (table has: {})", name, self.headers.join(", "))
            })?;
        Ok(&self.columns[idx])
    }
}
