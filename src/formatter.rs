//! Output formatters for layout tables.
//!
//! This module provides trait-based formatters for rendering layout
//! results in various output formats (ASCII grid, CSV, Markdown,
//! AsciiDoc), optionally transposed. The core produces only the cell
//! strings; everything here is presentation.

use crate::types::LayoutTable;

/// Trait for formatting layout tables.
///
/// Implementors render a single table; the default `format_tables`
/// concatenates all block tables with their captions.
pub trait TableFormatter {
    /// Whether rows and columns should be swapped before rendering.
    fn transpose(&self) -> bool;

    /// Render one table, caption included.
    fn format_table(&self, table: &LayoutTable) -> String;

    /// Render a sequence of block tables.
    fn format_tables(&self, tables: &[LayoutTable]) -> String {
        let mut parts = Vec::with_capacity(tables.len());
        for table in tables {
            if self.transpose() {
                parts.push(self.format_table(&table.transposed()));
            } else {
                parts.push(self.format_table(table));
            }
        }
        parts.join("\n")
    }
}

/// Header label plus rows, each prefixed with its row label.
fn header_and_rows(table: &LayoutTable) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = Vec::with_capacity(table.col_labels.len() + 1);
    header.push(table.corner.clone());
    header.extend(table.col_labels.iter().cloned());
    let rows = table
        .row_labels
        .iter()
        .zip(&table.cells)
        .map(|(label, cells)| {
            let mut row = Vec::with_capacity(cells.len() + 1);
            row.push(label.clone());
            row.extend(cells.iter().cloned());
            row
        })
        .collect();
    (header, rows)
}

/// Plain ASCII grid with `+-|` borders.
#[derive(Debug, Clone, Default)]
pub struct AsciiFormatter {
    /// Swap rows and columns.
    pub transpose: bool,
}

impl TableFormatter for AsciiFormatter {
    fn transpose(&self) -> bool {
        self.transpose
    }

    fn format_table(&self, table: &LayoutTable) -> String {
        let (header, rows) = header_and_rows(table);
        let mut widths: Vec<usize> = header.iter().map(String::len).collect();
        for row in &rows {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.len());
            }
        }

        let rule: String = {
            let mut s = String::from("+");
            for w in &widths {
                s.push_str(&"-".repeat(w + 2));
                s.push('+');
            }
            s
        };
        let render_row = |row: &[String]| -> String {
            let mut s = String::from("|");
            for (idx, cell) in row.iter().enumerate() {
                s.push_str(&format!(" {:1$} |", cell, widths[idx]));
            }
            s
        };

        let mut out = String::new();
        out.push_str(&table.caption);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&render_row(&header));
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for row in &rows {
            out.push_str(&render_row(row));
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }
}

/// RFC-4180-style CSV; the caption becomes a single-cell first record.
#[derive(Debug, Clone, Default)]
pub struct CsvFormatter {
    /// Swap rows and columns.
    pub transpose: bool,
}

fn csv_escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

impl TableFormatter for CsvFormatter {
    fn transpose(&self) -> bool {
        self.transpose
    }

    fn format_table(&self, table: &LayoutTable) -> String {
        let (header, rows) = header_and_rows(table);
        let mut out = String::new();
        out.push_str(&csv_escape(&table.caption));
        out.push('\n');
        let mut push_row = |row: &[String]| {
            let joined: Vec<String> = row.iter().map(|c| csv_escape(c)).collect();
            out.push_str(&joined.join(","));
            out.push('\n');
        };
        push_row(&header);
        for row in &rows {
            push_row(row);
        }
        out
    }
}

/// GitHub-flavored Markdown table.
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    /// Swap rows and columns.
    pub transpose: bool,
}

fn markdown_escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}

impl TableFormatter for MarkdownFormatter {
    fn transpose(&self) -> bool {
        self.transpose
    }

    fn format_table(&self, table: &LayoutTable) -> String {
        let (header, rows) = header_and_rows(table);
        let mut out = String::new();
        out.push_str(&format!("**{}**\n\n", table.caption));
        let render = |row: &[String]| -> String {
            let cells: Vec<String> = row.iter().map(|c| markdown_escape(c)).collect();
            format!("| {} |", cells.join(" | "))
        };
        out.push_str(&render(&header));
        out.push('\n');
        out.push_str(&format!(
            "|{}|",
            header.iter().map(|_| " --- ").collect::<Vec<_>>().join("|")
        ));
        out.push('\n');
        for row in &rows {
            out.push_str(&render(row));
            out.push('\n');
        }
        out
    }
}

/// AsciiDoc table block.
#[derive(Debug, Clone, Default)]
pub struct AsciiDocFormatter {
    /// Swap rows and columns.
    pub transpose: bool,
}

impl TableFormatter for AsciiDocFormatter {
    fn transpose(&self) -> bool {
        self.transpose
    }

    fn format_table(&self, table: &LayoutTable) -> String {
        let (header, rows) = header_and_rows(table);
        let mut out = String::new();
        out.push_str(&format!(".{}\n", table.caption));
        out.push_str("[options=\"header\"]\n");
        out.push_str("|===\n");
        let render = |row: &[String]| -> String {
            row.iter()
                .map(|c| format!("|{}", c))
                .collect::<Vec<_>>()
                .join(" ")
        };
        out.push_str(&render(&header));
        out.push('\n');
        for row in &rows {
            out.push_str(&render(row));
            out.push('\n');
        }
        out.push_str("|===\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> LayoutTable {
        LayoutTable {
            caption: "Block 0".to_string(),
            corner: "A[i][k]".to_string(),
            col_labels: vec!["k=0".to_string(), "k=1".to_string()],
            row_labels: vec!["i=0".to_string(), "i=1".to_string()],
            cells: vec![
                vec!["v0{0}".to_string(), "v0{4}".to_string()],
                vec!["v0{1}".to_string(), "v0{5}".to_string()],
            ],
        }
    }

    #[test]
    fn test_ascii_grid() {
        let out = AsciiFormatter::default().format_table(&sample());
        assert!(out.starts_with("Block 0\n+"));
        assert!(out.contains("| A[i][k] | k=0   | k=1   |"));
        assert!(out.contains("| i=1     | v0{1} | v0{5} |"));
    }

    #[test]
    fn test_csv_output() {
        let out = CsvFormatter::default().format_table(&sample());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Block 0");
        assert_eq!(lines[1], "A[i][k],k=0,k=1");
        assert_eq!(lines[2], "i=0,v0{0},v0{4}");
    }

    #[test]
    fn test_csv_escapes_commas() {
        assert_eq!(csv_escape("K[0][0], K[0][1]"), "\"K[0][0], K[0][1]\"");
        assert_eq!(csv_escape("v0{0}"), "v0{0}");
    }

    #[test]
    fn test_markdown_output() {
        let out = MarkdownFormatter::default().format_table(&sample());
        assert!(out.contains("**Block 0**"));
        assert!(out.contains("| A[i][k] | k=0 | k=1 |"));
        assert!(out.contains("| --- | --- | --- |"));
    }

    #[test]
    fn test_asciidoc_output() {
        let out = AsciiDocFormatter::default().format_table(&sample());
        assert!(out.starts_with(".Block 0\n"));
        assert!(out.contains("|===\n"));
        assert!(out.contains("|i=0 |v0{0} |v0{4}"));
    }

    #[test]
    fn test_transpose_swaps_axes() {
        let fmt = CsvFormatter { transpose: true };
        let out = fmt.format_tables(&[sample()]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "A[i][k],i=0,i=1");
        assert_eq!(lines[2], "k=0,v0{0},v0{1}");
    }
}
