//! CSV parsing for labelled numeric datasets.
//!
//! One sample per line: the first field is an integer class label, the rest
//! are numeric features (the MNIST-in-CSV layout). A first line containing
//! any non-numeric cell is treated as a header and skipped. Blank lines are
//! ignored. Double-quoted fields are accepted.

use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// Parses CSV text into an `N x (1 + F)` matrix, label in column 0.
///
/// Every label must be an integer in `[0, classes)` and every row must have
/// the same number of fields.
pub fn parse_csv(text: &str, classes: usize) -> Result<Matrix> {
    let mut lines = text.lines().enumerate().peekable();

    if let Some((_, first)) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut width: Option<usize> = None;
    let mut rows = 0usize;
    let mut data: Vec<f64> = Vec::new();

    for (idx, line) in lines {
        let line_num = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        if cells.len() < 2 {
            return Err(NetError::Parse(format!(
                "line {}: expected a label and at least one feature, got {} field(s)",
                line_num,
                cells.len()
            )));
        }
        match width {
            None => width = Some(cells.len()),
            Some(w) if w != cells.len() => {
                return Err(NetError::Parse(format!(
                    "line {}: {} fields, previous rows have {}",
                    line_num,
                    cells.len(),
                    w
                )));
            }
            Some(_) => {}
        }

        let label = parse_label(&cells[0], classes, line_num)?;
        data.push(label as f64);
        for cell in &cells[1..] {
            data.push(parse_float(cell, line_num)?);
        }
        rows += 1;
    }

    let width = width.ok_or_else(|| NetError::Parse("CSV contains no data rows".into()))?;
    Matrix::from_vec(rows, width, data)
}

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    parse_csv_row(line).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Splits one CSV row, honouring double quotes and `""` escapes.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_label(cell: &str, classes: usize, line_num: usize) -> Result<usize> {
    let label = cell.trim().parse::<usize>().map_err(|_| {
        NetError::Parse(format!(
            "line {}: label '{}' is not a non-negative integer",
            line_num, cell
        ))
    })?;
    if label >= classes {
        return Err(NetError::Parse(format!(
            "line {}: label {} out of range for {} classes",
            line_num, label, classes
        )));
    }
    Ok(label)
}

fn parse_float(cell: &str, line_num: usize) -> Result<f64> {
    cell.trim().parse::<f64>().map_err(|_| {
        NetError::Parse(format!("line {}: '{}' is not a valid number", line_num, cell))
    })
}
