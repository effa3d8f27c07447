//! Cell classification and column type inference.

use serde::{Deserialize, Serialize};

use crate::domain::SemanticType;

/// Classification of a single raw cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    Empty,
    Typed(SemanticType),
}

/// Classify one raw cell.
///
/// Order matters: a blank cell is empty, then numbers win over the date
/// pattern (so `20240101` is a number), and everything else is a string.
pub fn classify_cell(raw: &str) -> CellClass {
    let value = raw.trim();
    if value.is_empty() {
        return CellClass::Empty;
    }
    if is_finite_number(value) {
        return CellClass::Typed(SemanticType::Number);
    }
    if is_iso_date_shape(value) {
        return CellClass::Typed(SemanticType::Date);
    }
    CellClass::Typed(SemanticType::String)
}

fn is_finite_number(value: &str) -> bool {
    value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// `NNNN-NN-NN` with ASCII digits. The calendar itself is not checked.
fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Observed classification counts for one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub number: usize,
    pub date: usize,
    pub string: usize,
    pub nulls: usize,
}

impl TypeCounts {
    pub fn record(&mut self, class: CellClass) {
        match class {
            CellClass::Empty => self.nulls += 1,
            CellClass::Typed(SemanticType::Number) => self.number += 1,
            CellClass::Typed(SemanticType::Date) => self.date += 1,
            CellClass::Typed(SemanticType::String) => self.string += 1,
        }
    }

    pub fn count(&self, kind: SemanticType) -> usize {
        match kind {
            SemanticType::Number => self.number,
            SemanticType::Date => self.date,
            SemanticType::String => self.string,
        }
    }

    pub fn total(&self) -> usize {
        self.number + self.date + self.string + self.nulls
    }

    /// Majority vote over non-empty classifications.
    ///
    /// Ties resolve by `number > date > string`; an all-empty column is a
    /// three-way tie and therefore reports `number`.
    pub fn winner(&self) -> SemanticType {
        let mut best = SemanticType::PRECEDENCE[0];
        for kind in SemanticType::PRECEDENCE.into_iter().skip(1) {
            if self.count(kind) > self.count(best) {
                best = kind;
            }
        }
        best
    }
}

/// Per-column profile in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub name: String,
    pub inferred: SemanticType,
    pub counts: TypeCounts,
}

/// Count classifications column by column.
///
/// Columns are returned in order of first appearance across all rows. When
/// `header` is given, those columns come first and rows missing one of them
/// contribute an empty cell to it.
pub fn profile_columns<'a, I>(rows: I, header: &[String]) -> Vec<ColumnProfile>
where
    I: IntoIterator<Item = &'a crate::domain::Row>,
{
    let mut names: Vec<String> = header.to_vec();
    let mut counts: Vec<TypeCounts> = vec![TypeCounts::default(); names.len()];

    for row in rows {
        let mut seen = vec![false; names.len()];
        for (column, value) in row.iter() {
            let idx = match names.iter().position(|n| n == column) {
                Some(idx) => idx,
                None => {
                    names.push(column.to_string());
                    counts.push(TypeCounts::default());
                    seen.push(false);
                    names.len() - 1
                }
            };
            seen[idx] = true;
            counts[idx].record(classify_cell(value));
        }
        for (idx, present) in seen.iter().enumerate().take(header.len()) {
            if !present {
                counts[idx].record(CellClass::Empty);
            }
        }
    }

    names
        .into_iter()
        .zip(counts)
        .map(|(name, counts)| ColumnProfile {
            name,
            inferred: counts.winner(),
            counts,
        })
        .collect()
}
