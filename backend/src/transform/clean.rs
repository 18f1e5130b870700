//! Cleaning passes: duplicate-row removal and mean-fill of numeric columns.
//!
//! When both are requested, duplicates are removed first so that a repeated
//! row cannot skew a column mean.

use std::collections::HashSet;

use crate::api::logs::{log_info_indent, log_success};
use crate::models::{Cell, CleaningOptions, Table};

/// Hashable identity of a cell for duplicate detection.
///
/// Numbers compare by value, so `Int(10)` and `Float(10.0)` are the same key.
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Int(i64),
    Float(u64),
    Text(&'a str),
    Missing,
}

impl<'a> From<&'a Cell> for CellKey<'a> {
    fn from(cell: &'a Cell) -> Self {
        match cell {
            Cell::Int(i) => CellKey::Int(*i),
            Cell::Float(f) => {
                let f = *f;
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    CellKey::Int(f as i64)
                } else {
                    // integral values, -0.0 included, are keyed as Int above
                    CellKey::Float(f.to_bits())
                }
            }
            Cell::Text(s) => CellKey::Text(s),
            Cell::Missing => CellKey::Missing,
        }
    }
}

/// Apply the requested cleaning passes (dedupe, then fill).
pub fn clean(mut table: Table, options: &CleaningOptions) -> Table {
    if options.is_noop() {
        return table;
    }

    if options.remove_duplicates {
        let removed = remove_duplicates(&mut table);
        log_success(format!("Removed {} duplicate row(s)", removed));
    }

    if options.fill_missing_numeric {
        let filled = fill_missing_numeric(&mut table);
        if filled.is_empty() {
            log_success("No missing numeric values to fill");
        } else {
            log_success("Filled missing numeric values with column means:");
            for fill in &filled {
                log_info_indent(
                    format!("{}: {} cell(s) = {}", fill.column, fill.count, fill.mean),
                    1,
                );
            }
        }
    }

    table
}

/// Drop rows identical to an earlier row, keeping first occurrences in order.
///
/// Returns the number of rows removed.
pub fn remove_duplicates(table: &mut Table) -> usize {
    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.row_count());
        table
            .rows()
            .map(|row| seen.insert(row.into_iter().map(CellKey::from).collect()))
            .collect()
    };

    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        table.retain_rows(&keep);
    }
    removed
}

/// One column's mean-fill.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFill {
    pub column: String,
    pub mean: f64,
    pub count: usize,
}

/// Replace missing cells of numeric columns with the column mean.
///
/// The mean is taken over the original non-missing values. Columns with no
/// values at all are left as they are.
pub fn fill_missing_numeric(table: &mut Table) -> Vec<ColumnFill> {
    let mut fills = Vec::new();

    for column in table.columns_mut().iter_mut().filter(|c| c.is_numeric()) {
        let (sum, n) = column
            .values
            .iter()
            .filter_map(Cell::as_f64)
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

        if n == 0 {
            continue;
        }

        let mean = sum / n as f64;
        let mut count = 0;
        for cell in column.values.iter_mut().filter(|c| c.is_missing()) {
            *cell = Cell::Float(mean);
            count += 1;
        }

        if count > 0 {
            fills.push(ColumnFill {
                column: column.name.clone(),
                mean,
                count,
            });
        }
    }

    fills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, ColumnType};

    fn table(columns: Vec<Column>) -> Table {
        Table::new(columns).unwrap()
    }

    fn numeric(name: &str, values: Vec<Cell>) -> Column {
        Column::new(name, ColumnType::Numeric, values)
    }

    fn text(name: &str, values: &[&str]) -> Column {
        Column::new(
            name,
            ColumnType::Text,
            values.iter().map(|v| Cell::Text(v.to_string())).collect(),
        )
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let mut t = table(vec![
            text("name", &["A", "B", "A", "C", "B"]),
            numeric(
                "score",
                vec![Cell::Int(1), Cell::Int(2), Cell::Int(1), Cell::Int(3), Cell::Int(9)],
            ),
        ]);

        let removed = remove_duplicates(&mut t);

        assert_eq!(removed, 1);
        assert_eq!(t.row_count(), 4);
        assert_eq!(
            t.column("name").unwrap().values,
            vec![
                Cell::Text("A".into()),
                Cell::Text("B".into()),
                Cell::Text("C".into()),
                Cell::Text("B".into())
            ]
        );
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let mut once = table(vec![numeric(
            "x",
            vec![Cell::Int(1), Cell::Missing, Cell::Int(1), Cell::Missing],
        )]);
        remove_duplicates(&mut once);
        let mut twice = once.clone();
        assert_eq!(remove_duplicates(&mut twice), 0);
        assert_eq!(once, twice);
        assert_eq!(once.row_count(), 2);
    }

    #[test]
    fn test_numeric_duplicates_compare_by_value() {
        let mut t = table(vec![numeric("x", vec![Cell::Int(10), Cell::Float(10.0)])]);
        assert_eq!(remove_duplicates(&mut t), 1);
    }

    #[test]
    fn test_fill_uses_original_mean() {
        let mut t = table(vec![numeric("x", vec![Cell::Int(1), Cell::Missing, Cell::Int(3)])]);
        let fills = fill_missing_numeric(&mut t);

        assert_eq!(t.columns()[0].values[1], Cell::Float(2.0));
        assert_eq!(fills, vec![ColumnFill { column: "x".into(), mean: 2.0, count: 1 }]);
    }

    #[test]
    fn test_fill_multiple_missing_share_one_mean() {
        let mut t = table(vec![numeric(
            "x",
            vec![Cell::Missing, Cell::Int(2), Cell::Missing, Cell::Int(4)],
        )]);
        fill_missing_numeric(&mut t);
        assert_eq!(
            t.columns()[0].values,
            vec![Cell::Float(3.0), Cell::Int(2), Cell::Float(3.0), Cell::Int(4)]
        );
    }

    #[test]
    fn test_fill_all_missing_column_is_unchanged() {
        let mut t = table(vec![numeric("x", vec![Cell::Missing, Cell::Missing])]);
        let fills = fill_missing_numeric(&mut t);
        assert!(fills.is_empty());
        assert_eq!(t.columns()[0].values, vec![Cell::Missing, Cell::Missing]);
    }

    #[test]
    fn test_fill_skips_text_columns() {
        let mut t = table(vec![Column::new(
            "name",
            ColumnType::Text,
            vec![Cell::Text("a".into()), Cell::Missing],
        )]);
        fill_missing_numeric(&mut t);
        assert_eq!(t.columns()[0].values[1], Cell::Missing);
    }

    #[test]
    fn test_clean_dedupes_before_fill() {
        let t = table(vec![
            text("k", &["a", "a", "b", "c"]),
            numeric("v", vec![Cell::Int(10), Cell::Int(10), Cell::Int(4), Cell::Missing]),
        ]);
        let options = CleaningOptions {
            remove_duplicates: true,
            fill_missing_numeric: true,
        };

        let cleaned = clean(t, &options);

        assert_eq!(cleaned.row_count(), 3);
        assert_eq!(cleaned.column("v").unwrap().values[2], Cell::Float(7.0));
    }

    #[test]
    fn test_clean_noop() {
        let t = table(vec![numeric("x", vec![Cell::Int(1), Cell::Int(1), Cell::Missing])]);
        let cleaned = clean(t.clone(), &CleaningOptions::default());
        assert_eq!(cleaned, t);
    }
}
