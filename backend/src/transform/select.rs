//! Column projection.

use std::collections::HashSet;

use crate::error::{TableError, TableResult};
use crate::models::Table;

/// Project `table` onto `names`, in the order given.
///
/// Fails with [`TableError::UnknownColumn`] on the first name the table does
/// not have. Repeated names keep their first position.
pub fn select_columns<S: AsRef<str>>(table: &Table, names: &[S]) -> TableResult<Table> {
    let mut seen = HashSet::with_capacity(names.len());
    let mut columns = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        let column = table
            .column(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        if seen.insert(name) {
            columns.push(column.clone());
        }
    }

    Table::new(columns)
}
