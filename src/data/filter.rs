use log::{info, warn};

use super::model::{Table, TableView};
use crate::error::{ConvertError, Result};

// ---------------------------------------------------------------------------
// Selection criteria: which residues go into the output
// ---------------------------------------------------------------------------

/// Row selection requested by the user.  Position and name selection are
/// mutually exclusive; `All` means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    /// 1-based residue positions, in the order they should be written.
    Positions(Vec<i64>),
    /// Substrings matched (case-sensitively) against every cell of a row.
    Names(Vec<String>),
}

/// Apply `selection` to `table`.
///
/// * `All` → every row, unchanged.
/// * `Positions` → the rows at those 1-based positions, in list order.
///   Out-of-range positions are dropped with a warning; an empty result is
///   returned as-is.
/// * `Names` → every row where any cell contains any requested name, in
///   table order, each row at most once.  No match at all is an error.
pub fn select<'a>(table: &'a Table, selection: &Selection) -> Result<TableView<'a>> {
    let view = match selection {
        Selection::All => table.view(),
        Selection::Positions(positions) => select_positions(table, positions),
        Selection::Names(names) => select_names(table, names)?,
    };
    info!("Selected {} of {} residue(s)", view.len(), table.len());
    Ok(view)
}

fn select_positions<'a>(table: &'a Table, positions: &[i64]) -> TableView<'a> {
    let indices: Vec<usize> = positions
        .iter()
        .filter_map(|&pos| pos.checked_sub(1).and_then(|i| usize::try_from(i).ok()))
        .filter(|&idx| idx < table.len())
        .collect();

    let dropped = positions.len() - indices.len();
    if dropped > 0 {
        warn!(
            "{dropped} selected number(s) out of range 1..={}; using the valid ones only",
            table.len()
        );
    }
    TableView::from_indices(table, indices).with_dropped(dropped)
}

fn select_names<'a>(table: &'a Table, names: &[String]) -> Result<TableView<'a>> {
    let indices: Vec<usize> = table
        .rows
        .iter()
        .enumerate()
        // `any` stops at the first matching name, so a row is taken once.
        .filter(|(_, row)| names.iter().any(|name| row.contains(name)))
        .map(|(i, _)| i)
        .collect();

    if indices.is_empty() {
        return Err(ConvertError::NoMatchingResidue(names.to_vec()));
    }
    Ok(TableView::from_indices(table, indices))
}
