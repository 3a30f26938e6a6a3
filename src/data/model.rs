use std::ops::Deref;

// ---------------------------------------------------------------------------
// Row – one residue of the input table
// ---------------------------------------------------------------------------

/// A single residue record (one line of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Raw cell text, label first.  Used for name matching.
    pub cells: Vec<String>,
    /// Intensities parsed from `cells[1..]`; a missing measurement is NaN.
    pub intensities: Vec<f64>,
}

impl Row {
    /// Residue label (cell 0).  Empty for a row with no cells at all.
    pub fn label(&self) -> &str {
        self.cells.first().map(String::as_str).unwrap_or("")
    }

    /// Whether any cell contains `needle` (case-sensitive substring).
    pub fn contains(&self, needle: &str) -> bool {
        self.cells.iter().any(|cell| cell.contains(needle))
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded input
// ---------------------------------------------------------------------------

/// The parsed input table.  Read once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Header cells: residue-label column name, then frequency offset labels.
    pub header: Vec<String>,
    /// All residue rows in file order.
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Row>) -> Self {
        Table { header, rows }
    }

    /// Frequency offset labels (header cells after the label column).
    pub fn offset_labels(&self) -> &[String] {
        self.header.get(1..).unwrap_or(&[])
    }

    /// Number of residue rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no residue rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A view over every row, in file order.
    pub fn view(&self) -> TableView<'_> {
        TableView {
            table: self,
            indices: (0..self.rows.len()).collect(),
            dropped: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// TableView – a row selection borrowed from a table
// ---------------------------------------------------------------------------

/// An ordered subset of a [`Table`]'s rows.  Borrowed, never copied.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    table: &'a Table,
    indices: Vec<usize>,
    dropped: usize,
}

impl<'a> TableView<'a> {
    /// Build a view from 0-based row indices.  Callers guarantee every index
    /// is in range.
    pub(crate) fn from_indices(table: &'a Table, indices: Vec<usize>) -> Self {
        debug_assert!(indices.iter().all(|&i| i < table.rows.len()));
        TableView {
            table,
            indices,
            dropped: 0,
        }
    }

    /// Record how many requested rows were discarded while building the view.
    pub(crate) fn with_dropped(mut self, dropped: usize) -> Self {
        self.dropped = dropped;
        self
    }

    /// Requested rows that did not exist in the table (out-of-range
    /// positions).  Always 0 for full and name-based views.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// The table this view selects from.
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// 0-based indices of the selected rows, in output order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Selected rows, in output order.
    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + '_ {
        self.indices.iter().map(|&i| &self.table.rows[i])
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Materialise the selection as a standalone table.
    pub fn to_table(&self) -> Table {
        Table {
            header: self.table.header.clone(),
            rows: self.rows().cloned().collect(),
        }
    }
}

impl Deref for TableView<'_> {
    type Target = Table;

    /// Header and offset labels are shared with the underlying table.
    fn deref(&self) -> &Table {
        self.table
    }
}
