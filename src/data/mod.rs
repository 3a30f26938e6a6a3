/// Data layer: table model, loading, row selection, noise and ONEST output.
///
/// Architecture:
/// ```text
///   peak-list .tsv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  positions / names → TableView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  noise per residue → ONEST blocks
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod noise;
pub mod writer;
