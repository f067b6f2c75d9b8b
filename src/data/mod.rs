/// Data layer: catalog types, loading, filtering and marker sizing.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → GlassDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ GlassDataset  │  Vec<GlassRecord>, read-only after load
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  type + range predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  sizing   │  cost → marker size per visible record
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod sizing;
