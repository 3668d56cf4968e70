/// Data layer: core types, loading, filtering, aggregation, and export.
///
/// Architecture:
/// ```text
///  remote .parquet (URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch bytes → parse → JobDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ JobDataset  │  Vec<Posting>, filter domains (immutable)
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌────────────┐
///   │  filter   │ ───▶ │ aggregate  │  top-N, histogram, shares, treemap
///   └──────────┘      └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered rows → CSV
///   └──────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
