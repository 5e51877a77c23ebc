//! Database operations for the `peddlers` table.

mod read;
mod types;
mod write;

pub use read::load_active_candidates;
pub use types::PeddlerRow;
pub use write::upsert_peddlers;
