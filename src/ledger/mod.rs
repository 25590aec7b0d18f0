mod builder;
mod entry;
mod render;

pub use builder::{EntryBuilder, SkipCounts};
pub use entry::{sort_by_date, LedgerEntry, Posting};
pub use render::render_ledger;
