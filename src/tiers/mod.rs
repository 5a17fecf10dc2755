//! Tier labels and their reconstruction from the community tier sheet.

pub mod extract;
pub mod gviz;
pub mod label;
pub mod missing;
pub mod sheet;

pub use extract::{backfill_tier_map, build_tier_map, extract_tier_map, TierMap};
pub use gviz::{GvizError, Matrix};
pub use label::{is_tier_equal_or_higher, tier_sort_value, Tier};
pub use sheet::{generate_char_tiers, load_tier_map, TierSheetError, TierSheetSource, CHAR_TIERS_FILE};
