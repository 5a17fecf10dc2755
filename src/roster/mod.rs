//! Owned-character detection from community roster pages.

pub mod krooster;
pub mod matcher;
pub mod normalize;

pub use krooster::KroosterClient;
pub use matcher::{MatchStrategy, RosterLayout, RosterMatch, RosterMatcher};
pub use normalize::{name_variants, normalize_name};
