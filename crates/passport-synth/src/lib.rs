//! Synthesis of product passports from raw extractions, plus the seeded
//! fallback generators used for catalog previews.
//!
//! Nothing in this crate performs I/O.

pub mod catalog;
pub mod fallback;
pub mod fit;
pub mod hash;
pub mod keywords;
pub mod narration;
pub mod return_risk;
pub mod sustainability;
pub mod themes;
pub mod transform;

pub use catalog::{enrich_items, CatalogItem};
pub use fallback::{fallback_sustainability_score, generate_return_risk, generate_sustainability};
pub use fit::analyze_fit;
pub use hash::{sample_distinct, seeded_index, seeded_range, stable_hash};
pub use narration::{narrate, NarrationContext};
pub use return_risk::assess_return_risk;
pub use sustainability::score_sustainability;
pub use themes::extract_themes;
pub use transform::{transform, transform_with_id};
