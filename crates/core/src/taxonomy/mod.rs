//! Strategic taxonomy: axis → action → product.
//!
//! Records are static reference data. Each level is tagged with the
//! functional modules it applies to; work plans only see elements tagged
//! [`UsageTag::WorkPlan`].

mod error;
mod types;

pub use error::TaxonomyError;
pub use types::{
    Action, Product, StrategicAxis, Taxonomy, TaxonomyLevel, TaxonomyLinks, TaxonomyPath, UsageTag,
    UsageTags,
};
