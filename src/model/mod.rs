//! Models - explicit record types, one per table.
//!
//! Records serialize in the camelCase wire shape the callers send; the
//! store layer (`crate::store::Table`) turns them into snake_case rows.
//!
//! ## Example
//!
//! ```ignore
//! use product_hub::model::{Goal, Model};
//!
//! assert_eq!(Goal::TABLE, "release_goals");
//! assert_eq!(Goal::NATURAL_KEY, &["product_id", "year", "month", "description"]);
//! ```

mod period;
mod portfolio;
mod release;
mod roadmap;

use serde::{de::DeserializeOwned, Serialize};

pub use period::{Period, PeriodError};
pub use portfolio::{Metric, Portfolio, Product};
pub use release::{Goal, Note, Plan};
pub use roadmap::{RoadmapDetail, RoadmapEntry};

/// Trait for types stored as rows of a table.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table holding this record type.
    const TABLE: &'static str;

    /// Columns identifying a record for upserts, in row (snake_case) spelling.
    const NATURAL_KEY: &'static [&'static str];

    /// Store-assigned identifier, once the record has been stored.
    fn id(&self) -> Option<&str>;
}

/// Records scoped to one product; the product id is filled from the
/// enclosing request rather than trusted from each record.
pub trait ProductScoped: Model {
    fn product_id(&self) -> &str;

    fn set_product_id(&mut self, product_id: &str);
}

macro_rules! product_scoped {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::model::ProductScoped for $ty {
                fn product_id(&self) -> &str {
                    &self.product_id
                }

                fn set_product_id(&mut self, product_id: &str) {
                    self.product_id = product_id.to_string();
                }
            }
        )+
    };
}

pub(crate) use product_scoped;
