//! Filter Module - Filter/Aggregate Engine
//!
//! - `engine` - search, range/set predicates, sorting, pagination
//! - `aggregate` - chart reductions (fraud split, country, hour, merchant)
//!
//! Everything here is a pure function of its inputs; the view state lives in
//! `logic::refresh`.

pub mod aggregate;
pub mod engine;
pub mod types;


pub use aggregate::{aggregate, Aggregates, CountryAmounts, HourBucket, MerchantStats};
pub use engine::{apply_filters, clamp_page, filter_all, page_count, paginate};
pub use types::{AmountRange, DateRange, FilterSpec, FilteredPage, SortKey, SortOrder, SortSpec};
