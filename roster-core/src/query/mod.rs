//! Sorted listings of an application's users.

pub mod listing;
pub mod sorting;

pub use listing::UserListing;
pub use sorting::{
    ComparatorKind, FieldLocation, ListQuery, SortDirection, SortKey,
    SortRequest,
};
