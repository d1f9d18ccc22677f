//! Generic remote-resource synchronization.
//!
//! A `ResourceAdapter<T>` exposes list/get/create/update/delete for one REST
//! collection and keeps the results of its last reads:
//! - `items`: last unscoped list
//! - `items_by_id`: last parent-scoped list, re-fetched after every write
//! - `item_by_id`: last single-item read (absent / not found / present)
//! - `new_item`: draft fields staged for the next create
//! - `item_detail`: record a consumer picked for editing

mod adapter;
mod catalog;
mod context;
mod descriptor;
mod state;
mod traits;

pub use adapter::ResourceAdapter;
pub use catalog::{resolve, suggestions, ResourceEntry, ResourceKind, RESOURCES};
pub use context::ResourceContext;
pub use descriptor::ResourceDescriptor;
pub use state::{AdapterState, ItemState};
pub use traits::Resource;
