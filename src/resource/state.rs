//! Cached read results held by a resource adapter.

use serde_json::{Map, Value};

/// State of the single-item read path.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemState<T> {
  /// Not requested yet, or a request is in flight
  #[default]
  Absent,
  /// The backend answered with nothing for this id
  NotFound,
  /// The backend returned the item
  Present(T),
}

impl<T> ItemState<T> {
  pub fn is_absent(&self) -> bool {
    matches!(self, ItemState::Absent)
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, ItemState::NotFound)
  }

  pub fn item(&self) -> Option<&T> {
    match self {
      ItemState::Present(item) => Some(item),
      _ => None,
    }
  }

  pub fn into_item(self) -> Option<T> {
    match self {
      ItemState::Present(item) => Some(item),
      _ => None,
    }
  }
}

/// Everything one adapter remembers about its resource.
///
/// The read caches are independent: a mutation refreshes `items_by_id` only.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterState<T> {
  /// Last unscoped list; None until a list-all read succeeds
  pub items: Option<Vec<T>>,
  /// Last parent-scoped list
  pub items_by_id: Vec<T>,
  /// Last single-item read
  pub item_by_id: ItemState<T>,
  /// Draft fields staged for the next create
  pub new_item: Map<String, Value>,
  /// Record picked by a consumer for editing
  pub item_detail: Option<T>,
}

impl<T> Default for AdapterState<T> {
  fn default() -> Self {
    Self {
      items: None,
      items_by_id: Vec::new(),
      item_by_id: ItemState::Absent,
      new_item: Map::new(),
      item_detail: None,
    }
  }
}
