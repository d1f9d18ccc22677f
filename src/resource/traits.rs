//! Core traits for records that live in a REST collection.

use serde::{de::DeserializeOwned, Serialize};

use super::descriptor::ResourceDescriptor;

/// Trait for entities that can be synchronized with the backend.
///
/// Implementors name their collection, the JSON field that carries their
/// identifier, and optionally the parent collection used for scoped reads.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Collection name (e.g., "tasks")
  const NAME: &'static str;

  /// JSON field holding the identifier (e.g., "Task_ID")
  const ID_FIELD: &'static str;

  /// Parent collection for scoped list reads (e.g., "backlogs")
  const PARENT: Option<&'static str> = None;

  /// Identifier of this record. None until the backend has created it.
  fn id(&self) -> Option<u64>;

  /// User that owns this record, for records that track one.
  fn owner_id(&self) -> Option<u64> {
    None
  }

  /// Descriptor built from the associated constants.
  fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new(Self::NAME, Self::ID_FIELD, Self::PARENT)
  }
}
