//! Resource descriptors and the URL shapes derived from them.

use std::fmt;

/// Immutable description of a REST collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
  resource_name: &'static str,
  id_field: &'static str,
  parent_resource_name: Option<&'static str>,
}

impl ResourceDescriptor {
  pub const fn new(
    resource_name: &'static str,
    id_field: &'static str,
    parent_resource_name: Option<&'static str>,
  ) -> Self {
    Self {
      resource_name,
      id_field,
      parent_resource_name,
    }
  }

  pub fn resource_name(&self) -> &'static str {
    self.resource_name
  }

  pub fn id_field(&self) -> &'static str {
    self.id_field
  }

  pub fn parent_resource_name(&self) -> Option<&'static str> {
    self.parent_resource_name
  }

  /// `{resource}`, used by list-all and create.
  pub fn collection_path(&self) -> String {
    self.resource_name.to_string()
  }

  /// `{resource}/{id}`, used by get, update and delete.
  pub fn item_path(&self, item_id: u64) -> String {
    format!("{}/{}", self.resource_name, item_id)
  }

  /// `{parent}/{parent_id}/{resource}`.
  ///
  /// Root collections have no parent, so the scoped read falls back to the
  /// collection itself.
  pub fn parent_path(&self, parent_id: u64) -> String {
    match self.parent_resource_name {
      Some(parent) => format!("{}/{}/{}", parent, parent_id, self.resource_name),
      None => self.collection_path(),
    }
  }
}

impl fmt::Display for ResourceDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.parent_resource_name {
      Some(parent) => write!(f, "{}/:id/{}", parent, self.resource_name),
      None => write!(f, "{}", self.resource_name),
    }
  }
}
