//! Role-based access checks.
//!
//! Access is derived from a flat list of permission strings:
//! - `admin` grants everything
//! - `{action}.{resource_type}` grants an action on every record of a type
//! - `{action}.{resource_type}.{resource_id}` grants it on one record
//!
//! Actions are `view`, `modify` and `delete`. Owners have every right.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Permission that grants every action.
pub const ADMIN: &str = "admin";

/// Actions a permission string can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  View,
  Modify,
  Delete,
}

impl Action {
  pub fn as_str(self) -> &'static str {
    match self {
      Action::View => "view",
      Action::Modify => "modify",
      Action::Delete => "delete",
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Flat set of permission strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
  pub fn contains(&self, permission: &str) -> bool {
    self.0.contains(permission)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  /// Whether `action` is granted on `resource_type` (any id) or on the given id.
  pub fn grants(&self, action: Action, resource_type: &str, resource_id: u64) -> bool {
    self.contains(ADMIN)
      || self.contains(&format!("{}.{}", action, resource_type))
      || self.contains(&format!("{}.{}.{}", action, resource_type, resource_id))
  }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

/// What an actor may do with one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleAccess {
  pub is_owner: bool,
  pub can_view: bool,
  pub can_modify: bool,
  pub can_delete: bool,
}

/// Compute the access an actor has to a record.
pub fn role_access(
  actor_id: u64,
  owner_id: Option<u64>,
  permissions: &PermissionSet,
  resource_type: &str,
  resource_id: u64,
) -> RoleAccess {
  if owner_id == Some(actor_id) {
    return RoleAccess {
      is_owner: true,
      can_view: true,
      can_modify: true,
      can_delete: true,
    };
  }

  let can_modify = permissions.grants(Action::Modify, resource_type, resource_id);
  let can_delete = permissions.grants(Action::Delete, resource_type, resource_id);
  // Write rights imply read
  let can_view =
    can_modify || can_delete || permissions.grants(Action::View, resource_type, resource_id);

  RoleAccess {
    is_owner: false,
    can_view,
    can_modify,
    can_delete,
  }
}
