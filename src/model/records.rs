use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{deserialize_id, deserialize_text, Timestamp};
use crate::resource::Resource;

// ============================================================================
// Organisation hierarchy
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
  #[serde(
    rename = "Organisation_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<u64>,
  #[serde(
    rename = "Organisation_Name",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub name: Option<String>,
  #[serde(
    rename = "Organisation_Description",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub description: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Resource for Organisation {
  const NAME: &'static str = "organisations";
  const ID_FIELD: &'static str = "Organisation_ID";

  fn id(&self) -> Option<u64> {
    self.id
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
  #[serde(
    rename = "Team_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<u64>,
  #[serde(
    rename = "Organisation_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub organisation_id: Option<u64>,
  #[serde(
    rename = "Team_Name",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub name: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Resource for Team {
  const NAME: &'static str = "teams";
  const ID_FIELD: &'static str = "Team_ID";
  const PARENT: Option<&'static str> = Some("organisations");

  fn id(&self) -> Option<u64> {
    self.id
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
  #[serde(
    rename = "Project_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<u64>,
  #[serde(
    rename = "Team_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub team_id: Option<u64>,
  #[serde(
    rename = "Project_Title",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub title: Option<String>,
  #[serde(
    rename = "Project_Description",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub description: Option<String>,
  #[serde(rename = "Project_Start_Date", default, skip_serializing_if = "Option::is_none")]
  pub start_date: Option<Timestamp>,
  #[serde(rename = "Project_End_Date", default, skip_serializing_if = "Option::is_none")]
  pub end_date: Option<Timestamp>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Resource for Project {
  const NAME: &'static str = "projects";
  const ID_FIELD: &'static str = "Project_ID";
  const PARENT: Option<&'static str> = Some("teams");

  fn id(&self) -> Option<u64> {
    self.id
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Backlog {
  #[serde(
    rename = "Backlog_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<u64>,
  #[serde(
    rename = "Project_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub project_id: Option<u64>,
  #[serde(
    rename = "Backlog_Name",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub name: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Resource for Backlog {
  const NAME: &'static str = "backlogs";
  const ID_FIELD: &'static str = "Backlog_ID";
  const PARENT: Option<&'static str> = Some("projects");

  fn id(&self) -> Option<u64> {
    self.id
  }
}

// ============================================================================
// Tasks and what hangs off them
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
  #[serde(
    rename = "Task_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<u64>,
  #[serde(
    rename = "Backlog_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub backlog_id: Option<u64>,
  #[serde(
    rename = "Task_Title",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub title: Option<String>,
  #[serde(
    rename = "Task_Description",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub description: Option<String>,
  #[serde(
    rename = "Status_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub status_id: Option<u64>,
  #[serde(
    rename = "Assigned_User_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub assignee_id: Option<u64>,
  #[serde(
    rename = "Task_CreatedBy",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub created_by: Option<u64>,
  #[serde(rename = "Task_Due_Date", default, skip_serializing_if = "Option::is_none")]
  pub due_date: Option<Timestamp>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Resource for Task {
  const NAME: &'static str = "tasks";
  const ID_FIELD: &'static str = "Task_ID";
  const PARENT: Option<&'static str> = Some("backlogs");

  fn id(&self) -> Option<u64> {
    self.id
  }

  fn owner_id(&self) -> Option<u64> {
    self.created_by
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  #[serde(
    rename = "Comment_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<u64>,
  #[serde(
    rename = "Task_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub task_id: Option<u64>,
  #[serde(
    rename = "User_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub user_id: Option<u64>,
  #[serde(
    rename = "Comment_Text",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub text: Option<String>,
  #[serde(rename = "Comment_CreatedAt", default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<Timestamp>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Resource for Comment {
  const NAME: &'static str = "comments";
  const ID_FIELD: &'static str = "Comment_ID";
  const PARENT: Option<&'static str> = Some("tasks");

  fn id(&self) -> Option<u64> {
    self.id
  }

  fn owner_id(&self) -> Option<u64> {
    self.user_id
  }
}

/// A tracked stretch of work on a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
  #[serde(
    rename = "Time_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<u64>,
  #[serde(
    rename = "Task_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub task_id: Option<u64>,
  #[serde(
    rename = "User_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub user_id: Option<u64>,
  #[serde(rename = "Time_Start", default, skip_serializing_if = "Option::is_none")]
  pub started_at: Option<Timestamp>,
  #[serde(rename = "Time_End", default, skip_serializing_if = "Option::is_none")]
  pub ended_at: Option<Timestamp>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl TimeEntry {
  /// Tracked duration; None while the timer is still running.
  pub fn duration(&self) -> Option<Duration> {
    let start = self.started_at.as_ref()?.date_time()?;
    let end = self.ended_at.as_ref()?.date_time()?;
    (end >= start).then(|| end - start)
  }
}

impl Resource for TimeEntry {
  const NAME: &'static str = "time-entries";
  const ID_FIELD: &'static str = "Time_ID";
  const PARENT: Option<&'static str> = Some("tasks");

  fn id(&self) -> Option<u64> {
    self.id
  }

  fn owner_id(&self) -> Option<u64> {
    self.user_id
  }
}

/// Attachment metadata; the file itself lives at `url`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
  #[serde(
    rename = "Media_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<u64>,
  #[serde(
    rename = "Task_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub task_id: Option<u64>,
  #[serde(
    rename = "User_ID",
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "Option::is_none"
  )]
  pub user_id: Option<u64>,
  #[serde(
    rename = "Media_File_Name",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub file_name: Option<String>,
  #[serde(
    rename = "Media_File_Type",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub file_type: Option<String>,
  #[serde(
    rename = "Media_File_Path",
    default,
    deserialize_with = "deserialize_text",
    skip_serializing_if = "Option::is_none"
  )]
  pub url: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Resource for Media {
  const NAME: &'static str = "media";
  const ID_FIELD: &'static str = "Media_ID";
  const PARENT: Option<&'static str> = Some("tasks");

  fn id(&self) -> Option<u64> {
    self.id
  }

  fn owner_id(&self) -> Option<u64> {
    self.user_id
  }
}
