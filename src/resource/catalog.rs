//! Known resources and name lookup.

use super::descriptor::ResourceDescriptor;
use super::traits::Resource;
use crate::model::{Backlog, Comment, Media, Organisation, Project, Task, Team, TimeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
  Organisations,
  Teams,
  Projects,
  Backlogs,
  Tasks,
  Comments,
  TimeEntries,
  Media,
}

impl ResourceKind {
  pub fn descriptor(self) -> ResourceDescriptor {
    match self {
      ResourceKind::Organisations => Organisation::descriptor(),
      ResourceKind::Teams => Team::descriptor(),
      ResourceKind::Projects => Project::descriptor(),
      ResourceKind::Backlogs => Backlog::descriptor(),
      ResourceKind::Tasks => Task::descriptor(),
      ResourceKind::Comments => Comment::descriptor(),
      ResourceKind::TimeEntries => TimeEntry::descriptor(),
      ResourceKind::Media => Media::descriptor(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct ResourceEntry {
  pub kind: ResourceKind,
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available resources
pub const RESOURCES: &[ResourceEntry] = &[
  ResourceEntry {
    kind: ResourceKind::Organisations,
    name: "organisations",
    aliases: &["org", "orgs", "organisation", "organizations"],
    description: "Top-level organisations",
  },
  ResourceEntry {
    kind: ResourceKind::Teams,
    name: "teams",
    aliases: &["team"],
    description: "Teams within an organisation",
  },
  ResourceEntry {
    kind: ResourceKind::Projects,
    name: "projects",
    aliases: &["p", "project"],
    description: "Projects owned by a team",
  },
  ResourceEntry {
    kind: ResourceKind::Backlogs,
    name: "backlogs",
    aliases: &["b", "backlog"],
    description: "Backlogs of a project",
  },
  ResourceEntry {
    kind: ResourceKind::Tasks,
    name: "tasks",
    aliases: &["t", "task"],
    description: "Tasks in a backlog",
  },
  ResourceEntry {
    kind: ResourceKind::Comments,
    name: "comments",
    aliases: &["c", "comment"],
    description: "Comments on a task",
  },
  ResourceEntry {
    kind: ResourceKind::TimeEntries,
    name: "time-entries",
    aliases: &["time", "timer", "time-entry"],
    description: "Time tracked on a task",
  },
  ResourceEntry {
    kind: ResourceKind::Media,
    name: "media",
    aliases: &["m", "attachments", "files"],
    description: "Media attached to a task",
  },
];

/// Ranked matches for a given input
pub fn suggestions(input: &str) -> Vec<&'static ResourceEntry> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return RESOURCES.iter().collect();
  }

  let mut matches: Vec<(&ResourceEntry, u32)> = Vec::new();

  for entry in RESOURCES {
    if entry.name == input_lower {
      matches.push((entry, 0));
      continue;
    }

    if entry.aliases.contains(&input_lower.as_str()) {
      matches.push((entry, 1));
      continue;
    }

    if entry.name.starts_with(&input_lower) {
      matches.push((entry, 2));
      continue;
    }

    if entry.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((entry, 3));
      continue;
    }

    if entry.name.contains(&input_lower) {
      matches.push((entry, 4));
      continue;
    }

    if entry.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((entry, 5));
    }
  }

  // Stable sort keeps catalogue order within a rank
  matches.sort_by_key(|(_, rank)| *rank);

  matches.into_iter().map(|(entry, _)| entry).collect()
}

/// Best match for `input`, if any
pub fn resolve(input: &str) -> Option<ResourceKind> {
  suggestions(input).first().map(|entry| entry.kind)
}
