use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use taskdeck::access::{role_access, PermissionSet};
use taskdeck::api::HttpTransport;
use taskdeck::config::Config;
use taskdeck::model::{
  apply_fields, Backlog, Comment, Media, Organisation, Project, Task, Team, TimeEntry,
};
use taskdeck::resource::{self, ItemState, Resource, ResourceContext, ResourceKind, RESOURCES};
use taskdeck::session::{
  MemorySessionStore, SessionStore, SqliteSessionStore, PERMISSIONS_KEY, TOKEN_KEY,
};

#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(about = "Command-line client for the project and task management API")]
#[command(version)]
pub struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/taskdeck/config.yaml)
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  /// API base URL, overrides the config file
  #[arg(long)]
  pub url: Option<String>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// List the known resources
  Resources,
  /// List records, all of them or the children of a parent
  List {
    resource: String,
    #[arg(short, long)]
    parent: Option<u64>,
  },
  /// Show one record
  Get { resource: String, id: u64 },
  /// Create a record under a parent
  Create {
    resource: String,
    #[arg(short, long)]
    parent: u64,
    /// key=value, value parsed as JSON when possible
    #[arg(short, long = "field", value_parser = parse_field)]
    fields: Vec<(String, Value)>,
  },
  /// Change fields of a record
  Update {
    resource: String,
    id: u64,
    #[arg(short, long)]
    parent: u64,
    #[arg(short, long = "field", value_parser = parse_field)]
    fields: Vec<(String, Value)>,
  },
  /// Delete a record
  Delete {
    resource: String,
    id: u64,
    #[arg(short, long)]
    parent: u64,
  },
  /// Show what the configured actor may do with a record
  Access {
    resource: String,
    id: u64,
    /// Owner id, read from the record when omitted
    #[arg(long)]
    owner: Option<u64>,
  },
  /// Manage the stored session
  Session {
    #[command(subcommand)]
    action: SessionAction,
  },
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
  /// Store the bearer token sent with every request
  SetToken { token: String },
  /// Replace the stored permission list
  SetPermissions { permissions: Vec<String> },
  /// Print the stored permissions and whether a token is set
  Show,
  /// Forget token and permissions
  Clear,
}

/// Resource operation, once the resource name has been resolved
#[derive(Debug)]
enum Action {
  List { parent: Option<u64> },
  Get { id: u64 },
  Create { parent: u64, fields: Map<String, Value> },
  Update { id: u64, parent: u64, fields: Map<String, Value> },
  Delete { id: u64, parent: u64 },
  Access { id: u64, owner: Option<u64> },
}

/// Parse `key=value`; the value is JSON if it parses, a string otherwise.
fn parse_field(raw: &str) -> std::result::Result<(String, Value), String> {
  let (key, value) = raw
    .split_once('=')
    .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

  let key = key.trim();
  if key.is_empty() {
    return Err(format!("missing field name in '{}'", raw));
  }

  let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
  Ok((key.to_string(), value))
}

pub async fn run(args: Args, config: Config) -> Result<()> {
  let (resource_name, action) = match args.command {
    Command::Resources => {
      for entry in RESOURCES {
        let descriptor = entry.kind.descriptor();
        println!(
          "{:<14} {:<20} {:<30} {}",
          entry.name,
          descriptor.id_field(),
          descriptor.to_string(),
          entry.description
        );
      }
      return Ok(());
    }
    Command::Session { action } => return session_command(&config, action),
    Command::List { resource, parent } => (resource, Action::List { parent }),
    Command::Get { resource, id } => (resource, Action::Get { id }),
    Command::Create {
      resource,
      parent,
      fields,
    } => (
      resource,
      Action::Create {
        parent,
        fields: fields.into_iter().collect(),
      },
    ),
    Command::Update {
      resource,
      id,
      parent,
      fields,
    } => (
      resource,
      Action::Update {
        id,
        parent,
        fields: fields.into_iter().collect(),
      },
    ),
    Command::Delete {
      resource,
      id,
      parent,
    } => (resource, Action::Delete { id, parent }),
    Command::Access {
      resource,
      id,
      owner,
    } => (resource, Action::Access { id, owner }),
  };

  let kind = resource::resolve(&resource_name)
    .ok_or_else(|| eyre!("Unknown resource '{}'. Run `taskdeck resources`.", resource_name))?;

  let store = Arc::new(open_session(&config)?);
  let context = build_context(&config, Arc::clone(&store))?;
  let runner = Runner {
    context,
    store,
    actor_id: config.actor_id,
  };

  match kind {
    ResourceKind::Organisations => runner.execute::<Organisation>(action).await,
    ResourceKind::Teams => runner.execute::<Team>(action).await,
    ResourceKind::Projects => runner.execute::<Project>(action).await,
    ResourceKind::Backlogs => runner.execute::<Backlog>(action).await,
    ResourceKind::Tasks => runner.execute::<Task>(action).await,
    ResourceKind::Comments => runner.execute::<Comment>(action).await,
    ResourceKind::TimeEntries => runner.execute::<TimeEntry>(action).await,
    ResourceKind::Media => runner.execute::<Media>(action).await,
  }
}

fn open_session(config: &Config) -> Result<SqliteSessionStore> {
  match &config.session.path {
    Some(path) => SqliteSessionStore::open_at(path),
    None => SqliteSessionStore::open(),
  }
}

/// Transport authenticated from TASKDECK_TOKEN if set, else from the store.
fn build_context(config: &Config, store: Arc<SqliteSessionStore>) -> Result<ResourceContext> {
  let session: Arc<dyn SessionStore> = match Config::env_token() {
    Some(token) => Arc::new(MemorySessionStore::with_token(token)),
    None => store,
  };
  let transport = HttpTransport::new(&config.api, session)?;
  info!(base_url = %transport.base_url(), "api transport ready");
  Ok(ResourceContext::new(Arc::new(transport)))
}

fn session_command(config: &Config, action: SessionAction) -> Result<()> {
  let store = open_session(config)?;
  match action {
    SessionAction::SetToken { token } => {
      store.set(TOKEN_KEY, &token)?;
      println!("Token stored");
    }
    SessionAction::SetPermissions { permissions } => {
      let set: PermissionSet = permissions.into_iter().collect();
      store.set_permissions(&set)?;
      println!("Stored {} permission(s)", set.iter().count());
    }
    SessionAction::Show => {
      let token = if store.token()?.is_some() { "set" } else { "not set" };
      println!("token: {}", token);
      print_json(&store.permissions()?)?;
    }
    SessionAction::Clear => {
      store.remove(TOKEN_KEY)?;
      store.remove(PERMISSIONS_KEY)?;
      println!("Session cleared");
    }
  }
  Ok(())
}

struct Runner {
  context: ResourceContext,
  store: Arc<SqliteSessionStore>,
  actor_id: Option<u64>,
}

impl Runner {
  async fn execute<T: Resource>(&self, action: Action) -> Result<()> {
    let adapter = self.context.adapter::<T>();
    let name = T::NAME;

    match action {
      Action::List { parent: Some(parent) } => {
        let items = adapter.list_by_parent(parent, true).await;
        if let Some(notice) = empty_list_notice(name, parent, &items) {
          warn!("{}", notice);
        }
        print_json(&items)
      }
      Action::List { parent: None } => {
        let items = adapter
          .list_all()
          .await
          .ok_or_else(|| eyre!("Failed to list {}", name))?;
        print_json(&items)
      }
      Action::Get { id } => match adapter.get_by_id(id).await {
        ItemState::Present(item) => print_json(&item),
        _ => Err(eyre!("{} {} not found", name, id)),
      },
      Action::Create { parent, fields } => {
        for (field, value) in fields {
          adapter.stage_new_item_field(&field, value, None);
        }
        if !adapter.create(parent, None).await {
          return Err(eyre!("Failed to create {} under {}", name, parent));
        }
        println!("Created {} under {}", name, parent);
        print_json(&adapter.items_by_id())
      }
      Action::Update { id, parent, fields } => {
        let item = adapter
          .get_by_id(id)
          .await
          .into_item()
          .ok_or_else(|| eyre!("{} {} not found", name, id))?;
        let changes = apply_fields(&item, &fields)
          .map_err(|e| eyre!("Invalid fields for {}: {}", name, e))?;

        if !adapter.update(&changes, parent).await {
          return Err(eyre!("Failed to update {} {}", name, id));
        }
        println!("Updated {} {}", name, id);
        print_json(&adapter.items_by_id())
      }
      Action::Delete { id, parent } => {
        if !adapter.remove(id, parent).await {
          return Err(eyre!("Failed to delete {} {}", name, id));
        }
        println!("Deleted {} {}", name, id);
        print_json(&adapter.items_by_id())
      }
      Action::Access { id, owner } => {
        let actor_id = self
          .actor_id
          .ok_or_else(|| eyre!("Set actor_id in the config to check access"))?;
        let owner = match owner {
          Some(owner) => Some(owner),
          None => adapter.get_by_id(id).await.item().and_then(T::owner_id),
        };
        let permissions = self.store.permissions()?;
        print_json(&role_access(actor_id, owner, &permissions, name, id))
      }
    }
  }
}

/// Warning for an empty scoped list; a failed request also reads as empty.
fn empty_list_notice<T>(name: &str, parent: u64, items: &[T]) -> Option<String> {
  items.is_empty().then(|| {
    format!(
      "No {} under parent {}; the parent may be empty or the request failed",
      name, parent
    )
  })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  let text =
    serde_json::to_string_pretty(value).map_err(|e| eyre!("Failed to format output: {}", e))?;
  println!("{}", text);
  Ok(())
}
