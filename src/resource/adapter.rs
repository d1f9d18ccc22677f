//! Resource adapter that mirrors a REST collection into local state.

use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;

use super::descriptor::ResourceDescriptor;
use super::state::{AdapterState, ItemState};
use super::traits::Resource;
use crate::api::{decode_item, decode_list, Transport};

/// Client-side controller for one REST collection.
///
/// Reads replace the matching cache field verbatim. Every successful
/// create, update or delete re-fetches the parent-scoped list, so
/// `items_by_id` reflects the server once the call resolves; nothing is
/// patched locally.
///
/// Failures are reported through return values only: `None`, an empty
/// list, `ItemState::NotFound` or `false`. List rows that do not decode as
/// `T` are skipped; a body that is not a record at all counts as not found.
///
/// Concurrent calls are not coordinated. Whichever response resolves last
/// overwrites the cache, even if it was issued first.
pub struct ResourceAdapter<T: Resource> {
  descriptor: ResourceDescriptor,
  transport: Arc<dyn Transport>,
  state: watch::Sender<AdapterState<T>>,
}

impl<T: Resource> ResourceAdapter<T> {
  /// Create an adapter for `T` over the given transport.
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    let (state, _) = watch::channel(AdapterState::default());
    Self {
      descriptor: T::descriptor(),
      transport,
      state,
    }
  }

  pub fn descriptor(&self) -> &ResourceDescriptor {
    &self.descriptor
  }

  // ==========================================================================
  // State access
  // ==========================================================================

  /// Watch every change to the cached state.
  pub fn subscribe(&self) -> watch::Receiver<AdapterState<T>> {
    self.state.subscribe()
  }

  /// Copy of the whole cached state.
  pub fn snapshot(&self) -> AdapterState<T> {
    self.state.borrow().clone()
  }

  pub fn items(&self) -> Option<Vec<T>> {
    self.state.borrow().items.clone()
  }

  pub fn items_by_id(&self) -> Vec<T> {
    self.state.borrow().items_by_id.clone()
  }

  pub fn item_by_id(&self) -> ItemState<T> {
    self.state.borrow().item_by_id.clone()
  }

  pub fn new_item(&self) -> Map<String, Value> {
    self.state.borrow().new_item.clone()
  }

  pub fn item_detail(&self) -> Option<T> {
    self.state.borrow().item_detail.clone()
  }

  pub fn set_item_detail(&self, item: T) {
    self.state.send_modify(|state| state.item_detail = Some(item));
  }

  pub fn clear_item_detail(&self) {
    self.state.send_modify(|state| state.item_detail = None);
  }

  pub fn clear_new_item(&self) {
    self.state.send_modify(|state| state.new_item.clear());
  }

  // ==========================================================================
  // Reads
  // ==========================================================================

  /// Read the whole collection into `items`.
  ///
  /// On failure `items` keeps its previous value.
  pub async fn list_all(&self) -> Option<Vec<T>> {
    let items = self.fetch_list(&self.descriptor.collection_path()).await?;
    self.state.send_modify(|state| state.items = Some(items.clone()));
    Some(items)
  }

  /// Read the children of `parent_id` into `items_by_id`.
  ///
  /// With `refresh`, the cache is emptied before the request goes out so
  /// watchers see an empty list while loading. On failure the cache is left
  /// as it is and an empty list is returned.
  pub async fn list_by_parent(&self, parent_id: u64, refresh: bool) -> Vec<T> {
    if refresh {
      self.state.send_modify(|state| state.items_by_id.clear());
    }

    match self.fetch_list(&self.descriptor.parent_path(parent_id)).await {
      Some(items) => {
        self
          .state
          .send_modify(|state| state.items_by_id = items.clone());
        items
      }
      None => Vec::new(),
    }
  }

  /// Read one record into `item_by_id`.
  ///
  /// The field drops back to `Absent` while the request is in flight.
  pub async fn get_by_id(&self, item_id: u64) -> ItemState<T> {
    self
      .state
      .send_modify(|state| state.item_by_id = ItemState::Absent);

    let path = self.descriptor.item_path(item_id);
    let item = match self.transport.get(&path).await {
      Some(value) if !value.is_null() => decode_item::<T>(&path, value),
      _ => None,
    };

    let next = item.map_or(ItemState::NotFound, ItemState::Present);
    self
      .state
      .send_modify(|state| state.item_by_id = next.clone());
    next
  }

  // ==========================================================================
  // Draft
  // ==========================================================================

  /// Merge into the `new_item` draft.
  ///
  /// With `full_object`, all of its fields are merged and `field`/`value`
  /// are ignored. Otherwise the single pair is set. Fields not mentioned are
  /// preserved.
  pub fn stage_new_item_field(&self, field: &str, value: impl Into<Value>, full_object: Option<&T>) {
    let staged = match full_object {
      Some(object) => match serde_json::to_value(object) {
        Ok(Value::Object(fields)) => fields,
        _ => return,
      },
      None => {
        let mut fields = Map::new();
        fields.insert(field.to_string(), value.into());
        fields
      }
    };

    self.state.send_modify(|state| state.new_item.extend(staged));
  }

  // ==========================================================================
  // Writes
  // ==========================================================================

  /// Create a record under `parent_id`.
  ///
  /// Posts `object` if given, else the staged draft. On success the
  /// parent-scoped list is re-fetched and the draft cleared.
  pub async fn create(&self, parent_id: u64, object: Option<&T>) -> bool {
    let body = match object {
      Some(object) => match serde_json::to_value(object) {
        Ok(body) => body,
        Err(_) => return false,
      },
      None => Value::Object(self.new_item()),
    };

    if self
      .transport
      .post(&self.descriptor.collection_path(), &body)
      .await
      .is_none()
    {
      return false;
    }

    self.list_by_parent(parent_id, false).await;
    self.clear_new_item();
    true
  }

  /// Replace a record with `item_changes`, then re-fetch the siblings.
  ///
  /// Records without an id cannot be addressed and report `false`.
  pub async fn update(&self, item_changes: &T, parent_id: u64) -> bool {
    let Some(item_id) = item_changes.id() else {
      return false;
    };
    let Ok(body) = serde_json::to_value(item_changes) else {
      return false;
    };

    if self
      .transport
      .put(&self.descriptor.item_path(item_id), &body)
      .await
      .is_none()
    {
      return false;
    }

    self.list_by_parent(parent_id, false).await;
    true
  }

  /// Delete a record, then re-fetch the siblings.
  pub async fn remove(&self, item_id: u64, parent_id: u64) -> bool {
    let deleted = self
      .transport
      .delete(&self.descriptor.item_path(item_id))
      .await;

    if deleted {
      self.list_by_parent(parent_id, false).await;
    }
    deleted
  }

  async fn fetch_list(&self, path: &str) -> Option<Vec<T>> {
    let value = self.transport.get(path).await?;
    if value.is_null() {
      return None;
    }
    decode_list(path, value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Task;
  use async_trait::async_trait;
  use serde_json::json;
  use std::collections::{HashMap, VecDeque};
  use std::sync::Mutex;
  use tokio::sync::{oneshot, Notify};

  /// Transport that answers from canned responses and records every call.
  #[derive(Default)]
  struct MockTransport {
    calls: Mutex<Vec<String>>,
    gets: Mutex<HashMap<String, Value>>,
    post_reply: Mutex<Option<Value>>,
    put_reply: Mutex<Option<Value>>,
    delete_ok: Mutex<bool>,
    bodies: Mutex<Vec<Value>>,
    gate: Mutex<Option<Arc<Notify>>>,
  }

  impl MockTransport {
    fn respond_get(&self, path: &str, value: Value) {
      self.gets.lock().unwrap().insert(path.to_string(), value);
    }

    fn fail_get(&self, path: &str) {
      self.gets.lock().unwrap().remove(path);
    }

    fn reply_post(&self, value: Option<Value>) {
      *self.post_reply.lock().unwrap() = value;
    }

    fn reply_put(&self, value: Option<Value>) {
      *self.put_reply.lock().unwrap() = value;
    }

    fn reply_delete(&self, ok: bool) {
      *self.delete_ok.lock().unwrap() = ok;
    }

    /// Hold every following GET until the returned handle is notified.
    fn gate_gets(&self) -> Arc<Notify> {
      let notify = Arc::new(Notify::new());
      *self.gate.lock().unwrap() = Some(notify.clone());
      notify
    }

    fn calls(&self) -> Vec<String> {
      self.calls.lock().unwrap().clone()
    }

    fn last_body(&self) -> Option<Value> {
      self.bodies.lock().unwrap().last().cloned()
    }

    fn record(&self, call: String) {
      self.calls.lock().unwrap().push(call);
    }
  }

  #[async_trait]
  impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Option<Value> {
      self.record(format!("GET {}", path));
      let gate = self.gate.lock().unwrap().clone();
      if let Some(gate) = gate {
        gate.notified().await;
      }
      self.gets.lock().unwrap().get(path).cloned()
    }

    async fn post(&self, path: &str, body: &Value) -> Option<Value> {
      self.record(format!("POST {}", path));
      self.bodies.lock().unwrap().push(body.clone());
      self.post_reply.lock().unwrap().clone()
    }

    async fn put(&self, path: &str, body: &Value) -> Option<Value> {
      self.record(format!("PUT {}", path));
      self.bodies.lock().unwrap().push(body.clone());
      self.put_reply.lock().unwrap().clone()
    }

    async fn delete(&self, path: &str) -> bool {
      self.record(format!("DELETE {}", path));
      *self.delete_ok.lock().unwrap()
    }
  }

  fn task(id: u64, title: &str) -> Value {
    json!({"Task_ID": id, "Backlog_ID": 42, "Task_Title": title})
  }

  fn setup() -> (Arc<MockTransport>, ResourceAdapter<Task>) {
    let transport = Arc::new(MockTransport::default());
    let adapter = ResourceAdapter::<Task>::new(transport.clone());
    (transport, adapter)
  }

  fn ids(items: &[Task]) -> Vec<Option<u64>> {
    items.iter().map(|t| t.id).collect()
  }

  #[tokio::test]
  async fn test_list_by_parent_reads_nested_path() {
    let (transport, adapter) = setup();
    transport.respond_get("backlogs/42/tasks", json!([task(1, "a"), task(2, "b")]));

    let items = adapter.list_by_parent(42, false).await;

    assert_eq!(transport.calls(), vec!["GET backlogs/42/tasks"]);
    assert_eq!(ids(&items), vec![Some(1), Some(2)]);
    assert_eq!(adapter.items_by_id(), items);
  }

  #[tokio::test]
  async fn test_list_by_parent_failure_keeps_cache() {
    let (transport, adapter) = setup();
    transport.respond_get("backlogs/42/tasks", json!([task(1, "a")]));
    adapter.list_by_parent(42, false).await;

    transport.fail_get("backlogs/42/tasks");
    let items = adapter.list_by_parent(42, false).await;

    assert!(items.is_empty());
    assert_eq!(ids(&adapter.items_by_id()), vec![Some(1)]);
  }

  #[tokio::test]
  async fn test_refresh_clears_before_fetch_resolves() {
    let transport = Arc::new(MockTransport::default());
    let adapter = Arc::new(ResourceAdapter::<Task>::new(transport.clone()));
    transport.respond_get("backlogs/42/tasks", json!([task(1, "a")]));
    adapter.list_by_parent(42, false).await;

    transport.respond_get("backlogs/42/tasks", json!([task(1, "a"), task(2, "b")]));
    let gate = transport.gate_gets();
    let mut rx = adapter.subscribe();

    let handle = tokio::spawn({
      let adapter = adapter.clone();
      async move { adapter.list_by_parent(42, true).await }
    });

    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().items_by_id.is_empty());

    gate.notify_one();
    let items = handle.await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(adapter.items_by_id().len(), 2);
  }

  #[tokio::test]
  async fn test_list_all_sets_items_and_leaves_them_on_failure() {
    let (transport, adapter) = setup();
    assert!(adapter.list_all().await.is_none());
    assert!(adapter.items().is_none());

    transport.respond_get("tasks", json!([task(5, "x")]));
    let items = adapter.list_all().await.unwrap();
    assert_eq!(ids(&items), vec![Some(5)]);

    transport.fail_get("tasks");
    assert!(adapter.list_all().await.is_none());
    assert_eq!(ids(&adapter.items().unwrap()), vec![Some(5)]);
    // Independent of the scoped cache
    assert!(adapter.items_by_id().is_empty());
  }

  #[tokio::test]
  async fn test_get_by_id_not_found_differs_from_absent() {
    let (transport, adapter) = setup();
    assert!(adapter.item_by_id().is_absent());

    let state = adapter.get_by_id(99).await;

    assert_eq!(transport.calls(), vec!["GET tasks/99"]);
    assert!(state.is_not_found());
    assert!(adapter.item_by_id().is_not_found());
    assert!(!adapter.item_by_id().is_absent());
  }

  #[tokio::test]
  async fn test_get_by_id_present_and_null_body() {
    let (transport, adapter) = setup();
    transport.respond_get("tasks/7", task(7, "seven"));
    let state = adapter.get_by_id(7).await;
    assert_eq!(state.item().and_then(|t| t.title.as_deref()), Some("seven"));

    transport.respond_get("tasks/8", Value::Null);
    assert!(adapter.get_by_id(8).await.is_not_found());
  }

  #[tokio::test]
  async fn test_get_by_id_passes_through_absent() {
    let transport = Arc::new(MockTransport::default());
    let adapter = Arc::new(ResourceAdapter::<Task>::new(transport.clone()));
    transport.respond_get("tasks/7", task(7, "seven"));
    adapter.get_by_id(7).await;

    let gate = transport.gate_gets();
    let mut rx = adapter.subscribe();
    let handle = tokio::spawn({
      let adapter = adapter.clone();
      async move { adapter.get_by_id(7).await }
    });

    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().item_by_id.is_absent());
    gate.notify_one();
    assert!(handle.await.unwrap().item().is_some());
  }

  #[tokio::test]
  async fn test_list_keeps_rows_with_null_text_and_sql_dates() {
    let (transport, adapter) = setup();
    transport.respond_get(
      "backlogs/42/tasks",
      json!([
        {"Task_ID": 1, "Task_Title": "ok"},
        {"Task_ID": 2, "Task_Title": null, "Task_Due_Date": "2026-11-01 00:00:00"}
      ]),
    );

    let items = adapter.list_by_parent(42, false).await;

    assert_eq!(ids(&items), vec![Some(1), Some(2)]);
    assert_eq!(adapter.items_by_id(), items);
    assert_eq!(items[1].title, None);
  }

  #[tokio::test]
  async fn test_list_skips_rows_that_are_not_records() {
    let (transport, adapter) = setup();
    transport.respond_get(
      "backlogs/42/tasks",
      json!([task(1, "a"), {"Task_ID": "bogus"}, 17, task(3, "c")]),
    );

    let items = adapter.list_by_parent(42, false).await;

    assert_eq!(ids(&items), vec![Some(1), Some(3)]);
    assert_eq!(adapter.items_by_id(), items);
  }

  #[tokio::test]
  async fn test_list_body_that_is_not_an_array_is_a_failed_read() {
    let (transport, adapter) = setup();
    transport.respond_get("backlogs/42/tasks", json!([task(1, "a")]));
    adapter.list_by_parent(42, false).await;

    transport.respond_get("backlogs/42/tasks", json!({"error": "oops"}));
    assert!(adapter.list_by_parent(42, false).await.is_empty());
    assert_eq!(ids(&adapter.items_by_id()), vec![Some(1)]);
  }

  #[tokio::test]
  async fn test_get_by_id_with_sql_datetime_is_present() {
    let (transport, adapter) = setup();
    transport.respond_get(
      "tasks/3",
      json!({"Task_ID": 3, "Task_Title": null, "Task_Due_Date": "2026-11-01 00:00:00"}),
    );

    let state = adapter.get_by_id(3).await;

    let task = state.item().unwrap();
    assert_eq!(task.id, Some(3));
    assert_eq!(
      task.due_date.as_ref().and_then(|d| d.date()),
      chrono::NaiveDate::from_ymd_opt(2026, 11, 1)
    );
  }

  #[tokio::test]
  async fn test_get_by_id_body_that_is_not_a_record_is_not_found() {
    let (transport, adapter) = setup();
    transport.respond_get("tasks/3", json!("deleted"));
    assert!(adapter.get_by_id(3).await.is_not_found());

    transport.respond_get("tasks/4", json!({"Task_ID": "four"}));
    assert!(adapter.get_by_id(4).await.is_not_found());
  }

  #[tokio::test]
  async fn test_remove_refetch_reflects_lenient_rows() {
    let (transport, adapter) = setup();
    transport.respond_get("backlogs/42/tasks", json!([task(7, "doomed"), task(8, "kept")]));
    adapter.list_by_parent(42, false).await;

    transport.reply_delete(true);
    transport.respond_get(
      "backlogs/42/tasks",
      json!([{"Task_ID": 8, "Task_Title": null, "Task_Due_Date": "2026-11-01 00:00:00"}]),
    );

    assert!(adapter.remove(7, 42).await);
    assert_eq!(ids(&adapter.items_by_id()), vec![Some(8)]);
  }

  #[test]
  fn test_stage_new_item_field_merges_and_is_idempotent() {
    let (_, adapter) = setup();
    adapter.stage_new_item_field("Task_Title", "Write docs", None);
    adapter.stage_new_item_field("Status_ID", 1, None);
    let once = adapter.new_item();

    adapter.stage_new_item_field("Status_ID", 1, None);
    assert_eq!(adapter.new_item(), once);
    assert_eq!(once.get("Task_Title"), Some(&json!("Write docs")));
    assert_eq!(once.get("Status_ID"), Some(&json!(1)));
  }

  #[test]
  fn test_stage_full_object_preserves_unset_fields() {
    let (_, adapter) = setup();
    adapter.stage_new_item_field("Task_Points", 3, None);

    let object = Task {
      title: Some("From object".into()),
      backlog_id: Some(42),
      ..Default::default()
    };
    adapter.stage_new_item_field("ignored", "ignored", Some(&object));

    let draft = adapter.new_item();
    assert_eq!(draft.get("Task_Title"), Some(&json!("From object")));
    assert_eq!(draft.get("Task_Points"), Some(&json!(3)));
    assert!(draft.get("ignored").is_none());
  }

  #[tokio::test]
  async fn test_create_posts_draft_refetches_and_clears() {
    let (transport, adapter) = setup();
    transport.reply_post(Some(task(3, "new")));
    transport.respond_get("backlogs/42/tasks", json!([task(1, "a"), task(3, "new")]));

    adapter.stage_new_item_field("Task_Title", "new", None);
    assert!(adapter.create(42, None).await);

    assert_eq!(transport.calls(), vec!["POST tasks", "GET backlogs/42/tasks"]);
    assert_eq!(transport.last_body(), Some(json!({"Task_Title": "new"})));
    assert!(adapter.new_item().is_empty());

    // Cache matches an independent read
    let fresh = adapter.list_by_parent(42, false).await;
    assert_eq!(adapter.items_by_id(), fresh);
    assert_eq!(fresh.len(), 2);
  }

  #[tokio::test]
  async fn test_create_object_takes_precedence_over_draft() {
    let (transport, adapter) = setup();
    transport.reply_post(Some(Value::Null));
    transport.respond_get("backlogs/42/tasks", json!([]));

    adapter.stage_new_item_field("Task_Title", "draft", None);
    let object = Task {
      title: Some("object".into()),
      ..Default::default()
    };
    assert!(adapter.create(42, Some(&object)).await);
    assert_eq!(transport.last_body().unwrap()["Task_Title"], json!("object"));
  }

  #[tokio::test]
  async fn test_create_failure_leaves_state() {
    let (transport, adapter) = setup();
    adapter.stage_new_item_field("Task_Title", "keep me", None);

    assert!(!adapter.create(42, None).await);

    assert_eq!(transport.calls(), vec!["POST tasks"]);
    assert_eq!(adapter.new_item().get("Task_Title"), Some(&json!("keep me")));
  }

  #[tokio::test]
  async fn test_update_success_refetches() {
    let (transport, adapter) = setup();
    transport.reply_put(Some(json!({})));
    transport.respond_get("backlogs/42/tasks", json!([task(7, "renamed")]));

    let changes: Task = serde_json::from_value(task(7, "renamed")).unwrap();
    assert!(adapter.update(&changes, 42).await);

    assert_eq!(transport.calls(), vec!["PUT tasks/7", "GET backlogs/42/tasks"]);
    assert_eq!(adapter.items_by_id()[0].title.as_deref(), Some("renamed"));
  }

  #[tokio::test]
  async fn test_update_failure_keeps_cache() {
    let (transport, adapter) = setup();
    transport.respond_get("backlogs/42/tasks", json!([task(7, "original")]));
    adapter.list_by_parent(42, false).await;
    let before = adapter.items_by_id();

    let changes: Task = serde_json::from_value(task(7, "renamed")).unwrap();
    assert!(!adapter.update(&changes, 42).await);

    assert_eq!(adapter.items_by_id(), before);
    assert_eq!(transport.calls().last().map(String::as_str), Some("PUT tasks/7"));
  }

  #[tokio::test]
  async fn test_update_without_id_sends_nothing() {
    let (transport, adapter) = setup();
    assert!(!adapter.update(&Task::default(), 42).await);
    assert!(transport.calls().is_empty());
  }

  #[tokio::test]
  async fn test_remove_scenario() {
    let (transport, adapter) = setup();
    transport.respond_get("backlogs/42/tasks", json!([task(7, "doomed"), task(8, "kept")]));
    adapter.list_by_parent(42, false).await;

    // Failure: nothing re-fetched, cache untouched
    transport.reply_delete(false);
    assert!(!adapter.remove(7, 42).await);
    assert_eq!(adapter.items_by_id().len(), 2);

    // Success: re-fetch reflects the server
    transport.reply_delete(true);
    transport.respond_get("backlogs/42/tasks", json!([task(8, "kept")]));
    assert!(adapter.remove(7, 42).await);
    assert_eq!(ids(&adapter.items_by_id()), vec![Some(8)]);

    assert_eq!(
      transport.calls(),
      vec![
        "GET backlogs/42/tasks",
        "DELETE tasks/7",
        "DELETE tasks/7",
        "GET backlogs/42/tasks",
      ]
    );
  }

  #[test]
  fn test_item_detail_is_consumer_owned() {
    let (_, adapter) = setup();
    let detail = Task {
      id: Some(1),
      ..Default::default()
    };
    adapter.set_item_detail(detail.clone());
    assert_eq!(adapter.item_detail(), Some(detail));
    adapter.clear_item_detail();
    assert!(adapter.item_detail().is_none());
  }

  /// Transport whose GETs resolve in whatever order the test decides.
  #[derive(Default)]
  struct PendingTransport {
    replies: Mutex<VecDeque<oneshot::Receiver<Value>>>,
  }

  #[async_trait]
  impl Transport for PendingTransport {
    async fn get(&self, _path: &str) -> Option<Value> {
      let reply = self.replies.lock().unwrap().pop_front()?;
      reply.await.ok()
    }

    async fn post(&self, _path: &str, _body: &Value) -> Option<Value> {
      None
    }

    async fn put(&self, _path: &str, _body: &Value) -> Option<Value> {
      None
    }

    async fn delete(&self, _path: &str) -> bool {
      false
    }
  }

  #[tokio::test]
  async fn test_last_response_wins_even_if_stale() {
    let transport = Arc::new(PendingTransport::default());
    let (stale_tx, stale_rx) = oneshot::channel();
    let (fresh_tx, fresh_rx) = oneshot::channel();
    transport.replies.lock().unwrap().extend([stale_rx, fresh_rx]);

    let adapter = ResourceAdapter::<Task>::new(transport.clone());

    futures::join!(
      adapter.list_by_parent(42, false),
      adapter.list_by_parent(42, false),
      async {
        let _ = fresh_tx.send(json!([task(2, "fresh")]));
        tokio::task::yield_now().await;
        let _ = stale_tx.send(json!([task(1, "stale")]));
      }
    );

    // The first request resolved last and overwrote the fresher answer
    assert_eq!(ids(&adapter.items_by_id()), vec![Some(1)]);
  }
}
