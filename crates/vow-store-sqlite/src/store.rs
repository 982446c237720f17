//! [`SqliteStore`], the SQLite implementation of [`PlannerStore`].

use std::{future::Future, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use vow_core::{
  document::{Document, DocumentMeta, OwnerId},
  plan::{PlanInput, WeddingPlan},
  store::PlannerStore,
  subscription::{SNAPSHOT_BUFFER, Subscription},
};

use crate::{
  Error, Result,
  encode::{decode_bodies, encode_dt, encode_uuid},
  feed::{self, Change, ChangeTarget},
  schema::SCHEMA,
};

/// Wrap a non-SQLite failure raised inside a connection closure.
fn closure_error(e: impl std::error::Error + Send + Sync + 'static) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A planner store backed by a single SQLite file.
///
/// Clones share the connection and the change feed.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  changes: broadcast::Sender<Change>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, changes: feed::channel() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, changes: feed::channel() };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  fn notify(&self, target: ChangeTarget, owner_id: OwnerId) {
    // No receivers is not an error: nobody is subscribed right now.
    let _ = self.changes.send(Change { target, owner_id });
  }

  async fn load_plan(&self, owner: OwnerId) -> Result<Option<WeddingPlan>> {
    let owner_str = owner.as_str().to_owned();

    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT body_json FROM wedding_plans WHERE owner_id = ?1",
            rusqlite::params![owner_str],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
  }

  async fn load_collection<D: Document>(&self, owner: OwnerId) -> Result<Vec<D>> {
    let owner_str = owner.as_str().to_owned();
    let sql = format!(
      "SELECT body_json FROM {} WHERE owner_id = ?1 ORDER BY created_at, doc_id",
      D::COLLECTION.name()
    );

    let bodies: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    let mut docs = decode_bodies::<D>(bodies)?;
    D::sort_snapshot(&mut docs);
    Ok(docs)
  }

  /// Deliver `initial`, then re-run `load` and deliver its result every time
  /// a change for `(target, owner)` arrives on `changes`.
  ///
  /// `changes` must be subscribed before `initial` is read, so no write can
  /// slip between the two.
  fn spawn_feed<T, F, Fut>(
    &self,
    mut changes: broadcast::Receiver<Change>,
    target: ChangeTarget,
    owner: OwnerId,
    initial: Vec<T>,
    load: F,
  ) -> Subscription<T>
  where
    T: Send + 'static,
    F: Fn(SqliteStore, OwnerId) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
  {
    let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
    let store = self.clone();

    let feeder = tokio::spawn(async move {
      if tx.send(initial).await.is_err() {
        return;
      }
      loop {
        match changes.recv().await {
          Ok(change) if !change.affects(target, &owner) => continue,
          Ok(_) => {}
          Err(broadcast::error::RecvError::Lagged(skipped)) => {
            tracing::debug!(?target, %owner, skipped, "subscriber lagged; reloading");
          }
          Err(broadcast::error::RecvError::Closed) => break,
        }

        match load(store.clone(), owner.clone()).await {
          Ok(snapshot) => {
            if tx.send(snapshot).await.is_err() {
              break;
            }
          }
          Err(e) => {
            tracing::warn!(?target, %owner, error = %e, "failed to reload snapshot");
          }
        }
      }
      tracing::debug!(?target, %owner, "subscription closed");
    });

    Subscription::new(rx, feeder)
  }
}

// ─── PlannerStore impl ───────────────────────────────────────────────────────

impl PlannerStore for SqliteStore {
  type Error = Error;

  // ── Wedding plan ──────────────────────────────────────────────────────────

  async fn get_plan(&self, owner: OwnerId) -> Result<Option<WeddingPlan>> {
    self.load_plan(owner).await
  }

  async fn save_plan(&self, owner: OwnerId, input: PlanInput) -> Result<WeddingPlan> {
    let owner_str = owner.as_str().to_owned();
    let owner_id  = owner.clone();
    let now       = Utc::now();

    let plan: WeddingPlan = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let previous: Option<String> = tx
          .query_row(
            "SELECT body_json FROM wedding_plans WHERE owner_id = ?1",
            rusqlite::params![owner_str],
            |row| row.get(0),
          )
          .optional()?;
        let previous: Option<WeddingPlan> = previous
          .map(|b| serde_json::from_str(&b))
          .transpose()
          .map_err(closure_error)?;

        let plan = WeddingPlan::from_save(owner_id, input, previous.as_ref(), now);
        let body = serde_json::to_string(&plan).map_err(closure_error)?;

        tx.execute(
          "INSERT INTO wedding_plans (owner_id, created_at, updated_at, body_json)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(owner_id) DO UPDATE SET
             updated_at = excluded.updated_at,
             body_json  = excluded.body_json",
          rusqlite::params![
            owner_str,
            encode_dt(plan.created_at),
            encode_dt(plan.updated_at),
            body,
          ],
        )?;
        tx.commit()?;
        Ok(plan)
      })
      .await?;

    tracing::debug!(%owner, wedding_at = %plan.wedding_at, "wedding plan saved");
    self.notify(ChangeTarget::Plan, owner);
    Ok(plan)
  }

  async fn subscribe_plan(&self, owner: OwnerId) -> Result<Subscription<WeddingPlan>> {
    let changes = self.changes.subscribe();
    let initial: Vec<WeddingPlan> = self.load_plan(owner.clone()).await?.into_iter().collect();

    tracing::debug!(%owner, "subscribed to wedding plan");
    Ok(self.spawn_feed(
      changes,
      ChangeTarget::Plan,
      owner,
      initial,
      |store, owner| async move {
        store
          .load_plan(owner)
          .await
          .map(|plan| plan.into_iter().collect::<Vec<_>>())
      },
    ))
  }

  // ── Collections ───────────────────────────────────────────────────────────

  async fn add<D: Document>(&self, owner: OwnerId, input: D::New) -> Result<D> {
    let meta = DocumentMeta {
      id:         Uuid::new_v4(),
      owner_id:   owner.clone(),
      created_at: Utc::now(),
      updated_at: None,
    };
    let doc = D::create(meta, input);

    let id_str    = encode_uuid(doc.id());
    let owner_str = owner.as_str().to_owned();
    let at_str    = encode_dt(doc.meta().created_at);
    let body      = doc.to_json()?;
    let sql       = format!(
      "INSERT INTO {} (doc_id, owner_id, created_at, body_json) VALUES (?1, ?2, ?3, ?4)",
      D::COLLECTION.name()
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params![id_str, owner_str, at_str, body])?;
        Ok(())
      })
      .await?;

    tracing::debug!(collection = %D::COLLECTION, id = %doc.id(), %owner, "document added");
    self.notify(ChangeTarget::Collection(D::COLLECTION), owner);
    Ok(doc)
  }

  async fn get<D: Document>(&self, id: Uuid) -> Result<Option<D>> {
    let id_str = encode_uuid(id);
    let sql    = format!("SELECT body_json FROM {} WHERE doc_id = ?1", D::COLLECTION.name());

    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![id_str], |row| row.get(0))
          .optional()?)
      })
      .await?;

    Ok(body.map(|b| D::from_json(&b)).transpose()?)
  }

  async fn update<D: Document>(&self, id: Uuid, patch: D::Patch) -> Result<D> {
    let table  = D::COLLECTION.name();
    let id_str = encode_uuid(id);
    let now    = Utc::now();

    // Read, merge and write back in one transaction so concurrent updates to
    // the same document cannot interleave.
    let updated: Option<D> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let body: Option<String> = tx
          .query_row(
            &format!("SELECT body_json FROM {table} WHERE doc_id = ?1"),
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;
        let Some(body) = body else {
          return Ok(None);
        };

        let mut doc = D::from_json(&body).map_err(closure_error)?;
        doc.apply(patch);
        doc.meta_mut().updated_at = Some(now);
        let body = doc.to_json().map_err(closure_error)?;

        tx.execute(
          &format!("UPDATE {table} SET body_json = ?1, updated_at = ?2 WHERE doc_id = ?3"),
          rusqlite::params![body, encode_dt(now), id_str],
        )?;
        tx.commit()?;
        Ok(Some(doc))
      })
      .await?;

    let doc = updated.ok_or(Error::DocumentNotFound { collection: D::COLLECTION, id })?;

    tracing::debug!(collection = %D::COLLECTION, %id, "document updated");
    self.notify(ChangeTarget::Collection(D::COLLECTION), doc.meta().owner_id.clone());
    Ok(doc)
  }

  async fn delete<D: Document>(&self, id: Uuid) -> Result<()> {
    let table  = D::COLLECTION.name();
    let id_str = encode_uuid(id);

    let owner: Option<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let owner: Option<String> = tx
          .query_row(
            &format!("SELECT owner_id FROM {table} WHERE doc_id = ?1"),
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;
        if owner.is_some() {
          tx.execute(
            &format!("DELETE FROM {table} WHERE doc_id = ?1"),
            rusqlite::params![id_str],
          )?;
        }
        tx.commit()?;
        Ok(owner)
      })
      .await?;

    match owner {
      Some(owner) => {
        tracing::debug!(collection = %D::COLLECTION, %id, "document deleted");
        self.notify(ChangeTarget::Collection(D::COLLECTION), OwnerId::from(owner));
      }
      None => {
        tracing::debug!(collection = %D::COLLECTION, %id, "delete of absent document ignored");
      }
    }
    Ok(())
  }

  async fn list<D: Document>(&self, owner: OwnerId) -> Result<Vec<D>> {
    self.load_collection(owner).await
  }

  async fn subscribe<D: Document>(&self, owner: OwnerId) -> Result<Subscription<D>> {
    let changes = self.changes.subscribe();
    let initial = self.load_collection::<D>(owner.clone()).await?;

    tracing::debug!(collection = %D::COLLECTION, %owner, "subscribed");
    Ok(self.spawn_feed(
      changes,
      ChangeTarget::Collection(D::COLLECTION),
      owner,
      initial,
      |store, owner| async move { store.load_collection::<D>(owner).await },
    ))
  }
}
