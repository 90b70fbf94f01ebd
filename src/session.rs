//! Confirm-then-apply: the store changes only after the server accepted the
//! corresponding request. A failed request leaves the store as it was, so
//! there is nothing to roll back.

use tracing::{info, warn};

use crate::api::DeadlineApi;
use crate::error::Result;
use crate::models::{Deadline, DeadlineDraft, DeadlineId};
use crate::store::DeadlineStore;

/// A server-acknowledged change waiting to be applied locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmed {
    Loaded(Vec<Deadline>),
    Created(Deadline),
    Updated(Deadline),
    Deleted(DeadlineId),
}

impl Confirmed {
    /// Mirrors the acknowledged change into `store`.
    pub fn apply(self, store: &mut DeadlineStore) {
        match self {
            Confirmed::Loaded(deadlines) => store.set_deadlines(deadlines),
            Confirmed::Created(d) => store.create_deadline(d.id, d.title, d.description, d.end_date),
            Confirmed::Updated(d) => {
                store.update_deadline(d.id, d.title, d.description, d.end_date);
            }
            Confirmed::Deleted(id) => {
                store.delete_deadline(id);
            }
        }
    }
}

pub async fn request_load<A: DeadlineApi>(api: &A) -> Result<Confirmed> {
    let deadlines = api
        .list_all()
        .await
        .inspect_err(|e| warn!(error = %e, "loading deadlines failed"))?;
    Ok(Confirmed::Loaded(deadlines))
}

/// Validates `draft` and asks the server to create it.
pub async fn request_create<A: DeadlineApi>(api: &A, draft: DeadlineDraft) -> Result<Confirmed> {
    create_remote(api, draft).await.map(Confirmed::Created)
}

async fn create_remote<A: DeadlineApi>(api: &A, draft: DeadlineDraft) -> Result<Deadline> {
    let draft = draft.validate()?;
    let created = api
        .create(&draft)
        .await
        .inspect_err(|e| warn!(error = %e, "creating deadline failed"))?;
    info!(id = %created.id, "deadline created");
    Ok(created)
}

/// Validates `draft` and asks the server to overwrite deadline `id` with it.
pub async fn request_update<A: DeadlineApi>(
    api: &A,
    id: DeadlineId,
    draft: DeadlineDraft,
) -> Result<Confirmed> {
    let deadline = draft.validate()?.into_deadline(id);
    api.update(&deadline)
        .await
        .inspect_err(|e| warn!(error = %e, %id, "updating deadline failed"))?;
    info!(%id, "deadline updated");
    Ok(Confirmed::Updated(deadline))
}

pub async fn request_delete<A: DeadlineApi>(api: &A, id: DeadlineId) -> Result<Confirmed> {
    api.delete(id)
        .await
        .inspect_err(|e| warn!(error = %e, %id, "deleting deadline failed"))?;
    info!(%id, "deadline deleted");
    Ok(Confirmed::Deleted(id))
}

/// A remote API paired with the store it keeps in sync.
pub struct Session<A> {
    api: A,
    store: DeadlineStore,
}

impl<A: DeadlineApi> Session<A> {
    pub fn new(api: A) -> Self {
        Self::with_store(api, DeadlineStore::new())
    }

    pub fn with_store(api: A, store: DeadlineStore) -> Self {
        Session { api, store }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &DeadlineStore {
        &self.store
    }

    /// Replaces the store's contents with the server's list.
    pub async fn load(&mut self) -> Result<()> {
        request_load(&self.api).await?.apply(&mut self.store);
        Ok(())
    }

    /// Creates a deadline remotely, then locally. Returns the new id.
    pub async fn create(&mut self, draft: DeadlineDraft) -> Result<DeadlineId> {
        let created = create_remote(&self.api, draft).await?;
        let id = created.id;
        Confirmed::Created(created).apply(&mut self.store);
        Ok(id)
    }

    pub async fn update(&mut self, id: DeadlineId, draft: DeadlineDraft) -> Result<()> {
        request_update(&self.api, id, draft).await?.apply(&mut self.store);
        Ok(())
    }

    pub async fn delete(&mut self, id: DeadlineId) -> Result<()> {
        request_delete(&self.api, id).await?.apply(&mut self.store);
        Ok(())
    }
}
