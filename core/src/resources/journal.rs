use crate::envelope::{decode, ListPayload};
use crate::error::ApiError;
use crate::executor::Executor;
use crate::request::{with_query, PageRequest};
use crate::types::{JournalEntry, JournalEntryUpdate, NewJournalEntry};

use super::{rejected, require_text};

/// Personal journal entries of the signed-in user.
pub struct JournalApi<'a> {
    executor: &'a Executor,
}

impl<'a> JournalApi<'a> {
    pub(crate) fn new(executor: &'a Executor) -> Self {
        Self { executor }
    }

    /// One page of entries. A 404 means the user has no journal yet and reads
    /// as an empty page; every other failure is returned.
    pub async fn list_entries(&self, page: PageRequest) -> Result<Vec<JournalEntry>, ApiError> {
        let endpoint = with_query("/journal/entries", &page.query_pairs());
        let result = match self.executor.get(&endpoint).await {
            Ok(value) => ListPayload::<JournalEntry>::decode(value).map(ListPayload::into_items),
            Err(error) if error.is_not_found() => {
                tracing::debug!("no journal found, treating as empty");
                Ok(Vec::new())
            }
            Err(error) => Err(error),
        };
        result.inspect_err(|error| {
            tracing::error!(%error, page = page.page, "failed to load journal entries")
        })
    }

    pub async fn get_entry(&self, id: i64) -> Result<JournalEntry, ApiError> {
        self.executor
            .get(&format!("/journal/entries/{id}"))
            .await
            .and_then(decode)
            .inspect_err(|error| {
                tracing::error!(%error, entry_id = id, "failed to load journal entry")
            })
    }

    pub async fn create_entry(&self, entry: &NewJournalEntry) -> Result<JournalEntry, ApiError> {
        require_text(&entry.title, "title")?;
        require_text(&entry.content, "content")?;
        self.executor
            .post("/journal/entries", entry)
            .await
            .and_then(decode)
            .inspect_err(|error| tracing::error!(%error, "failed to create journal entry"))
    }

    pub async fn update_entry(
        &self,
        id: i64,
        update: &JournalEntryUpdate,
    ) -> Result<JournalEntry, ApiError> {
        if update.is_empty() {
            return Err(rejected("nothing to update"));
        }
        if let Some(title) = &update.title {
            require_text(title, "title")?;
        }
        self.executor
            .put(&format!("/journal/entries/{id}"), update)
            .await
            .and_then(decode)
            .inspect_err(|error| {
                tracing::error!(%error, entry_id = id, "failed to update journal entry")
            })
    }

    /// Delete one entry. The response body is discarded.
    pub async fn delete_entry(&self, id: i64) -> Result<(), ApiError> {
        self.executor
            .delete(&format!("/journal/entries/{id}"))
            .await
            .map(drop)
            .inspect_err(|error| {
                tracing::error!(%error, entry_id = id, "failed to delete journal entry")
            })
    }

    /// Delete `id` on the server, then drop it from `entries`. The list is
    /// left untouched when the request fails.
    pub async fn delete_from(
        &self,
        entries: &mut Vec<JournalEntry>,
        id: i64,
    ) -> Result<(), ApiError> {
        self.delete_entry(id).await?;
        entries.retain(|entry| entry.id != id);
        Ok(())
    }
}
