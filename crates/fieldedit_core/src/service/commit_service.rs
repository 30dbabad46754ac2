//! Field commit use-case.
//!
//! # Responsibility
//! - Normalize a raw in-place edit and write it back to its record.
//! - Short-circuit stale records, unknown fields and unchanged values.
//!
//! # Invariants
//! - `received → decoded → normalized → {stale | unknown | no-op | committed}`;
//!   every commit ends in exactly one outcome and is never retried.
//! - No checkpoint and no write happen unless the outcome is `Committed`.
//! - A record missing at load or at write time yields `StaleRecord`, not an
//!   error.
//! - Field contents are never logged; only lengths and ids are.

use crate::config::EditConfig;
use crate::model::edit::{CommitOutcome, EditRequest};
use crate::model::record::Record;
use crate::repo::record_repo::{RecordStore, StoreError, StoreResult};
use crate::service::normalize::{normalize_field_value, tag_tokens};
use log::{debug, info, warn};

/// Label of the undo checkpoint registered with a committed write.
pub const UNDO_CHECKPOINT_LABEL: &str = "Edit Field";

/// Commit pipeline over one record store.
pub struct CommitService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> CommitService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Normalizes `request.raw_value` and applies it to the addressed field.
    ///
    /// The caller is responsible for requesting a re-render when the outcome
    /// is `Committed`.
    ///
    /// # Errors
    /// - Storage failures other than a missing record.
    pub fn commit(
        &mut self,
        request: &EditRequest,
        config: &EditConfig,
    ) -> StoreResult<CommitOutcome> {
        let Some(record_id) = request.record_id else {
            debug!(
                "event=field_commit module=service status=skipped outcome={} reason=no_record",
                CommitOutcome::StaleRecord
            );
            return Ok(CommitOutcome::StaleRecord);
        };

        let normalized = normalize_field_value(&request.raw_value);

        let mut record = match self.store.get_record(record_id) {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => {
                info!(
                    "event=field_commit module=service status=skipped outcome={} record_id={record_id}",
                    CommitOutcome::StaleRecord
                );
                return Ok(CommitOutcome::StaleRecord);
            }
            Err(err) => return Err(err),
        };

        let changed = if Record::is_tags_field(&request.field_name) {
            let tags = self.store.canonicalize_tags(&tag_tokens(&normalized))?;
            if tags == record.tags {
                false
            } else {
                record.tags = tags;
                true
            }
        } else {
            let Some(current) = record.field(&request.field_name) else {
                warn!(
                    "event=field_commit module=service status=rejected outcome={} record_id={record_id} field_name_len={}",
                    CommitOutcome::UnknownField,
                    request.field_name.len()
                );
                return Ok(CommitOutcome::UnknownField);
            };
            if current == normalized {
                false
            } else {
                record.set_field(&request.field_name, normalized.as_str())
            }
        };

        if !changed {
            debug!(
                "event=field_commit module=service status=ok outcome={} record_id={record_id}",
                CommitOutcome::NoOp
            );
            return Ok(CommitOutcome::NoOp);
        }

        let checkpoint = config.undo.then_some(UNDO_CHECKPOINT_LABEL);
        match self.store.update_record(&record, checkpoint) {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                info!(
                    "event=field_commit module=service status=skipped outcome={} record_id={record_id} stage=write",
                    CommitOutcome::StaleRecord
                );
                return Ok(CommitOutcome::StaleRecord);
            }
            Err(err) => return Err(err),
        }

        info!(
            "event=field_commit module=service status=ok outcome={} record_id={record_id} value_len={} undo={}",
            CommitOutcome::Committed,
            normalized.len(),
            config.undo
        );
        Ok(CommitOutcome::Committed)
    }
}
