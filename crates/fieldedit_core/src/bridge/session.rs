//! Message hook connecting the viewer transport to the commit pipeline.
//!
//! # Responsibility
//! - Claim edit messages coming from the in-viewer surface.
//! - Run commits and ask the viewer to refresh after a write.
//! - Keep every failure inside this hook; nothing reaches the UI event loop.
//!
//! # Invariants
//! - Messages from other senders, or with other shapes, are passed through
//!   with `handled` untouched.
//! - The debug consistency check only logs and runs only when enabled.

use crate::bridge::message::{parse_message, BridgeMessage};
use crate::config::EditConfig;
use crate::model::edit::{CommitOutcome, EditRequest};
use crate::model::record::RecordId;
use crate::repo::record_repo::{RecordStore, StoreResult};
use crate::service::commit_service::CommitService;
use log::{debug, error, warn};

/// `(handled, payload)` pair exchanged with the UI bridge.
pub type HookReply = (bool, Option<String>);

/// Surface that posted a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderContext {
    /// The read-mostly viewer showing rendered records.
    Viewer,
    /// The dedicated editor window; it saves fields on its own.
    EditorWindow,
    Other,
}

/// Viewer state and side effects the hook needs.
pub trait ViewerSurface {
    /// Record currently displayed, if any.
    fn current_record(&self) -> Option<RecordId>;
    /// Clears auto-advance timers while the user is typing.
    fn suppress_auto_advance(&mut self);
    /// Re-renders the region showing `record_id`.
    fn request_rerender(&mut self, record_id: RecordId);
}

/// Edit bridge for one viewer.
pub struct EditSession<S: RecordStore, V: ViewerSurface> {
    commits: CommitService<S>,
    viewer: V,
}

impl<S: RecordStore, V: ViewerSurface> EditSession<S, V> {
    pub fn new(store: S, viewer: V) -> Self {
        Self {
            commits: CommitService::new(store),
            viewer,
        }
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn store(&self) -> &S {
        self.commits.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.commits.store_mut()
    }

    /// Transport hook: returns `(true, None)` when the message was claimed.
    pub fn on_message(
        &mut self,
        handled: HookReply,
        url: &str,
        sender: SenderContext,
        config: &EditConfig,
    ) -> HookReply {
        if sender != SenderContext::Viewer {
            return handled;
        }
        let Some(parsed) = parse_message(url) else {
            return handled;
        };

        match parsed {
            Ok(BridgeMessage::SpeedFocus) => {
                debug!("event=speed_focus module=bridge status=ok");
                self.viewer.suppress_auto_advance();
            }
            Ok(BridgeMessage::Save(request)) => {
                if let Err(err) = self.save(&request, config) {
                    error!(
                        "event=field_commit module=bridge status=error error_code=store_failed error={err}"
                    );
                }
            }
            Err(err) => {
                warn!(
                    "event=bridge_message module=bridge status=rejected error_code=malformed_message error={err}"
                );
            }
        }
        (true, None)
    }

    /// Commits one request and refreshes the viewer after a write.
    pub fn save(
        &mut self,
        request: &EditRequest,
        config: &EditConfig,
    ) -> StoreResult<CommitOutcome> {
        self.check_displayed_record(request.record_id, config);

        let outcome = self.commits.commit(request, config)?;
        match request.record_id {
            Some(record_id) if outcome.wrote() => self.viewer.request_rerender(record_id),
            _ => {}
        }
        Ok(outcome)
    }

    /// Debug-only consistency check; returns whether a mismatch was logged.
    fn check_displayed_record(&self, transport_id: Option<RecordId>, config: &EditConfig) -> bool {
        if !config.debug {
            return false;
        }
        let displayed = self.viewer.current_record();
        if transport_id == displayed {
            return false;
        }
        warn!(
            "event=record_mismatch module=bridge status=warn transport_record={:?} displayed_record={:?}",
            transport_id, displayed
        );
        true
    }
}
