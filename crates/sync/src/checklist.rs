//! Checklist reconciliation: seeding, live patches and optimistic toggles.
//!
//! The reconciler owns the checklist view for one session and publishes
//! every change on a `tokio::sync::watch` channel so a renderer (or a
//! WebSocket session) can follow it. All methods take `&self`; two toggles
//! on the same item may run concurrently and each races its own store call.
//! Whichever write reaches the view last wins, and the change feed brings
//! sessions back in line afterwards.

use std::sync::Arc;

use foyer_core::change::{ChangeEvent, ChangeKind};
use foyer_core::checklist::{missing_pairs, ChecklistView};
use foyer_core::template::{SectionTemplate, CHECKLIST_TEMPLATE};
use foyer_db::models::checklist_item_state::ChecklistItemState;
use foyer_events::Subscription;
use serde::Serialize;
use tokio::sync::watch;

use crate::error::{StoreError, SyncError};
use crate::store::RemoteStore;

/// Snapshot of the checklist screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistState {
    pub sections: ChecklistView,
    pub is_loading: bool,
    /// Last user-visible failure, if any.
    pub error: Option<String>,
}

/// Owns the checklist view model of one session.
pub struct ChecklistReconciler {
    store: Arc<dyn RemoteStore>,
    template: &'static [SectionTemplate],
    state: watch::Sender<ChecklistState>,
}

impl ChecklistReconciler {
    /// Reconciler over the built-in expense checklist.
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self::with_template(store, CHECKLIST_TEMPLATE)
    }

    /// Reconciler over a custom template.
    pub fn with_template(store: Arc<dyn RemoteStore>, template: &'static [SectionTemplate]) -> Self {
        let (state, _) = watch::channel(ChecklistState {
            sections: ChecklistView::unchecked(template),
            is_loading: true,
            error: None,
        });
        Self {
            store,
            template,
            state,
        }
    }

    /// Join `rows` onto the template. Pure.
    pub fn merge_with_template(&self, rows: &[ChecklistItemState]) -> ChecklistView {
        ChecklistView::merge(
            self.template,
            rows.iter()
                .map(|r| (r.section_id.as_str(), r.item_id.as_str(), r.is_checked)),
        )
    }

    /// Current state.
    pub fn snapshot(&self) -> ChecklistState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn watch(&self) -> watch::Receiver<ChecklistState> {
        self.state.subscribe()
    }

    /// Open the change-feed subscription this view should follow.
    ///
    /// Open it before [`load_and_seed`](Self::load_and_seed) so no change
    /// between the fetch and the subscription is missed. Drop it when the
    /// view goes away.
    pub fn subscribe(&self) -> Subscription<ChecklistItemState> {
        self.store.subscribe_checklist()
    }

    /// Clear the user-visible error.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Fetch all item states, seed any template item without a row, and
    /// rebuild the view.
    ///
    /// Never fails: store errors are logged, surfaced in
    /// [`ChecklistState::error`], and the view falls back to the best rows
    /// known (or to everything unchecked).
    pub async fn load_and_seed(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let rows = match self.store.list_checklist_states().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch checklist items");
                self.finish_load(&[], Some(format!("Could not load the checklist: {e}")));
                return;
            }
        };

        let missing: Vec<ChecklistItemState> =
            missing_pairs(self.template, rows.iter().map(ChecklistItemState::key))
                .into_iter()
                .map(|(section_id, item_id)| ChecklistItemState::new(section_id, item_id, false))
                .collect();

        if missing.is_empty() {
            self.finish_load(&rows, None);
            return;
        }

        tracing::info!(count = missing.len(), "Seeding missing checklist items");
        if let Err(e) = self.store.seed_checklist_states(&missing).await {
            tracing::warn!(error = %e, "Failed to seed checklist items");
            self.finish_load(&rows, Some(format!("Could not initialise the checklist: {e}")));
            return;
        }

        match self.store.list_checklist_states().await {
            Ok(seeded) => self.finish_load(&seeded, None),
            Err(e) => {
                // The seeded defaults are unchecked, which is what merge
                // assumes for keys with no row.
                tracing::warn!(error = %e, "Failed to re-fetch checklist after seeding");
                self.finish_load(&rows, None);
            }
        }
    }

    fn finish_load(&self, rows: &[ChecklistItemState], error: Option<String>) {
        let sections = self.merge_with_template(rows);
        tracing::debug!(
            items = sections.item_count(),
            checked = sections.checked_count(),
            "Checklist loaded"
        );
        self.state.send_modify(|s| {
            s.sections = sections;
            s.is_loading = false;
            s.error = error;
        });
    }

    /// Apply one change-feed event to the view.
    ///
    /// Inserts and updates set the item's flag from the new row; deletes
    /// reset it to unchecked. Returns whether the event named a template
    /// item. Events without the expected row, or for keys outside the
    /// template, are ignored.
    pub fn apply_remote_event(&self, event: &ChangeEvent<ChecklistItemState>) -> bool {
        let patch = match event.kind {
            ChangeKind::Insert | ChangeKind::Update => {
                event.new_row.as_ref().map(|row| (row, row.is_checked))
            }
            ChangeKind::Delete => event.old_row.as_ref().map(|row| (row, false)),
        };

        let Some((row, checked)) = patch else {
            tracing::debug!(kind = ?event.kind, "Ignoring checklist event without row");
            return false;
        };

        // Watchers are only woken when the flag actually changes.
        let mut known = false;
        self.state.send_if_modified(|s| {
            match s.sections.is_checked(&row.section_id, &row.item_id) {
                Some(current) => {
                    known = true;
                    current != checked && s.sections.set_checked(&row.section_id, &row.item_id, checked)
                }
                None => false,
            }
        });
        if !known {
            tracing::debug!(
                section_id = %row.section_id,
                item_id = %row.item_id,
                "Ignoring checklist event for unknown item"
            );
        }
        known
    }

    /// Flip one item optimistically and persist it.
    ///
    /// The view shows `!previous_checked` before the store is called. If the
    /// upsert fails the item is set back to `previous_checked`, the error is
    /// recorded in the state, and returned.
    pub async fn toggle(
        &self,
        section_id: &str,
        item_id: &str,
        previous_checked: bool,
    ) -> Result<(), SyncError> {
        let next = !previous_checked;

        let known = self
            .state
            .send_if_modified(|s| s.sections.set_checked(section_id, item_id, next));
        if !known {
            return Err(SyncError::validation(format!(
                "Unknown checklist item {section_id}/{item_id}"
            )));
        }

        let row = ChecklistItemState::new(section_id, item_id, next);
        if let Err(e) = self.store.upsert_checklist_state(&row).await {
            tracing::warn!(
                section_id,
                item_id,
                error = %e,
                "Failed to update checklist item, rolling back"
            );
            self.rollback(section_id, item_id, previous_checked, &e);
            return Err(e.into());
        }

        Ok(())
    }

    fn rollback(&self, section_id: &str, item_id: &str, checked: bool, cause: &StoreError) {
        self.state.send_modify(|s| {
            s.sections.set_checked(section_id, item_id, checked);
            s.error = Some(format!("Could not update checklist item: {cause}"));
        });
    }
}
