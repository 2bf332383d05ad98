//! Persistence update functions

use crate::commands::Cmd;
use crate::grid::{SaveBatch, SaveOutcome, SaveResult};
use crate::messages::SyncMsg;
use crate::model::AppModel;

use super::grid::commit_active_edit;

/// Handle persistence messages
pub fn update_sync(model: &mut AppModel, msg: SyncMsg) -> Option<Cmd> {
    match msg {
        SyncMsg::Save => save(model),
        SyncMsg::SaveCompleted(result) => save_completed(model, result),
        SyncMsg::RowDeleted { key, result } => match result {
            Ok(()) => {
                let removed = model.grid.remove_row_by_key(key);
                tracing::info!(row_key = key.raw(), "row deleted");
                removed.map(|_| Cmd::Redraw)
            }
            Err(e) => {
                model.notify_error(e.to_string());
                None
            }
        },
    }
}

/// Snapshot the dirty rows into a batch for the runtime to run
fn save(model: &mut AppModel) -> Option<Cmd> {
    let was_editing = commit_active_edit(model);

    let batch = SaveBatch::collect(model.grid.store());
    if batch.is_empty() {
        tracing::debug!("save: no dirty rows");
        model.last_save = Some(SaveOutcome::default());
        return was_editing.then_some(Cmd::Redraw);
    }

    tracing::info!(rows = batch.len(), "saving");
    let persist = Cmd::PersistRows(batch);
    if was_editing {
        Some(Cmd::batch(vec![Cmd::Redraw, persist]))
    } else {
        Some(persist)
    }
}

fn save_completed(model: &mut AppModel, result: SaveResult) -> Option<Cmd> {
    let applied = model.grid.apply_save_result(&result);
    let outcome = SaveOutcome {
        attempted: result.attempted,
        committed: result.committed.len(),
        error: result.failure,
    };

    match &outcome.error {
        None => model.notify_info(format!("Saved {} rows", outcome.committed)),
        Some(e) => model.notify_error(format!(
            "save stopped after {} of {} rows: {}",
            outcome.committed, outcome.attempted, e
        )),
    }
    tracing::debug!(applied, "save result applied");

    model.last_save = Some(outcome);
    Some(Cmd::Redraw)
}
