use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use labeler_core::{update, AppState, AppViewModel, Label, Msg};

use crate::effects::{EffectRunner, ReloadError};

/// One reviewer's editing session over a single dataset.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    dataset_path: PathBuf,
}

impl Session {
    pub fn new(row_limit: Option<usize>, runner: EffectRunner, dataset_path: PathBuf) -> Self {
        Self {
            state: AppState::with_row_limit(row_limit),
            runner,
            dataset_path,
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn save_target(&self) -> String {
        self.runner.target()
    }

    /// (Re)load the dataset from the save target. On error the session,
    /// including unsaved edits, is left as it was.
    pub fn reload(&mut self) -> Result<(), ReloadError> {
        let dataset = self.runner.load_dataset(&self.dataset_path)?;
        self.dispatch(Msg::DatasetLoaded(dataset));
        Ok(())
    }

    pub fn label_of(&self, row: usize) -> Label {
        self.state.label_of(row)
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Applies `msg` and any follow-up messages produced by effects.
    /// Returns whether the view changed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let mut inbox = VecDeque::from([msg]);
        let mut changed = false;
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            changed |= state.consume_dirty();
            self.state = state;
            for effect in effects {
                inbox.push_back(self.runner.run(effect));
            }
        }
        changed
    }
}
