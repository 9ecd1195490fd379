use crate::{AppState, Effect, Label, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DatasetLoaded(dataset) => {
            state.load_dataset(dataset);
            Vec::new()
        }
        Msg::StandardToggled { row, checked } => {
            toggle(&mut state, row, Label::Standard, checked);
            Vec::new()
        }
        Msg::NotStandardToggled { row, checked } => {
            toggle(&mut state, row, Label::NotStandard, checked);
            Vec::new()
        }
        Msg::LabelSet { row, label } => {
            state.set_label(row, label);
            Vec::new()
        }
        Msg::ReasonChanged { row, text } => {
            state.set_reason(row, text);
            Vec::new()
        }
        Msg::SaveClicked => match state.begin_save() {
            Some(edits) => vec![Effect::Reconcile { edits }],
            None => Vec::new(),
        },
        Msg::SaveFinished(result) => {
            state.finish_save(result);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// The two label controls are paired: checking one selects it, unchecking the
/// selected one clears the label, unchecking the other one does nothing.
fn toggle(state: &mut AppState, row: usize, control: Label, checked: bool) {
    if checked {
        state.set_label(row, control);
    } else if state.label_of(row) == control {
        state.set_label(row, Label::Unset);
    }
}
