use std::sync::Once;

use labeler_core::{
    update, AppState, Dataset, Effect, EditBuffer, Label, Msg, Record, SaveFailure,
    SaveFailureKind, SaveStatus, SaveSummary,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(labeler_logging::initialize_for_tests);
}

fn dataset(rows: usize) -> Dataset {
    let records = (0..rows)
        .map(|i| Record::new(format!("issue {i}"), format!("http://x/{i}")))
        .collect();
    Dataset::new(vec!["body".into()], records)
}

fn loaded(rows: usize) -> AppState {
    let (mut state, _) = update(AppState::new(), Msg::DatasetLoaded(dataset(rows)));
    assert!(state.consume_dirty());
    state
}

#[test]
fn standard_then_not_standard_switches_label() {
    init_logging();
    let state = loaded(2);

    let (state, _) = update(state, Msg::StandardToggled { row: 0, checked: true });
    assert_eq!(state.label_of(0), Label::Standard);

    let (state, effects) = update(state, Msg::NotStandardToggled { row: 0, checked: true });
    assert_eq!(state.label_of(0), Label::NotStandard);
    assert!(effects.is_empty());

    let view = state.view();
    assert!(!view.rows[0].standard);
    assert!(view.rows[0].not_standard);
    assert!(view.rows[0].edited);
    assert!(!view.rows[1].edited);
}

#[test]
fn unchecking_selected_control_clears_label() {
    init_logging();
    let state = loaded(1);
    let (state, _) = update(state, Msg::StandardToggled { row: 0, checked: true });

    // Unchecking the other control leaves the label alone.
    let (state, _) = update(state, Msg::NotStandardToggled { row: 0, checked: false });
    assert_eq!(state.label_of(0), Label::Standard);

    let (state, _) = update(state, Msg::StandardToggled { row: 0, checked: false });
    assert_eq!(state.label_of(0), Label::Unset);
}

#[test]
fn edits_outside_dataset_are_ignored() {
    init_logging();
    let state = loaded(2);

    let (mut state, _) = update(
        state,
        Msg::LabelSet {
            row: 5,
            label: Label::Standard,
        },
    );
    assert!(!state.consume_dirty());
    assert!(state.buffer().get(5).is_none());
    assert_eq!(state.buffer().len(), 2);
}

#[test]
fn edits_beyond_row_limit_are_ignored() {
    init_logging();
    let (mut state, _) = update(
        AppState::with_row_limit(Some(2)),
        Msg::DatasetLoaded(dataset(4)),
    );
    state.consume_dirty();
    assert_eq!(state.editable_rows(), 2);
    assert_eq!(state.view().rows.len(), 2);
    assert_eq!(state.view().total_rows, 4);

    let (mut state, _) = update(
        state,
        Msg::ReasonChanged {
            row: 3,
            text: "late".into(),
        },
    );
    assert!(!state.consume_dirty());
    assert_eq!(state.buffer().get(3).map(|e| e.reason.as_str()), Some(""));
}

#[test]
fn save_emits_reconcile_with_buffer() {
    init_logging();
    let state = loaded(1);
    let (state, _) = update(state, Msg::StandardToggled { row: 0, checked: true });
    let (state, _) = update(
        state,
        Msg::ReasonChanged {
            row: 0,
            text: "clear repro steps".into(),
        },
    );

    let (state, effects) = update(state, Msg::SaveClicked);

    let mut expected = EditBuffer::new();
    expected.insert(0, Label::Standard, "clear repro steps");
    assert_eq!(effects, vec![Effect::Reconcile { edits: expected }]);
    assert_eq!(state.save_status(), &SaveStatus::Saving);
}

#[test]
fn save_sends_only_rows_edited_this_session() {
    init_logging();
    let state = loaded(3);
    let (state, _) = update(state, Msg::NotStandardToggled { row: 2, checked: true });

    let (state, effects) = update(state, Msg::SaveClicked);

    let mut expected = EditBuffer::new();
    expected.insert(2, Label::NotStandard, "");
    assert_eq!(effects, vec![Effect::Reconcile { edits: expected }]);

    let summary = SaveSummary {
        version: None,
        rows: 3,
        applied: 1,
        dropped: 0,
    };
    let (state, _) = update(state, Msg::SaveFinished(Ok(summary)));
    let (_state, effects) = update(state, Msg::SaveClicked);
    assert_eq!(
        effects,
        vec![Effect::Reconcile {
            edits: EditBuffer::new()
        }]
    );
}

#[test]
fn second_save_while_in_flight_is_ignored() {
    init_logging();
    let (state, effects) = update(loaded(1), Msg::SaveClicked);
    assert_eq!(effects.len(), 1);

    let (_state, effects) = update(state, Msg::SaveClicked);
    assert!(effects.is_empty());
}

#[test]
fn successful_save_folds_edits_into_dataset() {
    init_logging();
    let state = loaded(2);
    let (state, _) = update(state, Msg::NotStandardToggled { row: 1, checked: true });
    let (state, _) = update(state, Msg::SaveClicked);

    let summary = SaveSummary {
        version: Some("abc123".into()),
        rows: 2,
        applied: 1,
        dropped: 0,
    };
    let (state, effects) = update(state, Msg::SaveFinished(Ok(summary.clone())));

    assert!(effects.is_empty());
    assert_eq!(state.save_status(), &SaveStatus::Saved(summary));
    assert_eq!(state.dataset().records()[1].label, Label::NotStandard);
    assert_eq!(state.view().pending_edits, 0);
}

#[test]
fn conflict_keeps_pending_edits() {
    init_logging();
    let state = loaded(1);
    let (state, _) = update(state, Msg::StandardToggled { row: 0, checked: true });
    let (state, _) = update(state, Msg::SaveClicked);

    let failure = SaveFailure::new(SaveFailureKind::Conflict, "sha mismatch");
    let (state, _) = update(state, Msg::SaveFinished(Err(failure.clone())));

    assert_eq!(state.save_status(), &SaveStatus::Failed(failure));
    assert_eq!(state.view().pending_edits, 1);
    assert_eq!(state.dataset().records()[0].label, Label::Unset);

    // A failed save does not block retrying.
    let (_state, effects) = update(state, Msg::SaveClicked);
    assert_eq!(effects.len(), 1);
}

#[test]
fn reload_keeps_touched_rows_and_refreshes_the_rest() {
    init_logging();
    let state = loaded(3);
    let (state, _) = update(
        state,
        Msg::ReasonChanged {
            row: 0,
            text: "mine".into(),
        },
    );

    let mut refreshed = dataset(2);
    refreshed.record_mut(0).unwrap().reason = "theirs".into();
    refreshed.record_mut(1).unwrap().label = Label::Standard;
    let (state, _) = update(state, Msg::DatasetLoaded(refreshed));

    assert_eq!(state.buffer().len(), 2);
    assert_eq!(state.buffer().get(0).unwrap().reason, "mine");
    assert_eq!(state.label_of(1), Label::Standard);
    assert!(state.buffer().get(2).is_none());
}
