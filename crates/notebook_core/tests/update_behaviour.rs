use std::sync::Once;

use notebook_core::{
    update, AppState, Effect, EntryStatus, EvalOutcome, Msg, ResultRendering, ResultView,
    SubmissionPolicy, TranscriptSettings, FAILED_TEXT, PLACEHOLDER_TEXT, TIMED_OUT_TEXT,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(notebook_logging::initialize_for_tests);
}

fn submit(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::Submit(input.to_string()))
}

fn complete(state: AppState, entry_id: u64, outcome: EvalOutcome) -> (AppState, Vec<Effect>) {
    update(state, Msg::EvalCompleted { entry_id, outcome })
}

#[test]
fn submit_appends_pending_entry_and_orders_effects() {
    init_logging();
    let (mut state, effects) = submit(AppState::new(), "  1 + 1 \n");

    assert_eq!(
        effects,
        vec![
            Effect::ClearEditor,
            Effect::AppendEntry(1),
            Effect::ScrollToBottom,
            Effect::PostEval {
                entry_id: 1,
                source: "1 + 1".to_string(),
            },
        ]
    );

    let entry = state.entry(1).unwrap();
    assert_eq!(entry.source, "1 + 1");
    assert_eq!(entry.result, PLACEHOLDER_TEXT);
    assert_eq!(entry.status, EntryStatus::Pending);
    assert_eq!(state.view().pending, 1);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn success_replaces_placeholder_with_body() {
    init_logging();
    let (state, _) = submit(AppState::new(), "1 + 1");
    let (state, effects) = complete(state, 1, EvalOutcome::Success("2".to_string()));

    assert_eq!(effects, vec![Effect::RefreshEntry(1)]);
    let entry = state.entry(1).unwrap();
    assert_eq!(entry.result, "2");
    assert_eq!(entry.status, EntryStatus::Resolved);
    assert_eq!(state.view().pending, 0);
}

#[test]
fn server_error_shows_failed() {
    init_logging();
    let (state, _) = submit(AppState::new(), "boom");
    let (state, _) = complete(state, 1, EvalOutcome::ServerError);

    let entry = state.entry(1).unwrap();
    assert_eq!(entry.result, FAILED_TEXT);
    assert_eq!(entry.status, EntryStatus::Failed);
}

#[test]
fn other_failures_are_terminal() {
    init_logging();
    let (state, _) = submit(AppState::new(), "a");
    let (state, _) = submit(state, "b");
    let (state, _) = submit(state, "c");
    let (state, _) = complete(state, 1, EvalOutcome::HttpStatus(404));
    let (state, _) = complete(state, 2, EvalOutcome::Network("connection refused".into()));
    let (state, _) = complete(state, 3, EvalOutcome::TimedOut);

    assert_eq!(state.entry(1).unwrap().result, "Failed! (HTTP 404)");
    assert_eq!(state.entry(1).unwrap().status, EntryStatus::Failed);
    assert_eq!(
        state.entry(2).unwrap().result,
        "Failed! (connection refused)"
    );
    assert_eq!(state.entry(3).unwrap().result, TIMED_OUT_TEXT);
    assert_eq!(state.entry(3).unwrap().status, EntryStatus::TimedOut);
}

#[test]
fn overlapping_submissions_resolve_out_of_order() {
    init_logging();
    let (state, _) = submit(AppState::new(), "first");
    let (state, _) = submit(state, "second");

    let (state, effects) = complete(state, 2, EvalOutcome::Success("two".into()));
    assert_eq!(effects, vec![Effect::RefreshEntry(2)]);
    assert_eq!(state.entry(1).unwrap().status, EntryStatus::Pending);
    assert_eq!(state.entry(2).unwrap().result, "two");

    let (state, _) = complete(state, 1, EvalOutcome::Success("one".into()));
    let sources: Vec<_> = state
        .entries()
        .iter()
        .map(|entry| (entry.source.as_str(), entry.result.as_str()))
        .collect();
    assert_eq!(sources, vec![("first", "one"), ("second", "two")]);
}

#[test]
fn completion_is_applied_once() {
    init_logging();
    let (state, _) = submit(AppState::new(), "x");
    let (state, _) = complete(state, 1, EvalOutcome::Success("ok".into()));
    let (mut state, effects) = complete(state, 1, EvalOutcome::ServerError);

    assert!(effects.is_empty());
    assert_eq!(state.entry(1).unwrap().result, "ok");
    assert!(state.consume_dirty());

    let (mut state, effects) = complete(state, 99, EvalOutcome::ServerError);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn empty_submission_is_sent_by_default() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "   \n");

    assert_eq!(effects.len(), 4);
    assert_eq!(
        effects.last(),
        Some(&Effect::PostEval {
            entry_id: 1,
            source: String::new(),
        })
    );
    assert_eq!(state.entries().len(), 1);
}

#[test]
fn empty_submission_can_be_rejected() {
    init_logging();
    let settings = TranscriptSettings {
        submission: SubmissionPolicy::RejectEmpty,
        ..TranscriptSettings::default()
    };
    let (mut state, effects) = submit(AppState::with_settings(settings), "  ");

    assert!(effects.is_empty());
    assert!(state.entries().is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn cancel_pending_targets_only_pending_entries() {
    init_logging();
    let (state, _) = submit(AppState::new(), "a");
    let (state, _) = submit(state, "b");
    let (state, _) = submit(state, "c");
    let (state, _) = complete(state, 2, EvalOutcome::Success("done".into()));

    let (state, effects) = update(state, Msg::CancelPending);
    assert_eq!(
        effects,
        vec![
            Effect::CancelEval { entry_id: 1 },
            Effect::CancelEval { entry_id: 3 },
        ]
    );

    // Cancellation is only visible once the engine confirms it.
    assert_eq!(state.entry(1).unwrap().status, EntryStatus::Pending);
    let (state, _) = complete(state, 1, EvalOutcome::Cancelled);
    assert_eq!(state.entry(1).unwrap().status, EntryStatus::Cancelled);
}

#[test]
fn plain_text_rendering_shows_body_as_literal_text() {
    init_logging();
    let settings = TranscriptSettings {
        rendering: ResultRendering::PlainText,
        ..TranscriptSettings::default()
    };
    let (state, _) = submit(AppState::with_settings(settings), "html");
    let (state, _) = complete(state, 1, EvalOutcome::Success("<b>2</b>".into()));

    let view = state.view();
    assert_eq!(
        view.rows[0].result,
        ResultView::Text("<b>2</b>".to_string())
    );
    assert_eq!(state.entry(1).unwrap().status, EntryStatus::Resolved);
}

#[test]
fn trusted_rendering_keeps_markup_verbatim() {
    init_logging();
    let (state, _) = submit(AppState::new(), "html");
    let (state, _) = complete(state, 1, EvalOutcome::Success("<b>2</b>".into()));

    assert_eq!(
        state.view().rows[0].result,
        ResultView::Markup("<b>2</b>".to_string())
    );
}
