use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use notebook_core::{
    Document, EditingSurface, EditorOptions, Effect, EntryRowView, EntryStatus, EvalOutcome,
    KeyPress, ResultView, TranscriptController, TranscriptSettings, TranscriptSurface,
    ENTER_KEY_CODE, ESCAPE_KEY_CODE, FAILED_TEXT, PLACEHOLDER_TEXT,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(notebook_logging::initialize_for_tests);
}

#[derive(Default)]
struct Page {
    editor_text: String,
    focused: bool,
    mounted_with: Option<EditorOptions>,
    rows: Vec<EntryRowView>,
    scrolls: usize,
}

type SharedPage = Rc<RefCell<Page>>;

struct FakeEditor(SharedPage);

impl EditingSurface for FakeEditor {
    fn value(&self) -> String {
        self.0.borrow().editor_text.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.0.borrow_mut().editor_text = text.to_string();
    }

    fn focus(&mut self) {
        self.0.borrow_mut().focused = true;
    }
}

struct FakeTranscript(SharedPage);

impl TranscriptSurface for FakeTranscript {
    fn append(&mut self, row: &EntryRowView) {
        self.0.borrow_mut().rows.push(row.clone());
    }

    fn refresh(&mut self, index: usize, row: &EntryRowView) {
        self.0.borrow_mut().rows[index] = row.clone();
    }

    fn scroll_to_bottom(&mut self) {
        self.0.borrow_mut().scrolls += 1;
    }
}

struct FakeDocument {
    page: SharedPage,
    ids: Vec<&'static str>,
}

impl FakeDocument {
    fn new(ids: &[&'static str]) -> Self {
        Self {
            page: SharedPage::default(),
            ids: ids.to_vec(),
        }
    }

    fn knows(&self, id: &str) -> bool {
        self.ids.iter().any(|known| *known == id)
    }

    fn type_text(&self, text: &str) {
        self.page.borrow_mut().editor_text = text.to_string();
    }
}

impl Document for FakeDocument {
    type Editor = FakeEditor;
    type Transcript = FakeTranscript;

    fn transcript(&mut self, id: &str) -> Option<FakeTranscript> {
        self.knows(id)
            .then(|| FakeTranscript(self.page.clone()))
    }

    fn mount_editor(&mut self, id: &str, options: &EditorOptions) -> Option<FakeEditor> {
        if !self.knows(id) {
            return None;
        }
        self.page.borrow_mut().mounted_with = Some(options.clone());
        Some(FakeEditor(self.page.clone()))
    }
}

fn setup(document: &mut FakeDocument) -> TranscriptController<FakeDocument> {
    TranscriptController::setup(
        document,
        "transcript",
        "editor",
        &EditorOptions::default(),
        TranscriptSettings::default(),
    )
}

fn ctrl_enter() -> KeyPress {
    KeyPress::new(ENTER_KEY_CODE).with_ctrl()
}

#[test]
fn setup_mounts_editor_with_default_options_and_focuses() {
    init_logging();
    let mut document = FakeDocument::new(&["transcript", "editor"]);
    let controller = setup(&mut document);

    assert!(controller.is_bound());
    let page = document.page.borrow();
    assert!(page.focused);
    let options = page.mounted_with.clone().unwrap();
    assert_eq!(options.theme, "idea");
    assert_eq!(options.viewport_margin, u32::MAX);
}

#[test]
fn setup_with_missing_containers_is_silent() {
    init_logging();
    let mut document = FakeDocument::new(&["transcript"]);
    let mut controller = setup(&mut document);

    assert!(!controller.is_bound());
    assert!(controller.editor().is_none());
    assert!(controller.transcript().is_some());
    assert!(controller.handle_key(ctrl_enter()).is_empty());
    assert!(controller.state().entries().is_empty());
}

#[test]
fn submission_without_transcript_sends_nothing() {
    init_logging();
    let mut document = FakeDocument::new(&["editor"]);
    let mut controller = setup(&mut document);
    document.type_text("1 + 1");

    assert!(controller.transcript().is_none());
    assert!(controller.handle_key(ctrl_enter()).is_empty());
    assert!(controller.state().entries().is_empty());
    let page = document.page.borrow();
    assert_eq!(page.editor_text, "");
    assert!(page.rows.is_empty());
}

#[test]
fn ctrl_enter_submits_once_and_clears_editor() {
    init_logging();
    let mut document = FakeDocument::new(&["transcript", "editor"]);
    let mut controller = setup(&mut document);
    document.type_text("1 + 1");

    let outgoing = controller.handle_key(ctrl_enter());

    assert_eq!(
        outgoing,
        vec![Effect::PostEval {
            entry_id: 1,
            source: "1 + 1".to_string(),
        }]
    );
    let page = document.page.borrow();
    assert_eq!(page.editor_text, "");
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].source, "1 + 1");
    assert_eq!(page.rows[0].status, EntryStatus::Pending);
    assert_eq!(
        page.rows[0].result,
        ResultView::Text(PLACEHOLDER_TEXT.to_string())
    );
    assert_eq!(page.scrolls, 1);
}

#[test]
fn enter_without_ctrl_does_not_submit() {
    init_logging();
    let mut document = FakeDocument::new(&["transcript", "editor"]);
    let mut controller = setup(&mut document);
    document.type_text("1 + 1");

    assert!(controller
        .handle_key(KeyPress::new(ENTER_KEY_CODE))
        .is_empty());
    assert_eq!(document.page.borrow().editor_text, "1 + 1");
    assert!(document.page.borrow().rows.is_empty());
}

#[test]
fn completion_refreshes_the_owning_row() {
    init_logging();
    let mut document = FakeDocument::new(&["transcript", "editor"]);
    let mut controller = setup(&mut document);

    document.type_text("slow");
    controller.evaluate_editor();
    document.type_text("fast");
    controller.evaluate_editor();

    controller.complete(2, EvalOutcome::Success("2".into()));
    controller.complete(1, EvalOutcome::ServerError);

    let page = document.page.borrow();
    assert_eq!(page.rows[0].source, "slow");
    assert_eq!(page.rows[0].result, ResultView::Text(FAILED_TEXT.into()));
    assert_eq!(page.rows[0].status, EntryStatus::Failed);
    assert_eq!(page.rows[1].source, "fast");
    assert_eq!(page.rows[1].result, ResultView::Markup("2".into()));
    assert_eq!(page.rows[1].status, EntryStatus::Resolved);
    assert_eq!(page.scrolls, 2);
}

#[test]
fn escape_requests_cancellation_of_pending_entries() {
    init_logging();
    let mut document = FakeDocument::new(&["transcript", "editor"]);
    let mut controller = setup(&mut document);
    document.type_text("loop()");
    controller.evaluate_editor();

    let outgoing = controller.handle_key(KeyPress::new(ESCAPE_KEY_CODE));
    assert_eq!(outgoing, vec![Effect::CancelEval { entry_id: 1 }]);

    controller.complete(1, EvalOutcome::Cancelled);
    assert_eq!(
        document.page.borrow().rows[0].status,
        EntryStatus::Cancelled
    );
}

#[test]
fn setting_up_again_replaces_the_listener() {
    init_logging();
    let mut document = FakeDocument::new(&["transcript", "editor"]);
    let mut controller = setup(&mut document);
    document.type_text("one");
    controller.evaluate_editor();

    controller = setup(&mut document);
    document.type_text("two");
    let outgoing = controller.handle_key(ctrl_enter());

    assert_eq!(outgoing.len(), 1);
    assert_eq!(controller.state().entries().len(), 1);
}
