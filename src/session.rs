//! Session: the single owner of a page's state and its event bindings.
//!
//! A session is created once per page. It resolves the page's elements, owns
//! the prompt submitter, the history log and the zoom level, and routes UI
//! events to actions through an explicit binding table.

use std::collections::HashMap;

use crate::backend::{DiagramBackend, Generated};
use crate::history::HistoryRecorder;
use crate::page::{Page, PageSnapshot, PageSurface};
use crate::submit::{PendingSubmission, PromptSubmitter, SubmitOutcome};
use crate::zoom::ZoomController;
use crate::{Result, StudioConfig};

/// Page controls that emit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    UpdateButton,
    HistoryToggle,
    ZoomInButton,
    ZoomOutButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    /// Pointer moved onto the control (`mouseover`)
    PointerEnter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiEvent {
    pub control: Control,
    pub kind: EventKind,
}

impl UiEvent {
    pub fn new(control: Control, kind: EventKind) -> Self {
        Self { control, kind }
    }
}

/// Operations an event can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Submit the current contents of the prompt field
    Submit,
    ToggleHistory,
    ZoomIn,
    ZoomOut,
}

/// Result of dispatching one event
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    Submitted(SubmitOutcome),
    HistoryToggled { hidden: bool },
    Zoomed { level: f64 },
    /// No binding for the event
    Ignored,
}

/// The stock page wiring. The history toggle reacts to hover, not click.
pub fn default_bindings() -> HashMap<(Control, EventKind), Action> {
    HashMap::from([
        ((Control::UpdateButton, EventKind::Click), Action::Submit),
        ((Control::HistoryToggle, EventKind::PointerEnter), Action::ToggleHistory),
        ((Control::ZoomInButton, EventKind::Click), Action::ZoomIn),
        ((Control::ZoomOutButton, EventKind::Click), Action::ZoomOut),
    ])
}

/// Per-page controller state.
///
/// `B` is the backend used by the blocking `submit`; sessions driven by
/// `async_api::Studio` use `()` and run requests elsewhere.
pub struct Session<B> {
    config: StudioConfig,
    backend: B,
    page: Page,
    submitter: PromptSubmitter,
    history: HistoryRecorder,
    zoom: ZoomController,
    bindings: HashMap<(Control, EventKind), Action>,
}

impl<B> Session<B> {
    /// Bind `surface`, apply the initial history visibility and register the
    /// default event bindings.
    pub fn new(config: StudioConfig, backend: B, surface: &dyn PageSurface) -> Result<Self> {
        config.validate()?;

        let page = Page::bind(surface);
        page.history.set_hidden(config.history_hidden);

        Ok(Self {
            submitter: PromptSubmitter::new(&config),
            config,
            backend,
            page,
            history: HistoryRecorder::new(),
            zoom: ZoomController::new(),
            bindings: default_bindings(),
        })
    }

    /// Register `action` for `(control, kind)`, returning any binding it replaces.
    pub fn bind(&mut self, control: Control, kind: EventKind, action: Action) -> Option<Action> {
        self.bindings.insert((control, kind), action)
    }

    pub fn unbind(&mut self, control: Control, kind: EventKind) -> Option<Action> {
        self.bindings.remove(&(control, kind))
    }

    pub fn binding(&self, control: Control, kind: EventKind) -> Option<Action> {
        self.bindings.get(&(control, kind)).copied()
    }

    pub fn toggle_history(&self) -> bool {
        self.history.toggle_visibility(self.page.history.as_ref())
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom.zoom_in(self.page.image.as_ref());
        self.zoom.level()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom.zoom_out(self.page.image.as_ref());
        self.zoom.level()
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom.level()
    }

    pub fn history(&self) -> &HistoryRecorder {
        &self.history
    }

    /// Backend session the next request will continue, if any
    pub fn backend_session(&self) -> Option<&str> {
        self.submitter.backend_session()
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.page.snapshot()
    }

    pub fn begin_submit(&self, raw: &str) -> std::result::Result<PendingSubmission, SubmitOutcome> {
        self.submitter.begin(raw, &self.page)
    }

    pub fn complete_submit(
        &mut self,
        pending: PendingSubmission,
        reply: Result<Generated>,
    ) -> SubmitOutcome {
        self.submitter
            .complete(pending, reply, &self.page, &mut self.history)
    }

    /// Look up the action bound to `event`
    pub fn resolve(&self, event: UiEvent) -> Option<Action> {
        let action = self.binding(event.control, event.kind);
        if action.is_none() {
            log::debug!("no binding for {:?}", event);
        }
        action
    }

    /// Run an action that never touches the network.
    pub(crate) fn apply_local(&mut self, action: Action) -> Option<Dispatched> {
        match action {
            Action::Submit => None,
            Action::ToggleHistory => Some(Dispatched::HistoryToggled {
                hidden: self.toggle_history(),
            }),
            Action::ZoomIn => Some(Dispatched::Zoomed {
                level: self.zoom_in(),
            }),
            Action::ZoomOut => Some(Dispatched::Zoomed {
                level: self.zoom_out(),
            }),
        }
    }
}

impl<B: DiagramBackend> Session<B> {
    /// Run one full submission cycle on the calling thread.
    pub fn submit(&mut self, prompt_text: &str) -> SubmitOutcome {
        let pending = match self.begin_submit(prompt_text) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let reply = self.backend.generate(&pending.request);
        self.complete_submit(pending, reply)
    }

    /// Submit whatever the prompt field currently holds
    pub fn submit_input(&mut self) -> SubmitOutcome {
        let raw = self.page.input.value();
        self.submit(&raw)
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Dispatched {
        let Some(action) = self.resolve(event) else {
            return Dispatched::Ignored;
        };
        log::debug!("{:?} -> {:?}", event, action);
        match self.apply_local(action) {
            Some(done) => done,
            None => Dispatched::Submitted(self.submit_input()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GenerateRequest;
    use crate::page::{DiagramImage, HistoryList, MemoryPage, PromptInput, StatusLine};
    use crate::Error;
    use std::sync::Mutex;

    /// Backend that answers from a script and records every request
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<Generated>>>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedBackend {
        fn replying(replies: Vec<Result<Generated>>) -> Self {
            let mut replies = replies;
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::default(),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl DiagramBackend for ScriptedBackend {
        fn generate(&self, request: &GenerateRequest) -> Result<Generated> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(Error::Transport("script exhausted".into())))
        }
    }

    fn ok(filename: &str) -> Result<Generated> {
        Ok(Generated {
            filename: filename.into(),
            session_id: None,
            iterations: None,
            message: None,
        })
    }

    fn session(replies: Vec<Result<Generated>>) -> (MemoryPage, Session<ScriptedBackend>) {
        let page = MemoryPage::new();
        let s = Session::new(
            StudioConfig::default(),
            ScriptedBackend::replying(replies),
            &page,
        )
        .unwrap();
        (page, s)
    }

    #[test]
    fn blank_prompts_never_reach_backend() {
        let (page, mut s) = session(vec![]);
        page.image().set_source("/output/old.png");
        for blank in ["", " ", "\t", "\n  \n"] {
            let out = s.submit(blank);
            assert!(matches!(out, SubmitOutcome::Rejected { .. }));
        }
        assert_eq!(s.backend.calls(), 0);
        assert!(s.history().is_empty());
        assert_eq!(page.image().source().as_deref(), Some("/output/old.png"));
        assert_eq!(page.alerts().raised().len(), 4);
    }

    #[test]
    fn scenario_trimmed_prompt_updates_everything() {
        let (page, mut s) = session(vec![ok("diagram42.svg")]);
        page.input().set_value("  make the boxes blue  ");

        let out = s.dispatch(UiEvent::new(Control::UpdateButton, EventKind::Click));

        assert!(matches!(out, Dispatched::Submitted(SubmitOutcome::Updated { .. })));
        let snap = s.snapshot();
        assert_eq!(snap.image_source.as_deref(), Some("/output/diagram42.svg"));
        assert_eq!(snap.history, vec!["make the boxes blue"]);
        assert!(snap.input.is_empty());
        assert_eq!(
            s.backend.seen.lock().unwrap()[0],
            GenerateRequest::new("make the boxes blue")
        );
    }

    #[test]
    fn failures_leave_history_and_image_alone() {
        let (page, mut s) = session(vec![
            ok("first.png"),
            Err(Error::RequestFailed { status: 500 }),
            Err(Error::MalformedResponse("missing `filename`".into())),
            Err(Error::Backend("Failed to generate Mermaid chart".into())),
        ]);
        s.submit("first");
        for prompt in ["second", "third", "fourth"] {
            page.input().set_value(prompt);
            let out = s.submit(prompt);
            assert!(matches!(out, SubmitOutcome::Failed(_)));
            assert_eq!(s.history().entries(), ["first"]);
            assert_eq!(page.image().source().as_deref(), Some("/output/first.png"));
            assert!(page.input().value().is_empty());
        }
        assert_eq!(page.status().text(), "Error: Failed to generate Mermaid chart");
    }

    #[test]
    fn history_toggle_is_hover_bound() {
        let (page, mut s) = session(vec![]);
        assert!(page.history().is_hidden());

        let out = s.dispatch(UiEvent::new(Control::HistoryToggle, EventKind::Click));
        assert_eq!(out, Dispatched::Ignored);
        assert!(page.history().is_hidden());

        let out = s.dispatch(UiEvent::new(Control::HistoryToggle, EventKind::PointerEnter));
        assert_eq!(out, Dispatched::HistoryToggled { hidden: false });
        s.dispatch(UiEvent::new(Control::HistoryToggle, EventKind::PointerEnter));
        assert!(page.history().is_hidden());
    }

    #[test]
    fn zoom_buttons_scale_image() {
        let (page, mut s) = session(vec![]);
        s.dispatch(UiEvent::new(Control::ZoomInButton, EventKind::Click));
        s.dispatch(UiEvent::new(Control::ZoomInButton, EventKind::Click));
        assert_eq!(page.image().transform().as_deref(), Some("scale(1.2)"));

        let out = s.dispatch(UiEvent::new(Control::ZoomOutButton, EventKind::Click));
        assert_eq!(out, Dispatched::Zoomed { level: 1.1 });
        assert_eq!(s.zoom_level(), 1.1);
    }

    #[test]
    fn zoom_survives_submissions() {
        let (_page, mut s) = session(vec![ok("a.png"), Err(Error::RequestFailed { status: 404 })]);
        s.zoom_out();
        s.submit("a");
        s.submit("b");
        assert_eq!(s.zoom_level(), 0.9);
    }

    #[test]
    fn rebinding_replaces_previous_action() {
        let (page, mut s) = session(vec![]);
        let prev = s.bind(Control::HistoryToggle, EventKind::Click, Action::ZoomIn);
        assert!(prev.is_none());
        s.dispatch(UiEvent::new(Control::HistoryToggle, EventKind::Click));
        assert_eq!(s.zoom_level(), 1.1);

        assert_eq!(
            s.unbind(Control::ZoomInButton, EventKind::Click),
            Some(Action::ZoomIn)
        );
        assert_eq!(
            s.dispatch(UiEvent::new(Control::ZoomInButton, EventKind::Click)),
            Dispatched::Ignored
        );
        assert!(page.history().is_hidden());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let page = MemoryPage::new();
        let cfg = StudioConfig {
            endpoint: "::".into(),
            ..Default::default()
        };
        assert!(Session::new(cfg, (), &page).is_err());
    }
}
