use crate::backend::{DiagramBackend, GenerateRequest, Generated};
use crate::page::{PageSnapshot, PageSurface};
use crate::session::{Dispatched, Session, UiEvent};
use crate::submit::SubmitOutcome;
use crate::{Error, Result, StudioConfig};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Generate(GenerateRequest, oneshot::Sender<Result<Generated>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly studio backed by a dedicated network worker.
///
/// Page state lives in a shared `Session`; the lock is only held while a
/// submission begins or completes, never across the request itself. Zoom and
/// history actions therefore run while a prompt is in flight. Overlapping
/// submissions are neither blocked nor sequenced: whichever reply arrives
/// last decides what the status line and image show.
#[derive(Clone)]
pub struct Studio {
    session: Arc<Mutex<Session<()>>>,
    cmd_tx: Sender<Command>,
}

impl Studio {
    /// Create a studio talking to the HTTP backend from `config`.
    ///
    /// The blocking client is built, used and dropped on the worker thread,
    /// never on the async runtime.
    #[cfg(feature = "http")]
    pub async fn new(config: StudioConfig, surface: &dyn PageSurface) -> Result<Self> {
        let worker_config = config.clone();
        Self::spawn(config, surface, move || {
            crate::backend::HttpBackend::new(worker_config)
                .map(|b| Arc::new(b) as Arc<dyn DiagramBackend>)
        })
        .await
    }

    /// Create a studio around an already constructed backend.
    pub async fn with_backend(
        config: StudioConfig,
        backend: Arc<dyn DiagramBackend>,
        surface: &dyn PageSurface,
    ) -> Result<Self> {
        Self::spawn(config, surface, move || Ok(backend)).await
    }

    async fn spawn<F>(config: StudioConfig, surface: &dyn PageSurface, make_backend: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Arc<dyn DiagramBackend>> + Send + 'static,
    {
        let session = Session::new(config, (), surface)?;

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            let backend = match make_backend() {
                Ok(b) => b,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Generate(request, resp) => {
                        // One thread per request so a slow reply never holds up the next one
                        let backend = backend.clone();
                        thread::spawn(move || {
                            let res = backend.generate(&request);
                            let _ = resp.send(res);
                        });
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
        });

        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            cmd_tx,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Session<()>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Submit `prompt_text`, yielding while the request is in flight.
    pub async fn submit(&self, prompt_text: &str) -> SubmitOutcome {
        let pending = match self.lock().begin_submit(prompt_text) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };

        let (tx, rx) = oneshot::channel();
        let reply = if self
            .cmd_tx
            .send(Command::Generate(pending.request.clone(), tx))
            .is_err()
        {
            Err(Error::Other("studio worker has shut down".into()))
        } else {
            rx.await
                .unwrap_or_else(|e| Err(Error::Other(format!("Generate canceled: {}", e))))
        };

        self.lock().complete_submit(pending, reply)
    }

    /// Submit whatever the prompt field currently holds
    pub async fn submit_input(&self) -> SubmitOutcome {
        let raw = self.lock().page().input.value();
        self.submit(&raw).await
    }

    /// Route a UI event through the session's bindings.
    pub async fn dispatch(&self, event: UiEvent) -> Dispatched {
        let local = {
            let mut session = self.lock();
            match session.resolve(event) {
                None => return Dispatched::Ignored,
                Some(action) => session.apply_local(action),
            }
        };
        match local {
            Some(done) => done,
            None => Dispatched::Submitted(self.submit_input().await),
        }
    }

    pub fn zoom_in(&self) -> f64 {
        self.lock().zoom_in()
    }

    pub fn zoom_out(&self) -> f64 {
        self.lock().zoom_out()
    }

    pub fn toggle_history(&self) -> bool {
        self.lock().toggle_history()
    }

    pub fn zoom_level(&self) -> f64 {
        self.lock().zoom_level()
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().history().entries().to_vec()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.lock().snapshot()
    }

    /// Stop the network worker. Requests already in flight still complete.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryPage, PromptInput, StatusLine};
    use crate::session::{Control, EventKind};

    struct Fixed(&'static str);

    impl DiagramBackend for Fixed {
        fn generate(&self, _request: &GenerateRequest) -> Result<Generated> {
            Ok(Generated {
                filename: self.0.to_string(),
                session_id: None,
                iterations: None,
                message: None,
            })
        }
    }

    struct Failing;

    impl DiagramBackend for Failing {
        fn generate(&self, _request: &GenerateRequest) -> Result<Generated> {
            Err(Error::RequestFailed { status: 500 })
        }
    }

    #[tokio::test]
    async fn submit_through_worker() {
        let page = MemoryPage::new();
        let studio = Studio::with_backend(StudioConfig::default(), Arc::new(Fixed("x.png")), &page)
            .await
            .unwrap();

        let out = studio.submit("  draw it  ").await;
        assert!(out.is_updated());
        assert_eq!(studio.snapshot().image_source.as_deref(), Some("/output/x.png"));
        assert_eq!(studio.history(), vec!["draw it"]);
        studio.close().await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_reads_input_field() {
        let page = MemoryPage::new();
        let studio = Studio::with_backend(StudioConfig::default(), Arc::new(Failing), &page)
            .await
            .unwrap();

        page.input().set_value("something");
        let out = studio
            .dispatch(UiEvent::new(Control::UpdateButton, EventKind::Click))
            .await;
        assert_eq!(
            out,
            Dispatched::Submitted(SubmitOutcome::Failed(Error::RequestFailed { status: 500 }))
        );
        assert_eq!(page.status().text(), "Error updating diagram.");
        assert!(page.input().value().is_empty());
        assert!(studio.history().is_empty());
    }

    #[tokio::test]
    async fn submit_after_close_reports_worker_gone() {
        let page = MemoryPage::new();
        let studio = Studio::with_backend(StudioConfig::default(), Arc::new(Fixed("x.png")), &page)
            .await
            .unwrap();
        let other = studio.clone();
        studio.close().await.unwrap();

        // Give the worker a moment to drop its receiver
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let out = other.submit("late").await;
        assert!(matches!(out, SubmitOutcome::Failed(Error::Other(_))));
        assert!(page.status().text().starts_with("Error: "));
    }
}
