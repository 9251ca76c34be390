use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use mermaid_studio::page::MemoryPage;
use mermaid_studio::{
    Control, DiagramBackend, EventKind, GenerateRequest, Generated, Session, StudioConfig,
    UiEvent,
};

// In-process backend so the numbers measure the controller, not the network
struct InstantBackend;

impl DiagramBackend for InstantBackend {
    fn generate(&self, request: &GenerateRequest) -> mermaid_studio::Result<Generated> {
        Ok(Generated {
            filename: format!("{}.png", request.prompt.len()),
            session_id: None,
            iterations: None,
            message: None,
        })
    }
}

fn bench_submit(c: &mut Criterion) {
    // Fresh session per run so the history list stays at one entry
    c.bench_function("submit_success", |b| {
        b.iter_batched(
            || {
                let page = MemoryPage::new();
                let session = Session::new(StudioConfig::default(), InstantBackend, &page)
                    .expect("failed to create session");
                (page, session)
            },
            |(_page, mut session)| {
                let _ = session.submit("  make the boxes blue  ");
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_zoom_dispatch(c: &mut Criterion) {
    let page = MemoryPage::new();
    let mut session =
        Session::new(StudioConfig::default(), InstantBackend, &page).expect("failed to create session");
    let zoom_in = UiEvent::new(Control::ZoomInButton, EventKind::Click);
    let zoom_out = UiEvent::new(Control::ZoomOutButton, EventKind::Click);

    c.bench_function("zoom_dispatch", |b| {
        b.iter(|| {
            session.dispatch(zoom_in);
            session.dispatch(zoom_out);
        })
    });
}

criterion_group!(benches, bench_submit, bench_zoom_dispatch);
criterion_main!(benches);
