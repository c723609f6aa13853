use super::*;
use std::collections::VecDeque;

use async_trait::async_trait;
use shared::error::GENERIC_GENERATION_FAILURE;
use tokio::sync::{oneshot, Mutex};

type Outcome = Result<GenerationResult, GenerationError>;

enum Reply {
    Ready(Outcome),
    Gated(oneshot::Receiver<Outcome>),
    Panic,
}

#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<FormInput>>,
}

impl ScriptedBackend {
    fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate_email(&self, input: &FormInput) -> Outcome {
        self.requests.lock().await.push(input.clone());
        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .expect("unexpected generation request");
        match reply {
            Reply::Ready(outcome) => outcome,
            Reply::Gated(rx) => rx.await.expect("gate dropped"),
            Reply::Panic => panic!("backend blew up"),
        }
    }
}

fn generated(project: &str) -> GenerationResult {
    GenerationResult {
        email: format!("Dear Professor Chen,\n... ({project})"),
        selected_project: project.to_string(),
        relevance_score: 8,
        success: true,
        message: "Email generated successfully".into(),
    }
}

fn service_failure(detail: Option<&str>) -> GenerationError {
    GenerationError::Service {
        status: 500,
        detail: detail.map(str::to_string),
    }
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn filled_controller(backend: Arc<ScriptedBackend>) -> SubmissionController {
    let mut controller = SubmissionController::new(backend);
    controller.update_field(FormField::ProfessorName, "Dr. Michael Chen");
    controller.update_field(FormField::UniversityName, "MIT");
    controller.update_field(FormField::ResearchDomain, "multi-agent systems");
    controller
}

#[tokio::test]
async fn empty_or_blank_required_fields_block_submission() {
    for (field, value) in [
        (FormField::ProfessorName, ""),
        (FormField::UniversityName, "   "),
        (FormField::ResearchDomain, "\t"),
    ] {
        let backend = ScriptedBackend::with_replies(Vec::new());
        let mut controller = filled_controller(backend.clone());
        controller.update_field(field, value);

        let err = match controller.submit() {
            Ok(_) => panic!("submission with blank {field} must be rejected"),
            Err(err) => err,
        };
        let SubmitError::MissingRequired(missing) = err;
        assert_eq!(missing.fields, vec![field.key()]);
        assert_eq!(backend.request_count().await, 0);
        assert_eq!(controller.snapshot(), ViewState::default());
    }
}

#[tokio::test]
async fn successful_submission_stores_result_and_clears_pending() {
    let backend = ScriptedBackend::with_replies([Reply::Ready(Ok(generated("HireFlow")))]);
    let controller = filled_controller(backend.clone());

    let settlement = controller.submit().expect("accepted").await;

    assert_eq!(settlement, Settlement::Succeeded);
    let state = controller.snapshot();
    assert!(!state.is_pending);
    assert_eq!(state.error, None);
    assert_eq!(state.result.as_deref(), Some(&generated("HireFlow")));
}

#[tokio::test]
async fn optional_fields_are_sent_verbatim() {
    let backend = ScriptedBackend::with_replies([Reply::Ready(Ok(generated("HireFlow")))]);
    let mut controller = filled_controller(backend.clone());
    controller.update_field(FormField::PaperTitle, "  Coordinated Planning  ");
    controller.update_field(FormField::ForceProject, "HireFlow");

    controller.submit().expect("accepted").await;

    let requests = backend.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].paper_title, "  Coordinated Planning  ");
    assert_eq!(requests[0].paper_summary, "");
    assert_eq!(requests[0].force_project, "HireFlow");
}

#[tokio::test]
async fn failure_with_detail_keeps_previous_result() {
    let backend = ScriptedBackend::with_replies([
        Reply::Ready(Ok(generated("HireFlow"))),
        Reply::Ready(Err(service_failure(Some("X")))),
    ]);
    let controller = filled_controller(backend);

    controller.submit().expect("first").await;
    let before = controller.snapshot().result;

    let settlement = controller.submit().expect("second").await;

    assert_eq!(settlement, Settlement::Failed("X".into()));
    let state = controller.snapshot();
    assert_eq!(state.error.as_deref(), Some("X"));
    assert_eq!(state.result, before);
    assert!(!state.is_pending);
}

#[tokio::test]
async fn failure_without_detail_uses_generic_message() {
    let backend = ScriptedBackend::with_replies([
        Reply::Ready(Err(service_failure(None))),
        Reply::Ready(Err(GenerationError::Parse("expected value".into()))),
    ]);
    let controller = filled_controller(backend);

    for _ in 0..2 {
        controller.submit().expect("accepted").await;
        let state = controller.snapshot();
        assert_eq!(state.error.as_deref(), Some(GENERIC_GENERATION_FAILURE));
        assert_eq!(state.result, None);
        assert!(!state.is_pending);
    }
}

#[tokio::test]
async fn failed_settlement_is_logged_after_state_is_written() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _default = tracing::subscriber::set_default(subscriber);

    let backend = ScriptedBackend::with_replies([Reply::Ready(Err(GenerationError::Service {
        status: 503,
        detail: Some("Email generator not initialized".into()),
    }))]);
    let controller = filled_controller(backend);

    let pending = controller.submit().expect("accepted");
    let token = pending.token();
    let settlement = pending.await;

    assert_eq!(
        settlement,
        Settlement::Failed("Email generator not initialized".into())
    );
    assert_eq!(
        controller.snapshot().error.as_deref(),
        Some("Email generator not initialized")
    );
    let output = logs.contents();
    assert!(output.contains("generation request failed"), "{output}");
    assert!(output.contains(&format!("request_token={token}")), "{output}");
    assert!(output.contains("returned 503"), "{output}");
}

#[tokio::test]
async fn pending_is_observable_until_settlement_on_both_paths() {
    for outcome in [Ok(generated("HireFlow")), Err(service_failure(Some("boom")))] {
        let (gate_tx, gate_rx) = oneshot::channel();
        let backend = ScriptedBackend::with_replies([Reply::Gated(gate_rx)]);
        let controller = filled_controller(backend.clone());
        let mut reader = controller.view_state();

        let pending = controller.submit().expect("accepted");
        assert!(reader.snapshot_and_mark_seen().is_pending);

        let task = tokio::spawn(pending.into_future());
        while backend.request_count().await == 0 {
            tokio::task::yield_now().await;
        }
        assert!(controller.snapshot().is_pending);

        gate_tx.send(outcome).expect("release gate");
        task.await.expect("join");

        assert!(reader.has_changed());
        assert!(!reader.snapshot().is_pending);
    }
}

#[tokio::test]
async fn new_submission_clears_error_but_keeps_result_while_pending() {
    let (gate_tx, gate_rx) = oneshot::channel();
    let backend = ScriptedBackend::with_replies([
        Reply::Ready(Ok(generated("HireFlow"))),
        Reply::Ready(Err(service_failure(Some("first failure")))),
        Reply::Gated(gate_rx),
    ]);
    let controller = filled_controller(backend);

    controller.submit().expect("success").await;
    controller.submit().expect("failure").await;
    assert_eq!(
        controller.snapshot().error.as_deref(),
        Some("first failure")
    );

    let pending = controller.submit().expect("third");
    let state = controller.snapshot();
    assert!(state.is_pending);
    assert_eq!(state.error, None);
    assert_eq!(state.result.as_deref(), Some(&generated("HireFlow")));

    gate_tx.send(Ok(generated("DocQA"))).expect("release");
    pending.await;
    assert_eq!(
        controller.snapshot().result.as_deref(),
        Some(&generated("DocQA"))
    );
}

#[tokio::test]
async fn reset_clears_fields_and_error_only() {
    let (gate_tx, gate_rx) = oneshot::channel();
    let backend = ScriptedBackend::with_replies([
        Reply::Ready(Ok(generated("HireFlow"))),
        Reply::Ready(Err(service_failure(Some("X")))),
        Reply::Gated(gate_rx),
    ]);
    let mut controller = filled_controller(backend);
    controller.update_field(FormField::PaperSummary, "summary");

    controller.submit().expect("success").await;
    controller.submit().expect("failure").await;
    controller.reset();

    assert_eq!(controller.form(), &FormInput::default());
    let state = controller.snapshot();
    assert_eq!(state.error, None);
    assert_eq!(state.result.as_deref(), Some(&generated("HireFlow")));
    assert!(!state.is_pending);

    // Pending survives a reset issued mid-flight.
    controller.update_field(FormField::ProfessorName, "Dr. Ada");
    controller.update_field(FormField::UniversityName, "ETH");
    controller.update_field(FormField::ResearchDomain, "robotics");
    let pending = controller.submit().expect("third");
    controller.reset();
    assert!(controller.snapshot().is_pending);

    gate_tx.send(Ok(generated("DocQA"))).expect("release");
    pending.await;
    assert!(!controller.snapshot().is_pending);
}

#[tokio::test]
async fn latest_submission_wins_when_it_settles_first() {
    let (a_tx, a_rx) = oneshot::channel();
    let (b_tx, b_rx) = oneshot::channel();
    let backend = ScriptedBackend::with_replies([Reply::Gated(a_rx), Reply::Gated(b_rx)]);
    let controller = filled_controller(backend);

    let a = controller.submit().expect("a");
    let b = controller.submit().expect("b");
    assert!(b.token() > a.token());
    let a = tokio::spawn(a.into_future());
    let b = tokio::spawn(b.into_future());

    b_tx.send(Ok(generated("B"))).expect("release b");
    assert_eq!(b.await.expect("join b"), Settlement::Succeeded);
    assert!(!controller.snapshot().is_pending);

    a_tx.send(Ok(generated("A"))).expect("release a");
    assert_eq!(a.await.expect("join a"), Settlement::Superseded);

    let state = controller.snapshot();
    assert_eq!(state.result.as_deref(), Some(&generated("B")));
    assert!(!state.is_pending);
}

#[tokio::test]
async fn stale_settlement_neither_writes_nor_clears_pending() {
    let (a_tx, a_rx) = oneshot::channel();
    let (b_tx, b_rx) = oneshot::channel();
    let backend = ScriptedBackend::with_replies([Reply::Gated(a_rx), Reply::Gated(b_rx)]);
    let controller = filled_controller(backend);

    let a = tokio::spawn(controller.submit().expect("a").into_future());
    let b = tokio::spawn(controller.submit().expect("b").into_future());

    a_tx.send(Err(service_failure(Some("stale")))).expect("release a");
    assert_eq!(a.await.expect("join a"), Settlement::Superseded);
    let state = controller.snapshot();
    assert!(state.is_pending);
    assert_eq!(state.error, None);

    b_tx.send(Ok(generated("B"))).expect("release b");
    assert_eq!(b.await.expect("join b"), Settlement::Succeeded);
    assert!(!controller.snapshot().is_pending);
}

#[tokio::test]
async fn pending_clears_when_backend_panics() {
    let backend = ScriptedBackend::with_replies([Reply::Panic]);
    let controller = filled_controller(backend);

    let task = tokio::spawn(controller.submit().expect("accepted").into_future());
    let joined = task.await;

    assert!(joined.expect_err("task must panic").is_panic());
    let state = controller.snapshot();
    assert!(!state.is_pending);
    assert_eq!(state.result, None);
}

#[tokio::test]
async fn dropping_unsettled_submission_clears_pending() {
    let backend = ScriptedBackend::with_replies(Vec::new());
    let controller = filled_controller(backend.clone());

    let pending = controller.submit().expect("accepted");
    assert!(controller.snapshot().is_pending);
    drop(pending);

    assert!(!controller.snapshot().is_pending);
    assert_eq!(backend.request_count().await, 0);
}
