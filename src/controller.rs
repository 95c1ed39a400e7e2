//! One submit-to-display cycle at a time.
//!
//! `ChatController::submit` takes `&mut self`, so a second submission on the
//! same controller cannot start until the first has resolved. The loading
//! state is held by a [`LoadingGuard`] and released on every exit path,
//! including the future being dropped mid-request.

use crate::{
    api::ChatBackend,
    constants::{CONNECTION_ERROR_MESSAGE, SERVER_ERROR_MESSAGE},
    errors::BackendError,
    formatter::render_message,
    logging::{log_exchange, summarize_query},
    models::{ChatRequest, ExchangeLog, Message, SubmitOutcome},
};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::time::Instant;

/// The UI handles the controller drives.
pub trait ChatSurface {
    /// Shows a new message. `markup` is the escaped, formatted display form.
    fn append_message(&mut self, message: &Message, markup: &str);

    /// Shows or hides the busy indicator and disables or enables sending.
    fn set_loading(&mut self, loading: bool);

    fn set_input(&mut self, text: &str);

    fn clear_input(&mut self);

    fn focus_input(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
}

/// Holds the surface in its loading state until dropped.
pub struct LoadingGuard<'a, S: ChatSurface> {
    surface: &'a mut S,
    state: &'a mut SessionState,
}

impl<'a, S: ChatSurface> LoadingGuard<'a, S> {
    pub fn acquire(surface: &'a mut S, state: &'a mut SessionState) -> Self {
        *state = SessionState::Sending;
        surface.set_loading(true);
        Self { surface, state }
    }

    pub fn surface(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: ChatSurface> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_loading(false);
        self.surface.focus_input();
        *self.state = SessionState::Idle;
    }
}

pub struct ChatController<B: ChatBackend, S: ChatSurface> {
    backend: B,
    surface: S,
    messages: Vec<Message>,
    state: SessionState,
}

impl<B: ChatBackend, S: ChatSurface> ChatController<B, S> {
    pub fn new(backend: B, surface: S) -> Self {
        Self {
            backend,
            surface,
            messages: Vec::new(),
            state: SessionState::Idle,
        }
    }

    /// Every message shown so far, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Sends `query` and shows the answer or a fixed error notice.
    /// Blank queries are ignored.
    pub async fn submit(&mut self, query: &str) -> SubmitOutcome {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank query");
            return SubmitOutcome::Skipped;
        }

        show(&mut self.messages, &mut self.surface, Message::user(query));
        self.surface.clear_input();

        let mut guard = LoadingGuard::acquire(&mut self.surface, &mut self.state);
        let started = Instant::now();

        let (reply, outcome) = match self.backend.send(&ChatRequest::new(query)).await {
            Ok(response) => {
                info!(
                    "Received answer with {} source(s)",
                    response.sources.len()
                );
                (
                    Message::bot(response.response, response.sources),
                    SubmitOutcome::Displayed,
                )
            }
            Err(BackendError::Status(status)) => {
                warn!("Chat endpoint returned HTTP {}", status);
                (
                    Message::bot_notice(SERVER_ERROR_MESSAGE),
                    SubmitOutcome::ServerError(status),
                )
            }
            Err(err) => {
                error!("Chat request failed: {}", err);
                (
                    Message::bot_notice(CONNECTION_ERROR_MESSAGE),
                    SubmitOutcome::ConnectionError,
                )
            }
        };

        log_exchange(&ExchangeLog {
            timestamp: Utc::now(),
            endpoint: self.backend.endpoint().to_string(),
            request_summary: summarize_query(query),
            outcome: outcome.to_string(),
            response_time_ms: started.elapsed().as_millis(),
        });

        show(&mut self.messages, guard.surface(), reply);
        outcome
    }

    /// Puts an example question in the entry field and submits it.
    pub async fn ask_example(&mut self, query: &str) -> SubmitOutcome {
        self.surface.set_input(query);
        self.submit(query).await
    }
}

fn show<S: ChatSurface>(messages: &mut Vec<Message>, surface: &mut S, message: Message) {
    let markup = render_message(&message);
    surface.append_message(&message, &markup);
    messages.push(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpChatBackend;
    use crate::models::{ChatResponse, Role, Source};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[derive(Debug, Default)]
    struct SurfaceState {
        shown: Vec<(Message, String)>,
        loading: bool,
        loading_changes: Vec<bool>,
        input: String,
        focused: bool,
    }

    #[derive(Clone, Default)]
    struct FakeSurface {
        state: Arc<Mutex<SurfaceState>>,
    }

    impl FakeSurface {
        fn snapshot<T>(&self, f: impl FnOnce(&SurfaceState) -> T) -> T {
            f(&self.state.lock().unwrap())
        }
    }

    impl ChatSurface for FakeSurface {
        fn append_message(&mut self, message: &Message, markup: &str) {
            self.state
                .lock()
                .unwrap()
                .shown
                .push((message.clone(), markup.to_string()));
        }

        fn set_loading(&mut self, loading: bool) {
            let mut state = self.state.lock().unwrap();
            state.loading = loading;
            state.loading_changes.push(loading);
            if loading {
                state.focused = false;
            }
        }

        fn set_input(&mut self, text: &str) {
            self.state.lock().unwrap().input = text.to_string();
        }

        fn clear_input(&mut self) {
            self.state.lock().unwrap().input.clear();
        }

        fn focus_input(&mut self) {
            self.state.lock().unwrap().focused = true;
        }
    }

    struct FakeBackend {
        reply: Result<ChatResponse, BackendError>,
        requests: Mutex<Vec<ChatRequest>>,
        // Records the surface's loading flag at the moment of the call.
        observed: Option<FakeSurface>,
        loading_during_send: Mutex<Option<bool>>,
    }

    impl FakeBackend {
        fn replying(reply: Result<ChatResponse, BackendError>) -> Self {
            Self {
                reply,
                requests: Mutex::new(Vec::new()),
                observed: None,
                loading_during_send: Mutex::new(None),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl ChatBackend for FakeBackend {
        fn endpoint(&self) -> &str {
            "memory://chat"
        }

        async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(surface) = &self.observed {
                *self.loading_during_send.lock().unwrap() =
                    Some(surface.snapshot(|s| s.loading));
            }
            self.reply.clone()
        }
    }

    fn answer(text: &str, sources: Vec<Source>) -> Result<ChatResponse, BackendError> {
        Ok(ChatResponse {
            response: text.to_string(),
            sources,
        })
    }

    #[tokio::test]
    async fn test_blank_query_is_ignored() {
        let surface = FakeSurface::default();
        let mut controller =
            ChatController::new(FakeBackend::replying(answer("unused", vec![])), surface.clone());

        for query in ["", "   ", "\n\t"] {
            assert_eq!(controller.submit(query).await, SubmitOutcome::Skipped);
        }

        assert!(controller.messages().is_empty());
        assert_eq!(controller.backend.request_count(), 0);
        assert!(surface.snapshot(|s| s.shown.is_empty() && s.loading_changes.is_empty()));
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let surface = FakeSurface::default();
        surface.state.lock().unwrap().input = "  What is CS 111?  ".to_string();
        let backend = FakeBackend::replying(answer(
            "**Intro** course",
            vec![Source::new("CS", "https://catalog.example.edu/cs")],
        ));
        let mut controller = ChatController::new(backend, surface.clone());

        let outcome = controller.submit("  What is CS 111?  ").await;
        assert_eq!(outcome, SubmitOutcome::Displayed);

        let requests = controller.backend.requests.lock().unwrap().clone();
        assert_eq!(requests, vec![ChatRequest::new("What is CS 111?")]);

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user("What is CS 111?"));
        assert_eq!(messages[1].role(), Role::Bot);
        assert_eq!(messages[1].text(), "**Intro** course");
        assert_eq!(messages[1].sources().len(), 1);

        surface.snapshot(|s| {
            assert_eq!(s.shown[1].1.matches("<a ").count(), 1);
            assert!(s.shown[1].1.starts_with("<strong>Intro</strong> course"));
            assert!(s.input.is_empty());
            assert!(!s.loading);
            assert!(s.focused);
        });
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_server_error_shows_fixed_notice() {
        let surface = FakeSurface::default();
        let mut controller = ChatController::new(
            FakeBackend::replying(Err(BackendError::Status(500))),
            surface.clone(),
        );

        let outcome = controller.submit("hello").await;
        assert_eq!(outcome, SubmitOutcome::ServerError(500));

        let bots: Vec<&Message> = controller
            .messages()
            .iter()
            .filter(|m| m.role() == Role::Bot)
            .collect();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].text(), SERVER_ERROR_MESSAGE);
        assert!(bots[0].sources().is_empty());
        assert!(!surface.snapshot(|s| s.loading));
    }

    #[tokio::test]
    async fn test_transport_failure_shows_connection_notice() {
        let surface = FakeSurface::default();
        let mut controller = ChatController::new(
            FakeBackend::replying(Err(BackendError::Transport("refused".into()))),
            surface.clone(),
        );

        assert_eq!(
            controller.submit("hello").await,
            SubmitOutcome::ConnectionError
        );
        let last = controller.messages().last().unwrap();
        assert_eq!(last.text(), CONNECTION_ERROR_MESSAGE);
        assert_eq!(controller.messages().len(), 2);
        assert!(!surface.snapshot(|s| s.loading));
    }

    #[tokio::test]
    async fn test_undecodable_answer_shows_connection_notice() {
        let mut controller = ChatController::new(
            FakeBackend::replying(Err(BackendError::Decode("expected value".into()))),
            FakeSurface::default(),
        );

        assert_eq!(
            controller.submit("hello").await,
            SubmitOutcome::ConnectionError
        );
    }

    #[tokio::test]
    async fn test_trigger_disabled_while_pending() {
        let surface = FakeSurface::default();
        let mut backend = FakeBackend::replying(Err(BackendError::Status(503)));
        backend.observed = Some(surface.clone());
        let mut controller = ChatController::new(backend, surface.clone());

        controller.submit("hello").await;

        assert_eq!(
            *controller.backend.loading_during_send.lock().unwrap(),
            Some(true)
        );
        assert_eq!(surface.snapshot(|s| s.loading_changes.clone()), vec![true, false]);
    }

    #[tokio::test]
    async fn test_loading_cleared_when_submission_dropped() {
        struct Pending;

        impl ChatBackend for Pending {
            fn endpoint(&self) -> &str {
                "memory://pending"
            }

            async fn send(&self, _: &ChatRequest) -> Result<ChatResponse, BackendError> {
                std::future::pending().await
            }
        }

        let surface = FakeSurface::default();
        let mut controller = ChatController::new(Pending, surface.clone());

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            controller.submit("hello"),
        )
        .await;
        assert!(timed_out.is_err());

        assert_eq!(controller.state(), SessionState::Idle);
        surface.snapshot(|s| {
            assert!(!s.loading);
            assert!(s.focused);
            assert_eq!(s.shown.len(), 1);
        });
    }

    #[tokio::test]
    async fn test_ask_example_submits_query() {
        let surface = FakeSurface::default();
        let mut controller =
            ChatController::new(FakeBackend::replying(answer("Yes", vec![])), surface.clone());

        let outcome = controller.ask_example("Is CS 111 required?").await;
        assert_eq!(outcome, SubmitOutcome::Displayed);
        assert_eq!(controller.messages()[0].text(), "Is CS 111 required?");
        assert!(surface.snapshot(|s| s.input.is_empty()));
    }

    #[tokio::test]
    async fn test_http_500_end_to_end() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "An error occurred processing your request"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let surface = FakeSurface::default();
        let backend = HttpChatBackend::new(&mock_server.uri(), "/chat").unwrap();
        let mut controller = ChatController::new(backend, surface.clone());

        assert_eq!(
            controller.submit("hello").await,
            SubmitOutcome::ServerError(500)
        );
        assert_eq!(controller.messages().len(), 2);
        assert_eq!(controller.messages()[1].text(), SERVER_ERROR_MESSAGE);
        assert!(!surface.snapshot(|s| s.loading));
    }
}
