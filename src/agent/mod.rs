//! Turn orchestration: perceive the page, ask the model, act, log.

pub mod log;

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use action_primitives::{ActionError, ActionPrimitives, DefaultActionPrimitives, EffectTimings};
use agent_core::{AgentAction, AgentSession, SessionTransport};
use dom_adapter::Document;
use futures::FutureExt;
use perceiver_structural::{DocumentSerializer, SerializedContext, SerializerConfig};
use serde::Serialize;
use serde_json::Value;
use sitepilot_core_types::{ToolArgs, ToolInvocation, ToolName, ToolParseError, TurnId};
use tracing::{debug, info, warn};

pub use log::{ActivityLog, LogEntry, LogSource};

pub const BUSY_MESSAGE: &str = "Request ignored: another turn is still processing.";

/// How a call to [`TurnRunner::run_turn`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// Another turn held the processing flag.
    Busy,
    Completed { actions: usize, failures: usize },
}

/// Drives one request/response cycle against a live document.
///
/// Turns are reject-while-busy: a second `run_turn` arriving while one is in
/// flight returns [`TurnOutcome::Busy`] without touching the session.
pub struct TurnRunner<D: Document + 'static, T: SessionTransport> {
    document: Arc<D>,
    serializer: DocumentSerializer,
    primitives: DefaultActionPrimitives<D>,
    session: AgentSession<T>,
    log: ActivityLog,
    processing: AtomicBool,
}

impl<D: Document + 'static, T: SessionTransport> TurnRunner<D, T> {
    pub fn new(document: Arc<D>, session: AgentSession<T>) -> Self {
        Self {
            primitives: DefaultActionPrimitives::new(Arc::clone(&document)),
            document,
            serializer: DocumentSerializer::default(),
            session,
            log: ActivityLog::new(),
            processing: AtomicBool::new(false),
        }
    }

    pub fn with_serializer(mut self, config: SerializerConfig) -> Self {
        self.serializer = DocumentSerializer::new(config);
        self
    }

    pub fn with_timings(mut self, timings: EffectTimings) -> Self {
        self.primitives = DefaultActionPrimitives::with_timings(Arc::clone(&self.document), timings);
        self
    }

    pub fn document(&self) -> &Arc<D> {
        &self.document
    }

    pub fn primitives(&self) -> &DefaultActionPrimitives<D> {
        &self.primitives
    }

    pub fn session(&self) -> &AgentSession<T> {
        &self.session
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Serialize the page as the model will see it on the next turn.
    pub fn perceive(&self) -> SerializedContext {
        self.serializer.serialize(self.document.as_ref())
    }

    pub async fn run_turn(&self, user_text: &str) -> TurnOutcome {
        let text = user_text.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }
        let Some(_guard) = ProcessingGuard::acquire(&self.processing) else {
            warn!("Turn rejected while another is processing");
            self.log.system(BUSY_MESSAGE);
            return TurnOutcome::Busy;
        };

        let turn_id = TurnId::new();
        self.log.user(user_text);

        let context = match catch_unwind(AssertUnwindSafe(|| self.perceive())) {
            Ok(context) => context,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!(turn_id = %turn_id, reason = %reason, "Serialization panicked");
                self.log
                    .system(format!("Error processing query: {reason}"));
                return TurnOutcome::Completed {
                    actions: 0,
                    failures: 1,
                };
            }
        };
        debug!(
            turn_id = %turn_id,
            chars = context.len_chars(),
            truncated = context.is_truncated(),
            "Perceived document"
        );

        let reply = AssertUnwindSafe(self.session.process_message(text, context.as_str()))
            .catch_unwind()
            .await;
        let actions = match reply {
            Ok(actions) => actions,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!(turn_id = %turn_id, reason = %reason, "Agent session panicked");
                self.log
                    .system(format!("Error processing query: {reason}"));
                return TurnOutcome::Completed {
                    actions: 0,
                    failures: 1,
                };
            }
        };
        let mut failures = 0;
        for action in &actions {
            match action {
                AgentAction::ToolCall { name, args } => {
                    debug!(turn_id = %turn_id, "{}", action.describe());
                    if !self.execute_tool(name, args) {
                        failures += 1;
                    }
                }
                AgentAction::Response { text } => {
                    self.log.agent(text.as_str());
                }
            }
        }

        info!(
            turn_id = %turn_id,
            actions = actions.len(),
            failures,
            "Turn completed"
        );
        TurnOutcome::Completed {
            actions: actions.len(),
            failures,
        }
    }

    /// Validate and run one tool call. Failures end up in the log, never upward.
    fn execute_tool(&self, name: &str, args: &ToolArgs) -> bool {
        self.log.system_with(
            format!("Executing tool: {name}"),
            Value::Object(args.clone()),
        );

        let invocation = match ToolInvocation::parse(name, args) {
            Ok(invocation) => invocation,
            Err(ToolParseError::UnknownTool(_)) => {
                warn!(tool = %name, "Model requested an unknown tool");
                self.log.system(format!("Unknown tool: {name}"));
                return false;
            }
            Err(ToolParseError::InvalidArguments { reason, .. }) => {
                warn!(tool = %name, reason = %reason, "Tool arguments rejected");
                self.log
                    .system(format!("Error executing tool {name}: {reason}"));
                return false;
            }
        };

        match catch_unwind(AssertUnwindSafe(|| self.primitives.dispatch(&invocation))) {
            Ok(Ok(report)) => {
                let metadata = serde_json::to_value(&report).ok();
                self.log
                    .push(LogSource::System, success_line(&invocation), metadata);
                true
            }
            Ok(Err(err)) if err.is_lookup_failure() => {
                self.log.system(not_found_line(&invocation, &err));
                false
            }
            Ok(Err(err)) => {
                self.log.system(format!("Error executing tool {name}: {err}"));
                false
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!(tool = %name, reason = %reason, "Tool panicked");
                self.log.system(format!("Error processing query: {reason}"));
                false
            }
        }
    }
}

fn success_line(invocation: &ToolInvocation) -> String {
    let target = invocation.target();
    match invocation.name() {
        ToolName::ScrollToSection => format!("Scrolled to section: {target}"),
        ToolName::HighlightElement => format!("Highlighted element: {target}"),
        ToolName::ClickElement => format!("Clicked element: {target}"),
        ToolName::FillForm => format!("Filled form field: {target}"),
        ToolName::ScrollWindow => format!("Scrolled window: {target}"),
        ToolName::NavigateToPage => format!("Navigated to: {target}"),
        ToolName::ZoomElement => format!("Zoomed element: {target}"),
    }
}

fn not_found_line(invocation: &ToolInvocation, err: &ActionError) -> String {
    let id = match err {
        ActionError::ElementNotFound(id) => id.as_str(),
        _ => invocation.target(),
    };
    match invocation.name() {
        ToolName::ScrollToSection => format!("Error: Section {id} not found."),
        ToolName::FillForm => format!("Error: Field {id} not found."),
        _ => format!("Error: Element {id} not found."),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Clears the processing flag on every exit path, unwinding included.
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
