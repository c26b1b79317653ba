//! In-memory subscriber for asserting on emitted records.
//!
//! The first [`init_test_capture`] call in a test binary installs a
//! registry with a [`CaptureLayer`] as the global subscriber. Every later
//! call hands out the same buffer, so tests running in parallel see each
//! other's records; filter on an operation name, version string or message
//! unique to the test.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use mdes_core_types::schema::{EVENT_SEVERE, EVENT_WARNING, FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// One recorded event
///
/// `op`, `event`, `component` and `message` are lifted out of `fields` for
/// convenience; `fields` still holds every field, rendered as text.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub message: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_event(event: &Event<'_>) -> Self {
        let mut fields = FieldText::default();
        event.record(&mut fields);
        let fields = fields.0;
        Self {
            level: *event.metadata().level(),
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            message: fields.get("message").cloned(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

// Strings are kept unquoted; everything else goes through Debug.
#[derive(Default)]
struct FieldText(HashMap<String, String>);

impl Visit for FieldText {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

/// Layer appending every event to a shared buffer
pub struct CaptureLayer {
    buffer: Buffer,
}

impl CaptureLayer {
    /// A layer and the handle reading what it records.
    pub fn new() -> (Self, TestCapture) {
        let buffer = Buffer::default();
        (
            Self {
                buffer: Arc::clone(&buffer),
            },
            TestCapture { buffer },
        )
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let captured = CapturedEvent::from_event(event);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(captured);
        }
    }
}

/// Read side of a [`CaptureLayer`]
#[derive(Clone)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events_where(|_| true)
    }

    pub fn events_where<F>(&self, predicate: F) -> Vec<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.buffer
            .lock()
            .map(|buffer| buffer.iter().filter(|e| predicate(e)).cloned().collect())
            .unwrap_or_default()
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.buffer
            .lock()
            .map(|buffer| buffer.iter().filter(|e| predicate(e)).count())
            .unwrap_or(0)
    }

    /// Records of one operation, in emission order
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events_where(|e| e.op.as_deref() == Some(op))
    }

    /// Messages of records whose `event` field equals `event`
    pub fn messages_for_event(&self, event: &str) -> Vec<String> {
        self.events_where(|e| e.event.as_deref() == Some(event))
            .into_iter()
            .filter_map(|e| e.message)
            .collect()
    }

    /// Schema warnings and severe messages, in emission order
    pub fn schema_diagnostics(&self) -> Vec<String> {
        self.events_where(|e| matches!(e.event.as_deref(), Some(EVENT_WARNING | EVENT_SEVERE)))
            .into_iter()
            .filter_map(|e| e.message)
            .collect()
    }

    /// # Panics
    ///
    /// Panics unless some record has this `op` and `event`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let seen = self.count_events(|e| e.is(op, event));
        assert!(
            seen > 0,
            "no record with op={op} event={event}; recorded for {op}: {:?}",
            self.events_for_op(op)
                .iter()
                .map(|e| e.event.clone())
                .collect::<Vec<_>>()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// The process-wide capture handle, installing the subscriber on first use.
///
/// ```
/// use mdes_core::logging_facility::test_capture::init_test_capture;
/// use mdes_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_example");
/// capture.assert_event_exists("doc_capture_example", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let (layer, capture) = CaptureLayer::new();
            // Another subscriber may already own the process; the handle
            // then just stays empty.
            let _ = tracing_subscriber::registry().with(layer).try_init();
            capture
        })
        .clone()
}
