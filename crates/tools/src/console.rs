use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Pending console messages, shared between producers and the console panel.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    queue: Arc<Mutex<VecDeque<String>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(message.into());
    }

    /// Oldest pending message, if any.
    pub fn read(&self) -> Option<String> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// History shown by the console panel, newest first.
#[derive(Debug, Clone, Default)]
pub struct ConsoleHistory {
    entries: VecDeque<String>,
}

impl ConsoleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move at most one pending message from `log` to the front of the
    /// history. Returns whether a message was taken.
    pub fn pull(&mut self, log: &MessageLog) -> bool {
        match log.read() {
            Some(message) if !message.is_empty() => {
                self.entries.push_front(message);
                true
            }
            _ => false,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `tracing` layer that forwards events at `min_level` or more severe into
/// a [`MessageLog`] as `[LEVEL] message`.
#[derive(Debug, Clone)]
pub struct ConsoleLayer {
    log: MessageLog,
    min_level: Level,
}

impl ConsoleLayer {
    pub fn new(log: MessageLog) -> Self {
        Self {
            log,
            min_level: Level::INFO,
        }
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        // Level ordering: TRACE > DEBUG > INFO > WARN > ERROR.
        if level > self.min_level {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.log.push(format!("[{level}] {}", visitor.finish()));
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{} {}", self.message, self.fields.join(" "))
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}
