//! Notifications emitted while importing.

use std::{cell::RefCell, rc::Rc};

use log::debug;

use chorus_core::identifier::Id;

use crate::scene::ElementRef;

/// An import notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportEvent {
    /// A diagram element was constructed and inserted.
    ElementAdded { element: ElementRef, id: Id },
}

impl ImportEvent {
    /// The event name observers subscribe to.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ElementAdded { .. } => "element.added",
        }
    }
}

/// Fire-and-forget notification sink.
pub trait EventBus {
    fn fire(&self, event: &ImportEvent);
}

impl<T: EventBus + ?Sized> EventBus for &T {
    fn fire(&self, event: &ImportEvent) {
        (**self).fire(event);
    }
}

/// Logs every event at `debug` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventBus;

impl EventBus for LogEventBus {
    fn fire(&self, event: &ImportEvent) {
        match event {
            ImportEvent::ElementAdded { element, id } => {
                debug!(event = event.name(), element:% = element, id:% = id; "Event fired");
            }
        }
    }
}

/// Keeps every fired event; clones share the same record.
#[derive(Debug, Default, Clone)]
pub struct RecordingEventBus {
    events: Rc<RefCell<Vec<ImportEvent>>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events fired so far, oldest first.
    pub fn events(&self) -> Vec<ImportEvent> {
        self.events.borrow().clone()
    }
}

impl EventBus for RecordingEventBus {
    fn fire(&self, event: &ImportEvent) {
        self.events.borrow_mut().push(*event);
    }
}
