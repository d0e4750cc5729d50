//! Audio event bus — in-process decoupling between the UI layer and the
//! sound system, mirroring the demo page's custom DOM events.

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Events carried by the bus. Each variant corresponds to one of the
/// page's custom DOM events.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// A UI action that may have a sound bound to it (`audioEvent`).
    Action { name: String },
    /// Master volume changed (`audioVolumeChanged`).
    VolumeChanged { volume: f32 },
    /// Sound output toggled (`audioEnabledChanged`).
    EnabledChanged { enabled: bool },
    /// The sound system finished initializing (`audioSystemInitialized`).
    SystemInitialized,
}

impl AudioEvent {
    pub fn action(name: impl Into<String>) -> Self {
        AudioEvent::Action { name: name.into() }
    }
}

/// Broadcast bus: every subscriber gets its own channel and receives a
/// clone of every published event. Dispatch is synchronous on the
/// publisher's thread.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<AudioEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            subscribers: Vec::new(),
        }
    }

    /// Register a new subscriber and return its receiving end.
    pub fn subscribe(&mut self) -> Receiver<AudioEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber; subscribers whose
    /// receivers were dropped are pruned.
    pub fn publish(&mut self, event: AudioEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
