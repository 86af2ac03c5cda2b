//! Change notifications pushed to the host.
//!
//! The host registers a channel and receives a small enum of change
//! markers, pushed synchronously from mutating engine calls. The
//! notifications carry no payload beyond "something of this kind
//! changed". They trigger redraws rather than transporting state.
//! Receivers are expected to be drained every frame.

/// Which piece of engine state a [`EngineNotification::StateChanged`]
/// refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKey {
    Time,
    Recording,
    Paused,
    UpdateMode,
    MotionType,
    FurthestRecordedTime,
}

/// One change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineNotification {
    /// A snapshot was appended to the history.
    HistoryAdded,
    /// History was cleared or truncated.
    HistoryRemoved,
    /// A state-machine field changed.
    StateChanged(StateKey),
}

/// Registry of subscriber channels.
#[derive(Default)]
pub struct NotificationHub {
    senders: Vec<async_channel::Sender<EngineNotification>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. The returned receiver sees every
    /// notification sent after this call.
    pub fn subscribe(&mut self) -> async_channel::Receiver<EngineNotification> {
        let (sender, receiver) = async_channel::unbounded();
        self.senders.push(sender);
        receiver
    }

    /// Push a notification to every live subscriber; subscribers whose
    /// receiver was dropped are pruned.
    pub fn send(&mut self, notification: EngineNotification) {
        self.senders
            .retain(|sender| sender.try_send(notification).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}
