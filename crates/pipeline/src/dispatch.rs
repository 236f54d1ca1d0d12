use tokio::sync::mpsc;

/// The UI element that shows the current label.
///
/// Only ever called from the context that owns the UI.
pub trait LabelSink {
    fn set_text(&mut self, text: &str);
}

impl<F> LabelSink for F
where
    F: FnMut(&str),
{
    fn set_text(&mut self, text: &str) {
        self(text)
    }
}

/// Posts labels to the UI context. Cheap to clone, never blocks.
#[derive(Debug, Clone)]
pub struct UiDispatcher {
    sender: mpsc::UnboundedSender<String>,
}

/// The UI end of the label handoff. Labels come out in the order they were
/// dispatched.
#[derive(Debug)]
pub struct UiQueue {
    receiver: mpsc::UnboundedReceiver<String>,
}

/// Create a connected dispatcher and queue.
pub fn ui_channel() -> (UiDispatcher, UiQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (UiDispatcher { sender }, UiQueue { receiver })
}

impl UiDispatcher {
    /// Fire and forget. A label posted after the UI went away is discarded.
    pub fn dispatch(&self, label: impl Into<String>) {
        if self.sender.send(label.into()).is_err() {
            log::debug!("ui dispatch: queue closed, label discarded");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl UiQueue {
    /// Apply every pending label to `sink`, for UIs that poll from their own
    /// event loop. Returns how many were applied.
    pub fn drain(&mut self, sink: &mut impl LabelSink) -> usize {
        let mut applied = 0;
        while let Ok(label) = self.receiver.try_recv() {
            sink.set_text(&label);
            applied += 1;
        }
        applied
    }

    /// Apply labels to `sink` as they arrive, until every dispatcher is gone.
    pub async fn run(mut self, mut sink: impl LabelSink) {
        while let Some(label) = self.receiver.recv().await {
            sink.set_text(&label);
        }
        log::debug!("ui dispatch: all dispatchers dropped");
    }
}
