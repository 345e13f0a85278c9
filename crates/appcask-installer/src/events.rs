use crossbeam_channel::{unbounded, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    Status(String),
    Progress(u8),
    Finished { success: bool, message: String },
}

pub type EventSender = Sender<InstallEvent>;
pub type EventReceiver = Receiver<InstallEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    unbounded()
}

#[derive(Debug)]
pub struct JobReporter {
    sender: Sender<InstallEvent>,
    last_percent: u8,
}

impl JobReporter {
    pub fn new(sender: Sender<InstallEvent>) -> Self {
        Self {
            sender,
            last_percent: 0,
        }
    }

    pub fn status(&self, message: impl Into<String>) {
        let _ = self.sender.send(InstallEvent::Status(message.into()));
    }

    pub fn progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent < self.last_percent {
            return;
        }
        self.last_percent = percent;
        let _ = self.sender.send(InstallEvent::Progress(percent));
    }

    pub(crate) fn finish(&self, success: bool, message: impl Into<String>) {
        let _ = self.sender.send(InstallEvent::Finished {
            success,
            message: message.into(),
        });
    }
}

pub fn drain_events(receiver: &Receiver<InstallEvent>) -> Vec<InstallEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.recv() {
        let terminal = matches!(event, InstallEvent::Finished { .. });
        events.push(event);
        if terminal {
            break;
        }
    }
    events
}
