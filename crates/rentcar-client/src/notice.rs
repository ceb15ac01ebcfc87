//! Transient user notifications (the toast layer).

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Sending half of the notice channel. Cheap to clone; publishing never fails,
/// even when nobody is listening.
#[derive(Debug, Clone)]
pub struct NoticeBus {
    tx: mpsc::UnboundedSender<Notice>,
}

impl NoticeBus {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn publish(&self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice {
            level,
            message: message.into(),
        };
        match level {
            NoticeLevel::Error => tracing::warn!("{}", notice.message),
            _ => tracing::info!("{}", notice.message),
        }
        if self.tx.send(notice).is_err() {
            tracing::trace!("Notice dropped, no receiver");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Error, message);
    }
}
