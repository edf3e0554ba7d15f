use serde::Serialize;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Outcome message for the host UI to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }
}

pub trait NotificationSink {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => log::info!("{}", notice.message),
            NoticeKind::Error => log::error!("{}", notice.message),
        }
    }
}

/// Buffers notices until the host drains them.
#[derive(Debug, Default)]
pub struct CollectingSink {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_drains() {
        let sink = CollectingSink::new();
        sink.notify(Notice::success("ok"));
        sink.notify(Notice::error("nope"));

        assert_eq!(sink.last().map(|n| n.kind), Some(NoticeKind::Error));
        assert_eq!(sink.take().len(), 2);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_notice_json_kind_is_lowercase() {
        let json = serde_json::to_value(Notice::success("saved")).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "success", "message": "saved" }));
    }
}
