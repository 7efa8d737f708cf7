use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use prepdesk_core::NotificationSink;
use prepdesk_domain::{PrepDeskError, Result as DomainResult};

/// In-memory mock for `NotificationSink` that records every posted message.
#[derive(Default, Clone)]
pub struct MockNotificationSink {
    posted: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every post fails after being recorded.
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    /// `(channel, text)` pairs in posting order.
    pub fn posted(&self) -> Vec<(String, String)> {
        self.posted.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.posted().into_iter().map(|(_, text)| text).collect()
    }
}

#[async_trait]
impl NotificationSink for MockNotificationSink {
    async fn post_message(&self, channel_id: &str, text: &str) -> DomainResult<()> {
        self.posted.lock().unwrap().push((channel_id.to_string(), text.to_string()));
        if self.fail {
            return Err(PrepDeskError::Network("chat.postMessage returned ok=false".into()));
        }
        Ok(())
    }
}
