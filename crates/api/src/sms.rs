//! SMS delivery of tenant notices.
//!
//! Notices are dispatched after the transition has committed, on a
//! background task. A failed delivery is logged and never reaches the
//! caller of the workflow operation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use estatedesk_core::notification::{Notifier, NotifyError, SmsNotice};
use estatedesk_core::termination::TerminationStatus;
use estatedesk_db::repositories::TerminationDetail;
use estatedesk_shared::config::SmsConfig;

const GATEWAY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct GatewayMessage<'a> {
    from: &'a str,
    to: &'a str,
    message: &'a str,
}

/// Sends notices through an HTTP SMS gateway.
#[derive(Debug, Clone)]
pub struct HttpSmsNotifier {
    client: reqwest::Client,
    gateway_url: String,
    api_key: String,
    sender: String,
}

impl HttpSmsNotifier {
    /// Creates a notifier for the configured gateway.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be built.
    pub fn new(config: &SmsConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(GATEWAY_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            gateway_url: config.gateway_url.clone(),
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
        })
    }
}

#[async_trait]
impl Notifier for HttpSmsNotifier {
    async fn send(&self, notice: &SmsNotice) -> Result<(), NotifyError> {
        let payload = GatewayMessage {
            from: &self.sender,
            to: &notice.to,
            message: &notice.body,
        };

        let response = self
            .client
            .post(&self.gateway_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        debug!(to = %notice.to, "SMS accepted by gateway");
        Ok(())
    }
}

/// Writes notices to the log instead of sending them.
///
/// Used when SMS delivery is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notice: &SmsNotice) -> Result<(), NotifyError> {
        info!(to = %notice.to, body = %notice.body, "SMS delivery disabled, notice logged");
        Ok(())
    }
}

/// Builds the notice for the request's current status.
#[must_use]
pub fn notice_for(detail: &TerminationDetail) -> SmsNotice {
    let extra = match detail.status {
        TerminationStatus::Completed => detail.receipt_reference.as_deref(),
        TerminationStatus::Rejected => detail.rejection_reason.as_deref(),
        _ => None,
    };
    SmsNotice::for_status(
        detail.tenant.phone.clone(),
        &detail.contract.reference,
        detail.status,
        extra,
    )
}

/// Sends the tenant a notice on a background task.
pub fn dispatch(notifier: Arc<dyn Notifier>, detail: &TerminationDetail) {
    let notice = notice_for(detail);
    let request_id = detail.id;

    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notice).await {
            warn!(request_id = %request_id, error = %e, "Failed to send termination notice");
        }
    });
}
