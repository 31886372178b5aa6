// darkroom_service/src/services/mail_log.rs

//! Mail and staff-notification transports that log instead of delivering.
//! Swap in a real provider by implementing the same traits.

use async_trait::async_trait;
use darkroom::services::{DeliveryResult, Mailer, ServicePrincipal, StaffNotifier, TemplateData};
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LoggingMailer {
  sender: String,
}

impl LoggingMailer {
  pub fn new(sender: impl Into<String>) -> Self {
    Self { sender: sender.into() }
  }
}

#[async_trait]
impl Mailer for LoggingMailer {
  #[instrument(name = "LoggingMailer::send", skip(self, data), fields(template = %data.template))]
  async fn send(&self, to: &str, data: &TemplateData) -> anyhow::Result<DeliveryResult> {
    info!(
      "Simulating sending email: To='{}', From='{}', Subject='{}'",
      to, self.sender, data.subject
    );
    tokio::time::sleep(std::time::Duration::from_millis(20)).await; // Simulate network latency

    let message_id = format!("mail_{}", Uuid::new_v4());
    info!(fields = ?data.fields, "Email accepted. Message ID: {}", message_id);
    Ok(DeliveryResult { message_id })
  }
}

/// Delivers to the address carried in the template's `to` field.
#[derive(Debug, Clone, Default)]
pub struct LoggingStaffNotifier;

#[async_trait]
impl StaffNotifier for LoggingStaffNotifier {
  #[instrument(name = "LoggingStaffNotifier::notify", skip(self, data), fields(principal = %principal.name))]
  async fn notify(&self, principal: &ServicePrincipal, data: &TemplateData) -> anyhow::Result<DeliveryResult> {
    if principal.name.trim().is_empty() {
      anyhow::bail!("staff notifications require a service principal");
    }
    let to = data
      .get("to")
      .ok_or_else(|| anyhow::anyhow!("staff notification has no recipient"))?;
    info!("Simulating staff notification: To='{}', Subject='{}'", to, data.subject);
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let message_id = format!("staff_{}", Uuid::new_v4());
    info!(fields = ?data.fields, "Staff notification accepted. Message ID: {}", message_id);
    Ok(DeliveryResult { message_id })
  }
}
