mod console;
mod templates;

pub use console::ConsoleNotifier;
pub use templates::EmbedTemplate;

use std::time::Duration;

use async_trait::async_trait;
use briefing_core::{BriefingReport, DeliveryError, DeliveryResult};

/// Trait for notification channels.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Deliver the report; `Ok` carries a short receipt
    async fn send(&self, report: &BriefingReport) -> Result<String, DeliveryError>;
    fn name(&self) -> &str;
}

/// Where the briefing goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    DiscordWebhook(String),
    /// Print to stdout instead of posting
    DryRun,
}

/// Delivers a finished briefing through its configured channel.
pub struct NotificationService {
    channel: Box<dyn NotificationChannel>,
    timeout: Duration,
}

impl NotificationService {
    pub fn new(target: &DeliveryTarget, timeout: Duration) -> Self {
        let channel: Box<dyn NotificationChannel> = match target {
            DeliveryTarget::DiscordWebhook(url) => {
                tracing::info!("Discord webhook notifications enabled");
                Box::new(DiscordWebhookNotifier::new(url.clone(), timeout))
            }
            DeliveryTarget::DryRun => {
                tracing::info!("Dry run: briefing will be printed to stdout");
                Box::new(ConsoleNotifier)
            }
        };
        Self::with_channel(channel, timeout)
    }

    pub fn with_channel(channel: Box<dyn NotificationChannel>, timeout: Duration) -> Self {
        Self { channel, timeout }
    }

    /// Deliver once, awaiting completion. Failures come back as a
    /// non-ok [`DeliveryResult`], never as an error.
    pub async fn publish(&self, report: &BriefingReport) -> DeliveryResult {
        let outcome = match tokio::time::timeout(self.timeout, self.channel.send(report)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(self.timeout.as_secs())),
        };

        match outcome {
            Ok(receipt) => {
                tracing::info!("Sent briefing via {}", self.channel.name());
                DeliveryResult::delivered(receipt)
            }
            Err(e) => {
                tracing::warn!("Failed to send briefing via {}: {}", self.channel.name(), e);
                DeliveryResult::failed(e.to_string())
            }
        }
    }
}

/// Discord webhook notifier.
struct DiscordWebhookNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl DiscordWebhookNotifier {
    fn new(webhook_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { webhook_url, client }
    }
}

#[async_trait]
impl NotificationChannel for DiscordWebhookNotifier {
    async fn send(&self, report: &BriefingReport) -> Result<String, DeliveryError> {
        let payload = EmbedTemplate::render(report);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status.as_u16()));
        }
        Ok(format!("discord webhook accepted (HTTP {})", status.as_u16()))
    }

    fn name(&self) -> &str {
        "discord-webhook"
    }
}
