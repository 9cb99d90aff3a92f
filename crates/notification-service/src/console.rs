use async_trait::async_trait;
use briefing_core::{BriefingReport, DeliveryError};

use crate::{EmbedTemplate, NotificationChannel};

/// Prints the briefing to stdout. Used for dry runs.
pub struct ConsoleNotifier;

#[async_trait]
impl NotificationChannel for ConsoleNotifier {
    async fn send(&self, report: &BriefingReport) -> Result<String, DeliveryError> {
        println!("Title: {}", EmbedTemplate::title(report));
        println!("{}", report.description());
        Ok("printed to stdout".to_string())
    }

    fn name(&self) -> &str {
        "console"
    }
}
