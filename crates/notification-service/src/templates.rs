use briefing_core::BriefingReport;
use serde_json::{json, Value};

const BOT_USERNAME: &str = "Morning Briefing Bot";
const FOOTER_TEXT: &str = "Generated by Morning Briefing";

pub struct EmbedTemplate;

impl EmbedTemplate {
    /// Title with the composition date appended
    pub fn title(report: &BriefingReport) -> String {
        format!("{} ({})", report.title, report.generated_at.format("%Y-%m-%d"))
    }

    /// Discord webhook payload with a single embed
    pub fn render(report: &BriefingReport) -> Value {
        json!({
            "username": BOT_USERNAME,
            "embeds": [{
                "title": Self::title(report),
                "description": report.description(),
                "color": report.color.to_embed_color(),
                "timestamp": report.generated_at.to_rfc3339(),
                "footer": { "text": FOOTER_TEXT },
            }]
        })
    }
}
