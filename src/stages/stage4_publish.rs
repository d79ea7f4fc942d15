use tracing::{info, warn};

use crate::models::ResearchState;
use crate::publish::DocumentPublisher;

/// Title for the published document: the report's first `# ` heading, else the query
pub fn report_title(state: &ResearchState) -> String {
    state
        .report_markdown()
        .and_then(|report| {
            report
                .lines()
                .map(str::trim)
                .find_map(|line| line.strip_prefix("# "))
                .map(str::trim)
                .filter(|title| !title.is_empty())
        })
        .unwrap_or_else(|| state.query().trim())
        .to_string()
}

/// Execute Stage 4: hand the report to the document store.
///
/// Returns the shareable link, or `None` when there is no report, the
/// publisher produced no link, or publishing failed. Failures are logged and
/// never touch the report.
pub async fn publish_report(
    publisher: &dyn DocumentPublisher,
    state: &ResearchState,
) -> Option<String> {
    let report = match state.report_markdown() {
        Some(report) => report,
        None => {
            info!("Stage 4: no report to publish");
            return None;
        }
    };

    let title = report_title(state);

    match publisher.publish(&title, report).await {
        Ok(Some(link)) => {
            info!("Stage 4: published {:?} at {}", title, link);
            Some(link)
        }
        Ok(None) => {
            info!("Stage 4: publishing not configured, no link produced");
            None
        }
        Err(e) => {
            warn!("Stage 4: publishing {:?} failed: {}", title, e);
            None
        }
    }
}
