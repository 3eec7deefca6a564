use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grouped notification pushed by Alertmanager (webhook payload version 4).
///
/// Every field defaults when absent and unknown keys are ignored, so the only
/// decode failure is a body that is not valid JSON. The relay only reads
/// `status`, `groupLabels` and the per-alert `summary` annotations; the rest
/// of the wire format is accepted and carried along untouched.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertManagerWebhook {
    pub version: String,
    #[serde(rename = "groupKey")]
    pub group_key: String,
    pub status: String,
    pub receiver: String,
    #[serde(rename = "groupLabels")]
    pub group_labels: HashMap<String, String>,
    #[serde(rename = "commonLabels")]
    pub common_labels: HashMap<String, String>,
    #[serde(rename = "commonAnnotations")]
    pub common_annotations: HashMap<String, String>,
    #[serde(rename = "externalURL")]
    pub external_url: String,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Alert {
    pub status: String,
    pub labels: HashMap<String, String>,
    pub annotations: HashMap<String, String>,
    #[serde(rename = "startsAt")]
    pub starts_at: String,
    #[serde(rename = "endsAt")]
    pub ends_at: String,
    #[serde(rename = "generatorURL")]
    pub generator_url: String,
    pub fingerprint: String,
}

/// Formats the embed title, e.g. `[FIRING:2] HighCPU (job = api)`.
///
/// Returns `None` when the batch carries no `alertname` grouping label,
/// which is the one condition that makes a decoded batch unusable. The
/// remaining grouping labels are sorted by key so the title is deterministic
/// regardless of map iteration order; with no other labels the parenthetical
/// stays empty.
pub fn format_title(webhook: &AlertManagerWebhook) -> Option<String> {
    let alertname = webhook.group_labels.get("alertname")?;

    let mut keys: Vec<&String> = webhook
        .group_labels
        .keys()
        .filter(|k| k.as_str() != "alertname")
        .collect();
    keys.sort();

    let labels = keys
        .iter()
        .map(|k| format!("{} = {}", k, webhook.group_labels[k.as_str()]))
        .collect::<Vec<_>>()
        .join(", ");

    Some(format!(
        "[{}:{}] {} ({})",
        webhook.status.to_uppercase(),
        webhook.alerts.len(),
        alertname,
        labels
    ))
}

/// Formats the embed description: one `- <summary>` line per alert that
/// carries a `summary` annotation, in batch order. Alerts without one
/// contribute nothing, so the result may be empty.
pub fn format_description(webhook: &AlertManagerWebhook) -> String {
    webhook
        .alerts
        .iter()
        .filter_map(|alert| alert.annotations.get("summary"))
        .map(|summary| format!("- {}", summary))
        .collect::<Vec<_>>()
        .join("\n")
}
