use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::DevtoolsError;

/// One entry of the endpoint's `/json` target list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TargetDescriptor {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "webSocketDebuggerUrl", default)]
    pub ws_url: Option<String>,
}

impl TargetDescriptor {
    pub fn is_page(&self) -> bool {
        self.kind == "page"
    }

    /// Debugger URL, if the target exposes a usable one.
    pub fn session_url(&self) -> Option<&str> {
        self.ws_url.as_deref().filter(|u| !u.is_empty())
    }
}

pub fn list_url(endpoint: &str) -> String {
    format!("{}/json", endpoint.trim_end_matches('/'))
}

/// Fetch the target list and keep only page targets, in endpoint order.
pub async fn fetch_page_targets(
    client: &Client,
    endpoint: &str,
) -> Result<Vec<TargetDescriptor>, DevtoolsError> {
    let targets: Vec<TargetDescriptor> = client
        .get(list_url(endpoint))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let total = targets.len();
    let pages = filter_pages(targets);
    debug!(total, pages = pages.len(), "fetched devtools targets");
    Ok(pages)
}

pub fn filter_pages(targets: Vec<TargetDescriptor>) -> Vec<TargetDescriptor> {
    targets.into_iter().filter(TargetDescriptor::is_page).collect()
}
