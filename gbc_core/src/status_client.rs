//! Reachability checks for the self-hosted services listed on the site.

use std::{collections::BTreeMap, time::Duration};

static SERVICES: [(&str, &str); 4] = [
    ("home", "https://ha.cjber.dev"),
    ("storage", "https://nas.cjber.dev"),
    ("plex", "https://plex.cjber.dev"),
    ("request", "https://req.cjber.dev"),
];

static CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Check every monitored service concurrently.
///
/// The map always completes and always contains every service name; a
/// failed or timed-out check folds to `false`.
pub async fn check_all() -> BTreeMap<&'static str, bool> {
    check_services(&SERVICES).await
}

async fn check_services(services: &[(&'static str, &str)]) -> BTreeMap<&'static str, bool> {
    let Ok(client) = reqwest::Client::builder().timeout(CHECK_TIMEOUT).build() else {
        return services.iter().map(|(name, _)| (*name, false)).collect();
    };
    let handles: Vec<_> = services
        .iter()
        .map(|(name, url)| {
            let client = client.clone();
            let url = String::from(*url);
            (*name, tokio::spawn(async move { is_reachable(&client, &url).await }))
        })
        .collect();
    let mut statuses = BTreeMap::new();
    for (name, handle) in handles {
        statuses.insert(name, handle.await.unwrap_or(false));
    }
    statuses
}

/// Any HTTP response counts as reachable, even an error status; only a
/// network failure or timeout marks a service down.
async fn is_reachable(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(_) => true,
        Err(err) => {
            tracing::debug!("{url} unreachable: {err}");
            false
        }
    }
}
