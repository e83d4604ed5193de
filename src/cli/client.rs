use anyhow::Context;
use reqwest::{Response, StatusCode};
use serde_json::json;

use crate::guestbook::AdminEntry;

/// Thin HTTP client for the `/guestbook-admin` surface
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
    secret: String,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/guestbook-admin", self.base_url)
    }

    pub async fn list(&self) -> anyhow::Result<Vec<AdminEntry>> {
        let res = self
            .http
            .get(self.endpoint())
            .query(&[("secret", self.secret.as_str())])
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;

        let res = check(res).await?;
        res.json().await.context("unexpected admin listing format")
    }

    pub async fn delete(&self, key: &str, hard: bool) -> anyhow::Result<()> {
        let res = self
            .http
            .delete(self.endpoint())
            .json(&json!({ "key": key, "secret": self.secret, "hard": hard }))
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;

        check(res).await.map(|_| ())
    }

    pub async fn update(&self, key: &str, approve: bool) -> anyhow::Result<()> {
        let mut body = json!({ "key": key, "secret": self.secret });
        if approve {
            body["approve"] = json!(true);
        }

        let res = self
            .http
            .put(self.endpoint())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;

        check(res).await.map(|_| ())
    }
}

async fn check(res: Response) -> anyhow::Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    match status {
        StatusCode::FORBIDDEN => anyhow::bail!("admin secret rejected by server"),
        StatusCode::NOT_FOUND => anyhow::bail!("entry not found"),
        _ => anyhow::bail!("server responded {}: {}", status, body.trim()),
    }
}
