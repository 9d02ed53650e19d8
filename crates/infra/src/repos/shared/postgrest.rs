use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

/// Thin client for the PostgREST interface in front of the backing store.
/// Any non-2xx response surfaces as an error carrying the response body;
/// retries are a caller concern, driven by the next scheduled tick.
pub struct PostgrestClient {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl PostgrestClient {
    pub fn new(base_url: &str, service_role_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let res = self
            .client
            .get(&self.url(path))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] PostgREST GET error. Error message: {:?}", e);
                anyhow::Error::new(e)
            })?;
        Self::json_body(res).await
    }

    /// Insert. `Prefer: return=representation` so the caller sees the rows
    /// actually written.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> anyhow::Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let res = self
            .client
            .post(&self.url(path))
            .header("apikey", &self.service_role_key)
            .header("Prefer", "return=representation")
            .bearer_auth(&self.service_role_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] PostgREST POST error. Error message: {:?}", e);
                anyhow::Error::new(e)
            })?;
        Self::json_body(res).await
    }

    /// Filtered update. The representation the store returns is how callers
    /// detect whether a conditional update applied to any row.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> anyhow::Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let res = self
            .client
            .patch(&self.url(path))
            .header("apikey", &self.service_role_key)
            .header("Prefer", "return=representation")
            .bearer_auth(&self.service_role_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] PostgREST PATCH error. Error message: {:?}",
                    e
                );
                anyhow::Error::new(e)
            })?;
        Self::json_body(res).await
    }

    async fn json_body<T: DeserializeOwned>(res: Response) -> anyhow::Result<T> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("PostgREST request failed. Status: {}, body: {}", status, body);
            anyhow::bail!("PostgREST request failed. Status: {}, body: {}", status, body);
        }
        res.json::<T>().await.map_err(|e| {
            error!(
                "[Unexpected Response] PostgREST response was not valid JSON. Error message: {:?}",
                e
            );
            anyhow::Error::new(e)
        })
    }
}
