use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};

/// JSON body returned on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Raw reply from the service.
#[derive(Debug, Clone)]
pub struct ServiceReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl ServiceReply {
    /// Decode the body as a success envelope.
    pub fn envelope(&self) -> Result<Envelope, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub struct ExampleClient {
    client: Client,
    url: String,
}

impl ExampleClient {
    /// `url` is the full URL of the service path, e.g. `http://host:8080/example`.
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::builder()
                .pool_max_idle_per_host(0)
                .no_proxy()
                .build()
                .unwrap_or_default(),
            url: url.to_string(),
        }
    }

    /// GET the greeting.
    pub async fn get(&self) -> Result<ServiceReply, reqwest::Error> {
        self.send(Method::GET, "").await
    }

    /// Send `body` verbatim with an arbitrary method.
    pub async fn send(&self, method: Method, body: &str) -> Result<ServiceReply, reqwest::Error> {
        let resp = self
            .client
            .request(method, &self.url)
            .body(body.to_string())
            .send()
            .await?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await?;

        Ok(ServiceReply {
            status,
            content_type,
            body,
        })
    }
}
