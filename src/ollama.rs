use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

use crate::config::OllamaConfig;

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Options::is_empty")]
    options: Options,
}

#[derive(Debug, Clone, Default, Serialize)]
struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
}

impl Options {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.num_predict.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[allow(dead_code)]
    model: String,
    message: Message,
    #[allow(dead_code)]
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

pub struct OllamaClient {
    base_url: String,
    model: String,
    options: Options,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Build a client from config; `OLLAMA_HOST` and `OLLAMA_MODEL` take
    /// precedence when set.
    pub fn with_config(config: &OllamaConfig) -> Result<Self> {
        let base_url = env::var("OLLAMA_HOST").unwrap_or_else(|_| config.host.clone());
        let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| config.model.clone());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(OllamaClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            options: Options {
                temperature: config.temperature,
                num_predict: config.num_predict,
            },
            client,
        })
    }

    pub fn get_model(&self) -> &str {
        &self.model
    }

    /// Send a plain-text prompt and return the model's reply.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: self.options.clone(),
        };

        debug!(model = %self.model, chars = prompt.len(), "sending generation request");

        let response = self.client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Ollama API error: {}", response.status()));
        }

        let ollama_response: OllamaChatResponse = response.json().await?;
        Ok(ollama_response.message.content)
    }

    /// Names of the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self.client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Ollama API error: {}", response.status()));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// Whether `model` appears in `installed`, treating a bare name as `:latest`.
pub fn has_model(installed: &[String], model: &str) -> bool {
    let wanted = if model.contains(':') {
        model.to_string()
    } else {
        format!("{}:latest", model)
    };
    installed.iter().any(|name| name == model || *name == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP request with a canned response and hand back
    /// the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    fn client_for(host: String) -> OllamaClient {
        let config = OllamaConfig {
            host,
            model: "tiny".to_string(),
            timeout_secs: 5,
            temperature: Some(0.2),
            num_predict: None,
        };
        // Env overrides would defeat the mock server.
        let mut client = OllamaClient::with_config(&config).unwrap();
        client.base_url = config.host.clone();
        client.model = config.model.clone();
        client
    }

    #[test]
    fn test_request_shape() {
        let request = OllamaChatRequest {
            model: "m".to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            stream: false,
            options: Options::default(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_has_model() {
        let installed = vec!["llama3.2:latest".to_string(), "qwen2.5:0.5b".to_string()];
        assert!(has_model(&installed, "llama3.2"));
        assert!(has_model(&installed, "llama3.2:latest"));
        assert!(has_model(&installed, "qwen2.5:0.5b"));
        assert!(!has_model(&installed, "qwen2.5"));
    }

    #[tokio::test]
    async fn test_generate_returns_message_content() {
        let (host, server) = serve_once(
            "200 OK",
            r#"{"model":"tiny","created_at":"2024-01-01T00:00:00Z","message":{"role":"assistant","content":"and then some"},"done":true}"#,
        )
        .await;

        let client = client_for(host);
        let reply = client.generate("Once upon a time").await.unwrap();
        assert_eq!(reply, "and then some");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/chat"));
        assert!(request.contains("Once upon a time"));
        assert!(request.contains("\"temperature\":0.2"));
        assert!(request.contains("\"stream\":false"));
    }

    #[tokio::test]
    async fn test_generate_reports_http_errors() {
        let (host, server) = serve_once("404 Not Found", r#"{"error":"model not found"}"#).await;

        let client = client_for(host);
        let err = client.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("404"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_list_models() {
        let (host, server) = serve_once(
            "200 OK",
            r#"{"models":[{"name":"llama3.2:latest","size":1},{"name":"tiny:latest"}]}"#,
        )
        .await;

        let client = client_for(host);
        let models = client.list_models().await.unwrap();
        assert_eq!(models, vec!["llama3.2:latest", "tiny:latest"]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/tags"));
    }
}
