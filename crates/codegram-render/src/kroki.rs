//! Kroki diagram rendering over HTTP.
//!
//! Descriptions are posted as plain text to `<kroki>/mermaid/svg` and the SVG
//! document comes back in the response body. ureq is blocking, so each request
//! runs on tokio's blocking pool.

use std::future::Future;
use std::time::Duration;

use ureq::Agent;

use crate::consts::MERMAID_ENDPOINT;
use crate::error::RenderError;
use crate::renderer::RenderBackend;

/// Create HTTP agent with the specified timeout.
///
/// Use this to create a reusable agent for connection pooling when making
/// multiple render calls.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`RenderBackend`] backed by a Kroki server.
#[derive(Debug, Clone)]
pub struct KrokiBackend {
    agent: Agent,
    server_url: String,
}

impl KrokiBackend {
    /// Create a backend for the Kroki server at `server_url`.
    pub fn new(server_url: &str, timeout: Duration) -> Self {
        Self::with_agent(create_agent(timeout), server_url)
    }

    /// Create a backend that reuses an existing agent.
    pub fn with_agent(agent: Agent, server_url: &str) -> Self {
        Self {
            agent,
            server_url: server_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Kroki server URL without trailing slash.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

impl RenderBackend for KrokiBackend {
    fn render_svg(&self, description: &str) -> impl Future<Output = Result<String, RenderError>> {
        let agent = self.agent.clone();
        let server_url = self.server_url.clone();
        let source = description.to_owned();

        async move {
            let task = tokio::task::spawn_blocking(move || {
                send_diagram_request(&agent, &server_url, &source)
            });
            match task.await {
                Ok(result) => result,
                Err(e) => Err(RenderError::Http(format!("render task failed: {e}"))),
            }
        }
    }
}

/// Send a diagram to Kroki and return the SVG document.
///
/// Handles HTTP errors by reading the response body for error details.
fn send_diagram_request(
    agent: &Agent,
    server_url: &str,
    source: &str,
) -> Result<String, RenderError> {
    let url = format!("{server_url}/{MERMAID_ENDPOINT}/svg");
    tracing::debug!(%url, bytes = source.len(), "Rendering diagram");

    let response = agent
        .post(&url)
        .header("Content-Type", "text/plain")
        .send(source.as_bytes())
        .map_err(|e| RenderError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(RenderError::Backend {
            status,
            message: error_body.trim().to_owned(),
        });
    }

    let data = body
        .read_to_vec()
        .map_err(|e| RenderError::Http(e.to_string()))?;
    String::from_utf8(data).map_err(|e| RenderError::InvalidSvg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    const TIMEOUT: Duration = Duration::from_secs(5);

    /// Accept a single connection, answer with `status_line` and `body`, and
    /// return the request line plus body.
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().unwrap();
                }
            }

            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let response = format!(
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();

            (
                request_line.trim().to_owned(),
                String::from_utf8(request_body).unwrap(),
            )
        });

        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_server_url_trailing_slash() {
        let backend = KrokiBackend::new("https://kroki.io/", TIMEOUT);
        assert_eq!(backend.server_url(), "https://kroki.io");
    }

    #[tokio::test]
    async fn test_render_svg_posts_description_to_mermaid_endpoint() {
        let (base, server) = serve_once("HTTP/1.1 200 OK", "<svg>ok</svg>");
        let backend = KrokiBackend::new(&base, TIMEOUT);

        let svg = backend.render_svg("graph TD; A-->B;").await.unwrap();
        assert_eq!(svg, "<svg>ok</svg>");

        let (request_line, body) = server.join().unwrap();
        assert_eq!(request_line, "POST /mermaid/svg HTTP/1.1");
        assert_eq!(body, "graph TD; A-->B;");
    }

    #[tokio::test]
    async fn test_render_svg_reports_error_body() {
        let (base, server) = serve_once(
            "HTTP/1.1 400 Bad Request",
            "Error 400: Parse error on line 1\n",
        );
        let backend = KrokiBackend::new(&base, TIMEOUT);

        let err = backend.render_svg("graph TD; A-->").await.unwrap_err();
        server.join().unwrap();

        assert_eq!(
            err,
            RenderError::Backend {
                status: 400,
                message: "Error 400: Parse error on line 1".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn test_render_svg_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let backend = KrokiBackend::new(&format!("http://{addr}"), TIMEOUT);

        let err = backend.render_svg("graph TD").await.unwrap_err();
        assert!(matches!(err, RenderError::Http(_)), "got {err:?}");
    }
}
