//! reqwest-backed [`Transport`] with a cookie jar standing in for the browser's
//! ambient session. Cookies set by the backend are stored and replayed on every
//! later request; an existing session can be seeded once at construction. The
//! credential value is never logged or read back.

use super::{config::ClientConfig, errors::FlowError, Method, Transport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{cookie::Jar, header::ACCEPT, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::{error::Error as StdError, sync::Arc};
use tracing::{debug, info_span, Instrument};

/// Reason phrase used when the status code has no canonical one.
const UNKNOWN_STATUS_TEXT: &str = "Unknown Status";

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Build a transport for `config`.
    ///
    /// `session_cookie` takes `Cookie` header syntax (`JSESSIONID=...; other=...`)
    /// and is stored for the effective API base.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        user_agent: &str,
        config: ClientConfig,
        session_cookie: Option<&SecretString>,
    ) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        if let Some(cookie) = session_cookie {
            let url = config
                .endpoint_url("/")
                .context("cannot scope session cookie to the API base")?;
            for pair in cookie
                .expose_secret()
                .split(';')
                .map(str::trim)
                .filter(|pair| !pair.is_empty())
            {
                jar.add_cookie_str(pair, &url);
            }
            debug!("seeded session cookie jar for {}", url);
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .cookie_provider(jar)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, FlowError> {
        let url = self
            .config
            .endpoint_url(path)
            .map_err(|err| FlowError::Network {
                cause: format!("invalid request URL for {path}: {err}"),
            })?;

        let span = info_span!("http.request", http.method = %method, url = %url);

        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .instrument(span.clone())
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!(parent: &span, status = status.as_u16(), "request rejected");
            return Err(http_error(status));
        }

        let bytes = response
            .bytes()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        serde_json::from_slice(&bytes).map_err(|err| FlowError::InvalidBody {
            reason: err.to_string(),
        })
    }
}

fn http_error(status: StatusCode) -> FlowError {
    FlowError::Http {
        status: status.as_u16(),
        status_text: status
            .canonical_reason()
            .unwrap_or(UNKNOWN_STATUS_TEXT)
            .to_string(),
    }
}

/// Flattens the error chain so the root cause (refused, DNS, TLS) is visible.
fn map_request_error(err: reqwest::Error) -> FlowError {
    let mut cause = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        cause.push_str(": ");
        cause.push_str(&inner.to_string());
        source = inner.source();
    }
    FlowError::Network { cause }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{HttpTransport, Transport};
    use crate::client::{ClientConfig, FlowError};
    use anyhow::Result;
    use secrecy::SecretString;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn transport(server: &MockServer, cookie: Option<&str>) -> HttpTransport {
        let config = ClientConfig::new(&server.uri(), None).unwrap();
        let cookie = cookie.map(|value| SecretString::from(value.to_string()));
        HttpTransport::new("reviewhub-test", config, cookie.as_ref()).unwrap()
    }

    #[tokio::test]
    async fn get_parses_json_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login/success"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "provider": "kakao",
                "id": 42
            })))
            .expect(1)
            .mount(&server)
            .await;

        let value = transport(&server, None).get_json("/login/success").await?;
        assert_eq!(value, json!({"provider": "kakao", "id": 42}));
        Ok(())
    }

    #[tokio::test]
    async fn post_sends_json_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/onboarding"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"nickname": "reader"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let value = transport(&server, None)
            .post_json("/onboarding", &json!({"nickname": "reader"}))
            .await?;
        assert_eq!(value, json!({"ok": true}));
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(401).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let result = transport(&server, None).get_json("/me").await;
        assert_eq!(
            result,
            Err(FlowError::Http {
                status: 401,
                status_text: "Unauthorized".to_string()
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn invalid_json_is_invalid_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let result = transport(&server, None).get_json("/me").await;
        assert!(matches!(result, Err(FlowError::InvalidBody { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn seeded_cookie_is_attached() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("cookie", "JSESSIONID=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nickname": "n"})))
            .expect(1)
            .mount(&server)
            .await;

        let value = transport(&server, Some("JSESSIONID=abc123"))
            .get_json("/me")
            .await?;
        assert_eq!(value, json!({"nickname": "n"}));
        Ok(())
    }

    #[tokio::test]
    async fn session_cookie_from_server_is_replayed() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login/success"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "JSESSIONID=fresh; Path=/; HttpOnly")
                    .set_body_json(json!({})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("cookie", "JSESSIONID=fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, None);
        transport.get_json("/login/success").await?;
        let value = transport.get_json("/me").await?;
        assert_eq!(value, json!({"id": 1}));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_network_failure() {
        // Bind then drop to get a port nobody listens on.
        let port = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener.local_addr().unwrap().port(),
            Err(_) => {
                eprintln!("Skipping test: cannot bind localhost");
                return;
            }
        };
        let config = ClientConfig::new(&format!("http://127.0.0.1:{port}"), None).unwrap();
        let transport = HttpTransport::new("reviewhub-test", config, None).unwrap();

        let result = transport.get_json("/me").await;
        assert!(matches!(result, Err(FlowError::Network { .. })));
    }
}
