use std::{fmt, time::Duration};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::{
    http::{
        self,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    tls::TlsConfig,
    Agent, Body, Proxy, RequestBuilder, SendBody,
};

use crate::{
    error::Result,
    package::{ListingMode, Package},
    request::{Method, Request, WireBody, WireRequest},
    response::Exchange,
};

/// Credentials sent as an `Authorization: Basic` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn header_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings fixed for the lifetime of a [`Client`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    pub basic_auth: Option<BasicAuth>,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
    pub proxy: Option<Proxy>,
}

impl ClientConfig {
    /// Creates a config for the server at `base_url` with everything else
    /// left at its default.
    ///
    /// # Examples
    ///
    /// ```
    /// use aptctl_api::ClientConfig;
    ///
    /// let cfg = ClientConfig::new("http://localhost:8080");
    /// assert!(!cfg.insecure);
    /// assert!(cfg.basic_auth.is_none());
    /// assert!(cfg.user_agent.as_deref().unwrap().starts_with("aptctl/"));
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            insecure: false,
            basic_auth: None,
            user_agent: Some(concat!("aptctl/", env!("CARGO_PKG_VERSION")).into()),
            timeout: None,
            proxy: None,
        }
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth::new(username, password));
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Builds the HTTP agent. Error statuses are returned as responses so
    /// that [`Exchange::check`] can normalize them.
    pub fn build_agent(&self) -> Agent {
        let mut config = Agent::config_builder()
            .http_status_as_error(false)
            .proxy(self.proxy.clone())
            .timeout_global(self.timeout);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        if self.insecure {
            config = config.tls_config(TlsConfig::builder().disable_verification(true).build());
        }

        config.build().into()
    }

    pub fn build(self) -> Client {
        Client::with_config(self)
    }
}

/// A client for one aptly server.
///
/// Cloning is cheap and clones share the underlying connection pool, so a
/// client can be handed to several threads issuing requests concurrently.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    agent: Agent,
    authorization: Option<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig::new(base_url).build()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let agent = config.build_agent();
        Self {
            authorization: config.basic_auth.as_ref().map(BasicAuth::header_value),
            base_url: config.base_url,
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get(&self, template: &str) -> Request {
        Request::new(Method::Get, template)
    }

    pub fn post(&self, template: &str) -> Request {
        Request::new(Method::Post, template)
    }

    pub fn put(&self, template: &str) -> Request {
        Request::new(Method::Put, template)
    }

    pub fn delete(&self, template: &str) -> Request {
        Request::new(Method::Delete, template)
    }

    /// Materializes and sends `request`, returning the drained exchange
    /// without classifying its status.
    pub fn send(&self, request: Request) -> Result<Exchange> {
        let wire = request.materialize(&self.base_url)?;
        let response = self.dispatch(wire)?;
        Exchange::read(response)
    }

    /// Sends `request` and discards a successful body.
    pub fn call(&self, request: Request) -> Result<()> {
        self.send(request)?.check()?;
        Ok(())
    }

    /// Sends `request` and decodes a successful body as `T`.
    pub fn call_json<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        self.send(request)?.json()
    }

    /// Sends a package listing request and decodes it according to `mode`.
    pub fn call_listing(&self, request: Request, mode: ListingMode) -> Result<Vec<Package>> {
        let exchange = self.send(request)?.check()?;
        mode.decode(exchange.body())
    }

    fn prepare<B>(&self, builder: RequestBuilder<B>, content_type: &str) -> RequestBuilder<B> {
        let builder = builder.header(CONTENT_TYPE, content_type);
        match &self.authorization {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    fn dispatch(&self, wire: WireRequest) -> Result<http::Response<Body>> {
        let WireRequest {
            method,
            url,
            content_type,
            body,
        } = wire;

        debug!(method = %method, url = %url, "sending request");

        let response = match body {
            WireBody::Empty => {
                match method {
                    Method::Get => self.prepare(self.agent.get(&url), &content_type).call(),
                    Method::Delete => self.prepare(self.agent.delete(&url), &content_type).call(),
                    Method::Post => {
                        self.prepare(self.agent.post(&url), &content_type)
                            .send_empty()
                    }
                    Method::Put => {
                        self.prepare(self.agent.put(&url), &content_type)
                            .send_empty()
                    }
                }
            }
            WireBody::Json(bytes) => {
                self.with_body(method, &url, &content_type)
                    .send(&bytes[..])
            }
            WireBody::Multipart(multipart) => {
                self.with_body(method, &url, &content_type)
                    .send(SendBody::from_owned_reader(multipart))
            }
        }?;

        debug!(status = response.status().as_u16(), url = %url, "received response");
        Ok(response)
    }

    fn with_body(
        &self,
        method: Method,
        url: &str,
        content_type: &str,
    ) -> RequestBuilder<ureq::typestate::WithBody> {
        let builder = match method {
            Method::Get => self.agent.get(url).force_send_body(),
            Method::Delete => self.agent.delete(url).force_send_body(),
            Method::Post => self.agent.post(url),
            Method::Put => self.agent.put(url),
        };
        self.prepare(builder, content_type)
    }
}
