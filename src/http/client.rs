//! HTTP client that sends every request through a [`Transport`].

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::{Client, Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::io::Write;

use crate::error::TransportError;
use crate::retry::{RetryPolicy, RetryingTransport};
use crate::transport::{ReqwestTransport, Transport, is_success};

/// HTTP client with pluggable transport.
///
/// The reqwest [`Client`] only builds requests; sending goes through the
/// transport, which by default retries transient failures.
#[derive(Clone)]
pub struct HttpClient<T: Transport = RetryingTransport<ReqwestTransport>> {
    client: Client,
    transport: T,
}

impl HttpClient {
    /// Creates a client that retries through `client` according to `policy`.
    pub fn with_retry(client: Client, policy: RetryPolicy) -> Self {
        let transport = RetryingTransport::new(ReqwestTransport::new(client.clone()), policy);
        Self { client, transport }
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn new(client: Client, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Starts building a request; pass the result to [`HttpClient::send`].
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Sends a request through the transport. Non-2xx responses are returned as is.
    pub async fn send(&self, request: Request) -> Result<Response, TransportError> {
        self.transport.execute(&request).await
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        debug!("GET JSON from {}...", url);

        let response = self.get_ok(url).await?;
        response
            .json::<R>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Performs a GET request and returns the body as text.
    #[tracing::instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET text from {}...", url);

        let response = self.get_ok(url).await?;
        response
            .text()
            .await
            .context("Failed to read response body")
    }

    /// Downloads the body of `url` into `writer`, returning the number of bytes written.
    #[tracing::instrument(skip(self, writer))]
    pub async fn download<W: Write>(&self, url: &str, writer: &mut W) -> Result<u64> {
        debug!("Downloading {}...", url);

        let mut response = self.get_ok(url).await?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write downloaded chunk")?;
            downloaded_bytes += chunk.len() as u64;
        }

        debug!("Downloaded {} bytes", downloaded_bytes);
        Ok(downloaded_bytes)
    }

    async fn get_ok(&self, url: &str) -> Result<Response> {
        let request = self
            .request(Method::GET, url)
            .build()
            .with_context(|| format!("Invalid request URL: {}", url))?;

        let response = self
            .send(request)
            .await
            .with_context(|| format!("GET {} failed", url))?;

        ensure_success(response)
    }
}

/// Turns a final non-2xx response into an error naming the status and URL.
pub fn ensure_success(response: Response) -> Result<Response> {
    if !is_success(&response) {
        bail!("HTTP {} from {}", response.status(), response.url());
    }
    Ok(response)
}
