//! Transport backed directly by a reqwest client.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Request, Response};

use super::Transport;
use crate::error::TransportError;

/// Sends each request once through a [`reqwest::Client`].
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        // reqwest consumes the request, so every attempt sends its own copy.
        let request = request
            .try_clone()
            .ok_or(TransportError::BodyNotReplayable)?;

        let response = self.client.execute(request).await?;
        debug!("{} <- {}", response.status(), response.url());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[tokio::test]
    async fn test_execute_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body("pong")
            .create_async()
            .await;

        let transport = ReqwestTransport::new(Client::new());
        let request = Request::new(Method::GET, format!("{}/ping", url).parse().unwrap());
        let response = transport.execute(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "pong");
    }

    #[tokio::test]
    async fn test_execute_returns_server_error_as_response() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/broken")
            .with_status(503)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(Client::new());
        let request = Request::new(Method::GET, format!("{}/broken", url).parse().unwrap());
        let response = transport.execute(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), 503);
    }

    #[tokio::test]
    async fn test_execute_same_request_twice() {
        // The borrowed request is replayed, not consumed
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/items")
            .match_body("payload")
            .with_status(201)
            .expect(2)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(Client::new());
        let request = transport
            .inner()
            .post(format!("{}/items", url))
            .body("payload")
            .build()
            .unwrap();

        assert_eq!(transport.execute(&request).await.unwrap().status(), 201);
        assert_eq!(transport.execute(&request).await.unwrap().status(), 201);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_connection_refused() {
        let transport = ReqwestTransport::new(Client::new());
        let request = Request::new(Method::GET, "http://127.0.0.1:1/".parse().unwrap());

        let err = transport.execute(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }
}
