use anyhow::{Context, Result, bail};
use clap::Parser;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method};
use retry_transport::http::HttpClient;
use retry_transport::retry::{
    DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_MS, RetryPolicy,
};
use retry_transport::transport::is_success;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// retry-fetch - HTTP requests with exponential backoff
///
/// Sends one request, retrying connection failures and non-2xx responses.
/// The body of the final response is written to stdout (or --output), and the
/// exit status is non-zero unless that response was a 2xx.
///
/// Examples:
///   retry-fetch https://example.com/health
///   retry-fetch -X POST -H 'Content-Type: application/json' -d '{}' https://example.com/jobs
#[derive(Parser, Debug)]
#[command(author, version = env!("RETRY_FETCH_VERSION"), about)]
struct Cli {
    /// URL to request
    #[arg(value_name = "URL")]
    url: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    method: String,

    /// Extra request header (repeatable)
    #[arg(long = "header", short = 'H', value_name = "NAME:VALUE")]
    headers: Vec<String>,

    /// Request body
    #[arg(long, short = 'd')]
    data: Option<String>,

    /// Write the response body to a file instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    #[command(flatten)]
    retry: RetryArgs,
}

#[derive(clap::Args, Debug)]
struct RetryArgs {
    /// Delay after the first failed attempt, in milliseconds
    #[arg(
        long,
        env = "RETRY_FETCH_INITIAL_DELAY_MS",
        default_value_t = DEFAULT_INITIAL_DELAY_MS
    )]
    initial_delay_ms: u64,

    /// Upper bound on any single delay, in milliseconds
    #[arg(long, env = "RETRY_FETCH_MAX_DELAY_MS", default_value_t = DEFAULT_MAX_DELAY_MS)]
    max_delay_ms: u64,

    /// Maximum number of attempts, including the first
    #[arg(long, env = "RETRY_FETCH_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,
}

impl RetryArgs {
    fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_millis(self.initial_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            self.max_attempts,
        )
    }
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("Invalid header '{}'. Expected 'NAME:VALUE'.", raw);
    };
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .with_context(|| format!("Invalid header name in '{}'", raw))?;
    let value = HeaderValue::from_str(value.trim())
        .with_context(|| format!("Invalid header value in '{}'", raw))?;
    Ok((name, value))
}

async fn run(cli: Cli) -> Result<()> {
    let method = Method::from_bytes(cli.method.to_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{}'", cli.method))?;

    let client = Client::builder().user_agent("retry-fetch").build()?;
    let http_client = HttpClient::with_retry(client, cli.retry.policy());

    let mut builder = http_client.request(method.clone(), &cli.url);
    for raw in &cli.headers {
        let (name, value) = parse_header(raw)?;
        builder = builder.header(name, value);
    }
    if let Some(data) = cli.data {
        builder = builder.body(data);
    }
    let request = builder
        .build()
        .with_context(|| format!("Invalid request URL: {}", cli.url))?;

    let response = http_client
        .send(request)
        .await
        .with_context(|| format!("{} {} failed", method, cli.url))?;

    let status = response.status();
    let success = is_success(&response);
    let body = response
        .bytes()
        .await
        .context("Failed to read response body")?;

    match &cli.output {
        Some(path) => std::fs::write(path, &body)
            .with_context(|| format!("Failed to write response body to {:?}", path))?,
        None => std::io::stdout()
            .write_all(&body)
            .context("Failed to write response body to stdout")?,
    }

    if !success {
        bail!("{} {} answered {}", method, cli.url, status);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    run(cli).await
}
