//! CLI argument parsing and run dispatch

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hitbench_core::{
    ConsoleReporter, OrchestratorBuilder, ProgressReporter, RunConfig, RunOutcome, SilentReporter,
};
use hitbench_http::{parse_header, HttpClient, HttpTarget};
use hitbench_report::Report;

/// Request count used when only a time limit is given
const TIME_LIMITED_REQUESTS: usize = 50_000;

#[derive(Debug, Parser)]
#[command(name = "hitbench")]
#[command(author, version, about = "HTTP load generator", long_about = None)]
pub struct Cli {
    /// Target URL (http or https)
    pub url: String,

    /// Number of requests to perform [default: 1, or 50000 with -t]
    #[arg(short = 'n', long)]
    pub requests: Option<usize>,

    /// Number of requests to run concurrently
    #[arg(short = 'c', long, default_value_t = 1)]
    pub concurrency: usize,

    /// Seconds to spend benchmarking; 0 disables the limit
    #[arg(short = 't', long = "timelimit", default_value_t = 0)]
    pub time_limit: u64,

    /// Keep going after a failed request instead of stopping on the first one
    #[arg(short = 'r', long)]
    pub continue_on_error: bool,

    /// Reuse connections between requests
    #[arg(short = 'k', long = "keepalive")]
    pub keep_alive: bool,

    /// HTTP method
    #[arg(short = 'm', long, default_value = "GET")]
    pub method: String,

    /// Extra header, `Name: value`; may be repeated
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// File whose contents are sent as the request body
    #[arg(short = 'p', long)]
    pub body_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Accept responses whose body length varies
    #[arg(short = 'l', long)]
    pub variable_length: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, env = "HITBENCH_VERBOSE")]
    pub verbose: bool,
}

impl Cli {
    /// Requests to issue, honouring the time-limited default
    pub fn request_quota(&self) -> usize {
        match self.requests {
            Some(n) => n,
            None if self.time_limit > 0 => TIME_LIMITED_REQUESTS,
            None => 1,
        }
    }

    /// Run configuration derived from the flags
    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(self.request_quota(), self.concurrency)
            .with_time_limit_secs(self.time_limit)
            .with_abort_on_error(!self.continue_on_error)
            .with_target(self.url.clone())
    }

    /// Progress goes to stderr, and is silenced entirely for JSON output
    fn progress_reporter(&self) -> Arc<dyn ProgressReporter> {
        if self.json {
            Arc::new(SilentReporter)
        } else {
            Arc::new(ConsoleReporter::new())
        }
    }

    async fn http_target(&self) -> Result<HttpTarget> {
        let mut target = HttpTarget::new(&self.url)?
            .with_method(&self.method)?
            .with_timeout(Duration::from_secs(self.timeout))?
            .with_keep_alive(self.keep_alive)
            .with_variable_length(self.variable_length);

        for line in &self.headers {
            let (name, value) = parse_header(line)?;
            target = target.with_header(name, value);
        }

        if let Some(path) = &self.body_file {
            let body = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read body file {}", path.display()))?;
            target = target.with_body(body);
        }

        Ok(target)
    }
}

/// Run the benchmark described by `cli` and print the report
pub async fn run(cli: Cli) -> Result<()> {
    let output = execute(&cli).await?;
    print!("{}", output);
    Ok(())
}

/// Run the benchmark and render the report exactly as it goes to stdout
async fn execute(cli: &Cli) -> Result<String> {
    let config = cli.run_config();
    config.validate().context("invalid run configuration")?;

    let target = cli.http_target().await.context("invalid target")?;
    let client = HttpClient::new(target).context("failed to create HTTP client")?;

    let orchestrator = OrchestratorBuilder::new()
        .config(config.clone())
        .client(Arc::new(client))
        .reporter(cli.progress_reporter())
        .build()?;

    let RunOutcome {
        statistics,
        cause,
        pool,
    } = orchestrator
        .run_with_signal_handling()
        .await
        .context("benchmark run failed")?;

    tracing::info!(
        %cause,
        workers = pool.workers,
        issued = pool.issued,
        failed = pool.failed,
        received = pool.received,
        longest_worker_ms = pool.longest_worker.as_millis() as u64,
        "run finished"
    );

    let report = Report::new(&statistics, config.concurrency, &config.target);
    render(&report, cli.json)
}

fn render(report: &Report, json: bool) -> Result<String> {
    if json {
        let mut text = serde_json::to_string_pretty(report)?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(format!("\n{}", report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hitbench").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["http://localhost/"]);
        let config = cli.run_config();

        assert_eq!(config.requests, 1);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.time_limit(), None);
        assert!(config.abort_on_error);
        assert_eq!(config.target, "http://localhost/");
        assert_eq!(cli.method, "GET");
        assert!(!cli.json);
    }

    #[test]
    fn test_time_limit_raises_default_quota() {
        let cli = parse(&["-t", "5", "http://localhost/"]);
        assert_eq!(cli.request_quota(), TIME_LIMITED_REQUESTS);

        let cli = parse(&["-t", "5", "-n", "10", "http://localhost/"]);
        assert_eq!(cli.request_quota(), 10);
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "-n", "100", "-c", "8", "-r", "-k", "-l", "-m", "POST", "-H", "X-A: 1", "-H",
            "X-B: 2", "--json", "http://localhost/",
        ]);
        let config = cli.run_config();

        assert_eq!(config.requests, 100);
        assert_eq!(config.concurrency, 8);
        assert!(!config.abort_on_error);
        assert!(cli.keep_alive);
        assert!(cli.variable_length);
        assert_eq!(cli.headers, vec!["X-A: 1", "X-B: 2"]);
        assert!(cli.json);
    }

    #[tokio::test]
    async fn test_http_target_from_flags() {
        let cli = parse(&["-m", "post", "-H", "X-Trace: abc", "-k", "http://localhost:8080/x"]);
        let target = cli.http_target().await.unwrap();

        assert_eq!(target.method.as_str(), "POST");
        assert_eq!(target.headers["x-trace"], "abc");
        assert!(target.keep_alive);
        assert_eq!(target.timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_missing_body_file_is_an_error() {
        let cli = parse(&["-p", "/nonexistent/hitbench-body", "http://localhost/"]);
        assert!(cli.http_target().await.is_err());
    }

    /// Serve `body` with a 200 to every connection
    async fn serve(body: &'static str) -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let reply = format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(reply.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        addr
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_json_output_is_a_single_document() {
        let addr = serve("hello").await;
        let url = format!("http://{}/", addr);
        let cli = parse(&["-n", "20", "-c", "2", "--json", &url]);

        let output = execute(&cli).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["complete_requests"], 20);
        assert_eq!(json["failed_requests"], 0);
        assert_eq!(json["total_transferred"], 100);
        assert_eq!(json["target"], url.as_str());
    }

    #[tokio::test]
    async fn test_text_output() {
        let addr = serve("hi").await;
        let url = format!("http://{}/", addr);
        let cli = parse(&["-n", "3", &url]);

        let output = execute(&cli).await.unwrap();

        assert!(output.starts_with("\nTarget:"));
        assert!(output.contains("Complete requests:      3"));
        assert!(!output.contains("Benchmarking"));
    }

    #[test]
    fn test_render_json_parses() {
        let stats = hitbench_core::Statistics::new(0);
        let report = Report::new(&stats, 1, "t");

        let text = render(&report, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["target"], "t");
        assert!(render(&report, false).unwrap().contains("Target:"));
    }
}
