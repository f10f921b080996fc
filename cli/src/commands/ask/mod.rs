//! # Chat Client Command
//!
//! File: cli/src/commands/ask/mod.rs
//!
//! ## Overview
//!
//! `idsr-chat ask` is the terminal counterpart of the chat window: it sends
//! questions to a running `idsr-chat serve` and prints the answers with their
//! confidence label.
//!
//! - With a question argument it performs one exchange and exits non-zero if
//!   that exchange fails.
//! - Without one it opens an interactive session on stdin. A failed exchange
//!   is shown inline as an error message and the session carries on.
//!
//! Any non-success status or transport failure ends that single exchange; the
//! message always names the server URL that was tried.
//!
//! ## Examples
//!
//! ```bash
//! idsr-chat ask "What is the Alert Threshold for measles?"
//! idsr-chat ask --url http://192.168.1.20:8000
//! IDSR_CHAT_URL=http://10.0.0.5:8000 idsr-chat ask "How should samples be stored?"
//! ```
//!
use crate::commands::serve::handlers::ChatResponse;
use crate::core::config::{self, ClientSection};
use crate::core::error::{ChatError, Result};
use crate::guidelines::EXAMPLE_QUESTIONS;
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// # Ask Command Arguments (`AskArgs`)
///
/// Every flag is optional; when omitted the `[client]` config section (or its
/// default) applies.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Question to send. Omit to start an interactive session.
    pub question: Option<String>,

    /// Base URL of the chat server, e.g. `http://127.0.0.1:8000`.
    #[arg(long, env = "IDSR_CHAT_URL")]
    pub url: Option<String>,

    /// Context label sent along with each question.
    #[arg(long)]
    pub context: Option<String>,

    /// Forwarded to the server (currently ignored by it).
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Forwarded to the server (currently ignored by it).
    #[arg(long)]
    pub temperature: Option<f64>,
}

/// Body sent to `POST /chat`.
#[derive(Debug, Serialize)]
struct ChatQuery<'a> {
    question: &'a str,
    context: &'a str,
    max_tokens: u32,
    temperature: f64,
}

/// HTTP client for one chat server.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    settings: ClientSection,
}

impl ChatClient {
    pub fn new(settings: ClientSection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, settings })
    }

    /// Base URL the client talks to.
    pub fn api_url(&self) -> &str {
        &self.settings.api_url
    }

    fn chat_endpoint(&self) -> String {
        format!("{}/chat", self.settings.api_url)
    }

    /// Performs one exchange. Every failure is reported as
    /// `ChatError::Exchange` naming the server URL.
    pub async fn ask(&self, question: &str) -> std::result::Result<ChatResponse, ChatError> {
        self.send(question).await.map_err(|cause| ChatError::Exchange {
            endpoint: self.settings.api_url.clone(),
            cause: cause.to_string(),
        })
    }

    async fn send(&self, question: &str) -> Result<ChatResponse> {
        let endpoint = self.chat_endpoint();
        debug!("POST {}", endpoint);
        let response = self
            .http
            .post(&endpoint)
            .json(&ChatQuery {
                question,
                context: &self.settings.context,
                max_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::ApiStatus { status }.into());
        }
        Ok(response.json::<ChatResponse>().await?)
    }
}

/// Formats an answer the way the chat window shows it.
pub fn render_answer(response: &ChatResponse) -> String {
    format!("{}\n({} confidence)", response.answer, response.confidence)
}

/// Counts of an interactive session, mostly for logging.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub answered: usize,
    pub failed: usize,
}

/// Runs an interactive session: one exchange per non-blank input line until
/// EOF, `exit` or `quit`.
pub async fn run_session<R, W>(client: &ChatClient, input: R, out: &mut W) -> Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Ask me anything about IDSR and Measles Detection Guidelines.")?;
    writeln!(out, "Try asking:")?;
    for example in EXAMPLE_QUESTIONS.iter().take(3) {
        writeln!(out, "  - {}", example)?;
    }
    writeln!(out, "Type 'exit' to quit.\n")?;

    let mut summary = SessionSummary::default();
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await.context("Failed to read question")? else {
            writeln!(out)?;
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match client.ask(question).await {
            Ok(response) => {
                summary.answered += 1;
                writeln!(out, "{}\n", render_answer(&response))?;
            }
            Err(e) => {
                summary.failed += 1;
                warn!("Exchange failed: {}", e);
                writeln!(out, "[error] {}\n", e)?;
            }
        }
    }
    Ok(summary)
}

fn client_settings(args: &AskArgs, mut settings: ClientSection) -> Result<ClientSection> {
    if let Some(url) = &args.url {
        settings.api_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(context) = &args.context {
        settings.context = context.clone();
    }
    if let Some(max_tokens) = args.max_tokens {
        settings.max_tokens = max_tokens;
    }
    if let Some(temperature) = args.temperature {
        settings.temperature = temperature;
    }
    config::validate_client(&settings)?;
    Ok(settings)
}

/// # Handle Ask Command (`handle_ask`)
pub async fn handle_ask(args: AskArgs) -> Result<()> {
    info!("Handling ask command with args: {:?}", args);
    let file_config = config::load_config()?;
    let settings = client_settings(&args, file_config.client)?;
    let client = ChatClient::new(settings)?;

    match args.question.as_deref().map(str::trim) {
        Some("") => Err(ChatError::ArgumentParsing("question must not be empty".into()).into()),
        Some(question) => {
            let response = client.ask(question).await?;
            println!("{}", render_answer(&response));
            Ok(())
        }
        None => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let summary = run_session(&client, stdin, &mut stdout).await?;
            info!(
                "Session with {} finished: {} answered, {} failed",
                client.api_url(),
                summary.answered,
                summary.failed
            );
            Ok(())
        }
    }
}
