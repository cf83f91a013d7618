//! Financial assistant backed by a configurable language model.
//!
//! Each request sends a fixed system prompt plus one user prompt made of the
//! caller's figures and their question. Three provider APIs are supported:
//! OpenAI-compatible chat completions, Anthropic messages and Ollama generate.

use std::fmt::Write;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AiConfig, AiProvider};
use crate::error::{AppError, AppResult};
use crate::models::{FinancialSnapshot, FinancialSummary};

const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_TOKENS: u32 = 1024;

pub const SYSTEM_PROMPT: &str = "You are a personal finance assistant. \
Answer the user's question using the financial data provided. \
Give specific, practical advice in a few short paragraphs. \
Amounts are monthly unless stated otherwise. \
Do not invent figures that are not in the data.";

/// Render the snapshot as plain text for the model.
pub fn describe(snapshot: &FinancialSnapshot) -> String {
    let summary = FinancialSummary::compute(
        &snapshot.incomes,
        &snapshot.expenses,
        &snapshot.assets,
        &snapshot.liabilities,
    );

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Monthly income: {:.2} (passive {:.2})",
        summary.total_income, summary.passive_income
    );
    let _ = writeln!(out, "Monthly expenses: {:.2}", summary.total_expenses);
    let _ = writeln!(
        out,
        "Monthly cash flow: {:.2} ({:.2} per day)",
        summary.cash_flow, summary.per_day
    );
    let _ = writeln!(out, "Net worth: {:.2}", summary.net_worth);
    let _ = writeln!(
        out,
        "Largest expense category: {} ({:.2})",
        summary.largest_expense_category, summary.largest_expense_amount
    );

    section(&mut out, "Incomes", &snapshot.incomes, |i| {
        format!(
            "{} ({}, {}): {:.2} {}",
            i.source,
            i.category,
            i.income_type.as_str(),
            i.amount,
            i.frequency.as_str()
        )
    });
    section(&mut out, "Expenses", &snapshot.expenses, |e| {
        format!("{} ({}): {:.2} on {}", e.description, e.category, e.amount, e.date)
    });
    section(&mut out, "Assets", &snapshot.assets, |a| {
        format!(
            "{} ({}): {:.2}, generating {:.2}",
            a.name, a.category, a.value, a.income_generated
        )
    });
    section(&mut out, "Liabilities", &snapshot.liabilities, |l| {
        format!(
            "{} ({}): {:.2} at {}%",
            l.description, l.liability_type, l.amount, l.interest_rate
        )
    });
    section(&mut out, "Goals", &snapshot.goals, |g| {
        format!(
            "{}: {:.2} of {:.2} ({}%) by {}",
            g.description,
            g.current_amount,
            g.target_amount,
            g.progress(),
            g.target_date
        )
    });

    out
}

fn section<T>(out: &mut String, title: &str, items: &[T], line: impl Fn(&T) -> String) {
    let _ = writeln!(out, "\n{}:", title);
    if items.is_empty() {
        let _ = writeln!(out, "- (none)");
    }
    for item in items {
        let _ = writeln!(out, "- {}", line(item));
    }
}

pub fn user_prompt(snapshot: &FinancialSnapshot, question: &str) -> String {
    format!(
        "My financial data:\n\n{}\nQuestion: {}",
        describe(snapshot),
        question
    )
}

/// Send one prompt to the configured provider and return its reply text.
pub async fn complete(
    http: &reqwest::Client,
    ai: &AiConfig,
    prompt: &str,
) -> AppResult<String> {
    debug!(provider = ?ai.provider, model = %ai.model, "Sending assistant request");

    let reply = match ai.provider {
        AiProvider::OpenAi => complete_openai(http, ai, prompt).await?,
        AiProvider::Anthropic => complete_anthropic(http, ai, prompt).await?,
        AiProvider::Ollama => complete_ollama(http, ai, prompt).await?,
    };

    let reply = reply.trim();
    if reply.is_empty() {
        return Err(AppError::Upstream("AI provider returned an empty answer".into()));
    }
    Ok(reply.to_string())
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

async fn send<T: for<'de> Deserialize<'de>>(
    request: reqwest::RequestBuilder,
    provider: &str,
) -> AppResult<T> {
    let response = request
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("{} request failed: {}", provider, e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %body, "{} returned an error", provider);
        return Err(AppError::Upstream(format!("{} returned {}", provider, status)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to parse {} response: {}", provider, e)))
}

async fn complete_openai(
    http: &reqwest::Client,
    ai: &AiConfig,
    prompt: &str,
) -> AppResult<String> {
    #[derive(Serialize)]
    struct OpenAiRequest<'a> {
        model: &'a str,
        messages: Vec<Message<'a>>,
        temperature: f64,
    }

    #[derive(Deserialize)]
    struct OpenAiResponse {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: ChoiceMessage,
    }

    #[derive(Deserialize)]
    struct ChoiceMessage {
        content: Option<String>,
    }

    let url = format!("{}/chat/completions", ai.base_url.trim_end_matches('/'));
    let request = OpenAiRequest {
        model: &ai.model,
        messages: vec![
            Message {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            Message {
                role: "user",
                content: prompt,
            },
        ],
        temperature: 0.7,
    };

    let response: OpenAiResponse = send(
        http.post(&url).bearer_auth(&ai.api_key).json(&request),
        "OpenAI",
    )
    .await?;

    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}

async fn complete_anthropic(
    http: &reqwest::Client,
    ai: &AiConfig,
    prompt: &str,
) -> AppResult<String> {
    #[derive(Serialize)]
    struct AnthropicRequest<'a> {
        model: &'a str,
        max_tokens: u32,
        system: &'a str,
        messages: Vec<Message<'a>>,
    }

    #[derive(Deserialize)]
    struct AnthropicResponse {
        content: Vec<ContentBlock>,
    }

    #[derive(Deserialize)]
    struct ContentBlock {
        text: Option<String>,
    }

    let url = format!("{}/v1/messages", ai.base_url.trim_end_matches('/'));
    let request = AnthropicRequest {
        model: &ai.model,
        max_tokens: MAX_TOKENS,
        system: SYSTEM_PROMPT,
        messages: vec![Message {
            role: "user",
            content: prompt,
        }],
    };

    let response: AnthropicResponse = send(
        http.post(&url)
            .header("x-api-key", &ai.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request),
        "Anthropic",
    )
    .await?;

    Ok(response
        .content
        .into_iter()
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("\n"))
}

async fn complete_ollama(
    http: &reqwest::Client,
    ai: &AiConfig,
    prompt: &str,
) -> AppResult<String> {
    #[derive(Serialize)]
    struct OllamaRequest<'a> {
        model: &'a str,
        prompt: &'a str,
        system: &'a str,
        stream: bool,
    }

    #[derive(Deserialize)]
    struct OllamaResponse {
        response: String,
    }

    let url = format!("{}/api/generate", ai.base_url.trim_end_matches('/'));
    let request = OllamaRequest {
        model: &ai.model,
        prompt,
        system: SYSTEM_PROMPT,
        stream: false,
    };

    let response: OllamaResponse = send(http.post(&url).json(&request), "Ollama").await?;
    Ok(response.response)
}
