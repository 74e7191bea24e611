// ABOUTME: Diagnostic utility that checks the configured text-generation provider end to end
// ABOUTME: Reports availability, optionally sends a test message, and can print a sample report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! Usage:
//! ```bash
//! # Check the provider selected by MINDWELL_LLM_PROVIDER
//! cargo run --bin mindwell-check
//!
//! # Check a specific provider and model with a custom message
//! cargo run --bin mindwell-check -- --provider anthropic --model claude-3-5-haiku-latest \
//!     --message "I have an exam tomorrow and can't focus"
//!
//! # Build a report over sample history
//! cargo run --bin mindwell-check -- --sample-report
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use mindwell_server::config::{LlmProviderType, ServerConfig};
use mindwell_server::errors::from_json_error;
use mindwell_server::llm::{spawn_startup_probe, ProviderRouter};
use mindwell_server::logging;
use mindwell_server::models::CognitiveDraft;
use mindwell_server::services::CompanionService;
use mindwell_server::store::InMemoryStore;
use tracing::info;
use uuid::Uuid;

const DEFAULT_TEST_MESSAGE: &str = "Hello, I'm feeling a bit anxious today. Can you help me?";

#[derive(Parser)]
#[command(
    name = "mindwell-check",
    about = "Mindwell provider diagnostics",
    long_about = "Check that the configured text-generation provider is reachable and answering."
)]
struct CheckArgs {
    /// Provider override (ollama, gemini, anthropic, openai)
    #[arg(long)]
    provider: Option<String>,

    /// Model override
    #[arg(long)]
    model: Option<String>,

    /// Message to send; defaults to a short greeting
    #[arg(long)]
    message: Option<String>,

    /// Only check availability
    #[arg(long)]
    skip_generation: bool,

    /// Compose and print a report over sample history
    #[arg(long)]
    sample_report: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = CheckArgs::parse();
    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(provider) = args.provider.as_deref() {
        config.provider.provider = LlmProviderType::from_str_or_default(provider);
    }
    if let Some(model) = args.model {
        config.provider.model = Some(model);
    }
    info!("{}", config.summary());
    let retry_availability = config.startup_probe;

    let router = Arc::new(ProviderRouter::from_config(config.provider)?);
    println!("Mindwell Provider Diagnostics");
    println!("=============================");

    println!("1. Checking availability...");
    let available = if retry_availability {
        spawn_startup_probe(Arc::clone(&router)).await?
    } else {
        router.is_available().await
    };
    println!(
        "   Provider {} (model {}): {}",
        router.config().provider,
        router.resolved_model(),
        if available { "available" } else { "not available" }
    );
    if !available {
        print_hints(router.config().provider);
        return Ok(ExitCode::FAILURE);
    }

    if !args.skip_generation {
        println!("\n2. Generating a reply...");
        let message = args.message.as_deref().unwrap_or(DEFAULT_TEST_MESSAGE);
        let result = router.generate(message, &[]).await;
        if result.success() {
            println!("   Model: {}", result.model_used());
            println!("   Reply: {}", result.text());
        } else {
            println!(
                "   Generation failed ({}): {}",
                result
                    .error_kind()
                    .map_or_else(|| "unknown".to_owned(), |kind| kind.to_string()),
                result.text()
            );
            return Ok(ExitCode::FAILURE);
        }
    }

    if args.sample_report {
        println!("\n3. Composing a sample report...");
        let service = CompanionService::new(Arc::new(InMemoryStore::new()), Arc::clone(&router));
        let user = seed_sample_history(&service).await?;
        let report = service.compose_report(user).await?;
        let rendered = serde_json::to_string_pretty(&report).map_err(from_json_error)?;
        println!("{rendered}");
    }

    println!("\nAll checks passed.");
    Ok(ExitCode::SUCCESS)
}

fn print_hints(provider: LlmProviderType) {
    match provider {
        LlmProviderType::Ollama => {
            println!("   - Make sure Ollama is installed and running: ollama serve");
            println!("   - Pull the model: ollama pull mistral:7b-instruct");
            println!("   - Set OLLAMA_BASE_URL if it is not on localhost:11434");
        }
        LlmProviderType::Gemini => println!("   - Set GEMINI_API_KEY to a key starting with AIza"),
        LlmProviderType::Anthropic => {
            println!("   - Set ANTHROPIC_API_KEY to a key starting with sk-ant-");
        }
        LlmProviderType::OpenAi => println!("   - Set OPENAI_API_KEY to a key starting with sk-"),
    }
}

async fn seed_sample_history(service: &CompanionService) -> Result<Uuid> {
    let user = Uuid::new_v4();
    let today = Utc::now().date_naive();
    for (offset, score) in [(6, 2), (5, 3), (4, 2), (3, 3), (2, 4), (1, 4), (0, 5)] {
        service
            .record_mood(user, score, "", Some(today - Duration::days(offset)))
            .await?;
    }
    service
        .submit_assessment(user, &[1, 1, 2, 1, 1, 0, 1, 1, 0])
        .await?;
    service
        .save_cognitive_record(
            user,
            CognitiveDraft {
                situation: "Presentation at work".to_owned(),
                automatic_thought: "Everyone will notice I'm nervous".to_owned(),
                emotion_intensity: 80,
                evidence: "My last presentation went fine".to_owned(),
                alternative: "Some nerves are normal and rarely visible".to_owned(),
                re_rate: 45,
                before_feeling: 30,
                after_feeling: 55,
            },
        )
        .await?;
    Ok(user)
}
