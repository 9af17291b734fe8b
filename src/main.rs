// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use std::env;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use wasm_relay::config::{load_and_validate_config, Config, RuntimeBuilder, Strategy};
use wasm_relay::engine::{Document, PipelineInput, PipelineOutput};

/// Operands used by `fan_out` when none are given.
const DEFAULT_OPERANDS: [u64; 2] = [2, 3];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <pipeline.yaml|pipeline.toml> [inputs...]", args[0]);
        eprintln!("Example: {} configs/numbers.yaml 7 3", args[0]);
        eprintln!("Example: {} configs/greetings.yaml 231", args[0]);
        eprintln!("Example: {} configs/orders.yaml order.json", args[0]);
        std::process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2..]).await {
        eprintln!("❌ Failed to execute {}: {:#}", args[1], e);
        std::process::exit(1);
    }
}

async fn run(config_file: &str, inputs: &[String]) -> Result<()> {
    let config = load_and_validate_config(config_file)
        .with_context(|| format!("loading {}", config_file))?;
    let input = parse_input(&config, inputs)?;

    println!("🚀 WASM Relay");
    println!("═══════════════════════════════════");
    println!("Config:   {}", config_file);
    println!("Strategy: {:?}", config.strategy);
    println!("Modules:  {}", config.modules.len());
    println!();

    let (stages, executor) = RuntimeBuilder::from_config(&config)?;

    let start = Instant::now();
    let output = executor.execute(&stages, input).await?;
    let elapsed = start.elapsed();

    print_output(&output)?;
    println!();
    println!("⏱️  Completed in {:.2?}", elapsed);
    Ok(())
}

fn parse_input(config: &Config, inputs: &[String]) -> Result<PipelineInput> {
    match config.strategy {
        Strategy::FanOut => {
            if inputs.is_empty() {
                return Ok(PipelineInput::Operands(DEFAULT_OPERANDS.to_vec()));
            }
            let operands = inputs
                .iter()
                .map(|raw| {
                    raw.parse::<u64>()
                        .with_context(|| format!("operand '{}' is not an unsigned integer", raw))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(PipelineInput::Operands(operands))
        }
        Strategy::Routed => match inputs {
            [symbols] => Ok(PipelineInput::Symbols(symbols.clone())),
            _ => bail!("routed pipelines take exactly one digit string"),
        },
        Strategy::Accumulate => {
            let record = match inputs {
                [] => config
                    .initial_record
                    .clone()
                    .context("no record file given and the config has no initial_record")?,
                [path] => {
                    let text = std::fs::read_to_string(path)
                        .with_context(|| format!("reading {}", path))?;
                    serde_json::from_str::<Document>(&text)
                        .with_context(|| format!("parsing {}", path))?
                }
                _ => bail!("accumulate pipelines take at most one record file"),
            };
            Ok(PipelineInput::Record(record))
        }
    }
}

fn print_output(output: &PipelineOutput) -> Result<()> {
    match output {
        PipelineOutput::Values(values) => {
            println!("📊 Results:");
            for stage in values {
                println!("  • {}: {:?}", stage.module_id, stage.values);
            }
        }
        PipelineOutput::Routed(outputs) => {
            println!("📨 Replies:");
            for reply in outputs {
                println!(
                    "  {} '{}' → {}: {}",
                    reply.position,
                    reply.symbol,
                    reply.module_id,
                    reply.text.as_deref().unwrap_or("<no reply>")
                );
            }
        }
        PipelineOutput::Record(record) => {
            println!("📋 Final record:");
            println!("{}", serde_json::to_string_pretty(record)?);
        }
    }
    Ok(())
}
