//! CLI Doctor Command
//!
//! Prints the effective configuration and whether each provider is usable.

use anyhow::Result;

use crate::config::Config;
use crate::providers::{build_ocr_provider, build_pinyin_provider};

/// Executes the doctor diagnosis.
pub async fn run(config: &Config) -> Result<()> {
    println!("\n🔍 Running pinyinlens doctor...\n");

    println!("Configuration:");
    println!("{}\n", serde_json::to_string_pretty(&config.redacted())?);

    let checks = provider_checks(config);
    println!("Providers:");
    for (stage, name, ready) in &checks {
        let mark = if *ready { "🟢" } else { "🔴" };
        println!("  {mark} {stage}: {name}");
    }

    println!();
    if checks.iter().all(|(_, _, ready)| *ready) {
        println!("✅ All providers configured.");
    } else {
        println!("❌ Some providers are disabled; requests will fail at that stage.");
    }

    Ok(())
}

/// `(stage, provider name, usable)` for each pipeline stage.
fn provider_checks(config: &Config) -> Vec<(&'static str, String, bool)> {
    let ocr = build_ocr_provider(config);
    let pinyin = build_pinyin_provider(config);
    vec![
        ("ocr", ocr.name().to_string(), ocr.name() != "noop"),
        ("pinyin", pinyin.name().to_string(), pinyin.name() != "noop"),
    ]
}
