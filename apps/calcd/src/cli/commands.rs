//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::Config;
use calcd_core::{CalcError, check_and_evaluate, validate};

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &Config, host: &str, port: u16) -> Result<(), CalcError> {
    println!("calcd Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:      {}", host);
    println!("  Port:      {}", port);
    println!("  Log level: {}", config.log_level);
    println!();
    println!("Endpoints:");
    println!("  POST /api/v1/calculate        - Submit an expression");
    println!("  GET  /api/v1/expressions      - List expressions");
    println!("  GET  /api/v1/expressions/{{id}} - Get one expression");
    println!("  GET  /health                  - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, config).await
}

// =============================================================================
// EVAL COMMAND
// =============================================================================

/// Evaluate an expression and print the result.
pub fn cmd_eval(expression: &str, json_mode: bool) -> Result<(), CalcError> {
    let result = check_and_evaluate(expression)?;

    if json_mode {
        let output = serde_json::json!({
            "expression": expression,
            "result": result,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("{}", result);
    }
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Run the character-set check. Fails with `InvalidExpression` when rejected.
pub fn cmd_check(expression: &str, json_mode: bool) -> Result<(), CalcError> {
    let valid = validate(expression);

    if json_mode {
        let output = serde_json::json!({
            "expression": expression,
            "valid": valid,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else if valid {
        println!("valid");
    }

    if valid {
        Ok(())
    } else {
        Err(CalcError::InvalidExpression)
    }
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the effective configuration.
pub fn cmd_config(config: &Config, json_mode: bool) -> Result<(), CalcError> {
    if json_mode {
        let output = serde_json::to_string_pretty(config)
            .map_err(|e| CalcError::ConfigError(e.to_string()))?;
        println!("{}", output);
    } else {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
