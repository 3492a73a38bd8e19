//! Build script for charger
//!
//! Validates charger.toml at compile time

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_config();
}

/// Validate charger.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=charger.toml");

    let config_path = Path::new("charger.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: charger.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The charger embeds charger.toml as its default configuration.   ║\n\
            ║  Please create one in the charger directory.                     ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read charger.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in charger.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_display(&config, &mut errors);
    validate_input(&config, &mut errors);
    validate_stats(&config, &mut errors);
    validate_runtime(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in charger.toml                    ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=charger.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section<'a>(config: &'a toml::Value, name: &str, errors: &mut Vec<String>) -> Option<&'a toml::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => None,
    }
}

fn check_range(
    table: &toml::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        Some(toml::Value::Integer(value)) if *value < min || *value > max => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(toml::Value::Integer(_)) | None => {}
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn check_choice(
    table: &toml::Table,
    section: &str,
    key: &str,
    choices: &[&str],
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        Some(toml::Value::String(value)) if !choices.contains(&value.as_str()) => {
            errors.push(format!("[{}] {} must be one of {}", section, key, choices.join(", ")));
        }
        Some(toml::Value::String(_)) | None => {}
        Some(_) => errors.push(format!("[{}] {} must be a string", section, key)),
    }
}

/// Validate the display section
fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = section(config, "display", errors) else {
        errors.push("Missing [display] section".to_string());
        return;
    };

    if let Some(rotation) = display.get("rotation") {
        match rotation {
            toml::Value::Integer(degrees) if ![0, 90, 180, 270].contains(degrees) => {
                errors.push("[display] rotation must be 0, 90, 180 or 270".to_string());
            }
            toml::Value::Integer(_) => {}
            _ => errors.push("[display] rotation must be an integer".to_string()),
        }
    }

    check_range(display, "display", "overscan_percent", 0, 49, errors);
    check_choice(display, "display", "style", &["bar", "ring"], errors);

    if display.get("device").is_none() {
        errors.push("[display] missing 'device'".to_string());
    }
    if display.get("assets_dir").is_none() {
        errors.push("[display] missing 'assets_dir'".to_string());
    }
}

/// Validate key codes
fn validate_input(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(input) = section(config, "input", errors) else {
        return;
    };

    // KEY_MAX
    check_range(input, "input", "power_key", 0, 0x2ff, errors);
    check_range(input, "input", "alarm_key", 0, 0x2ff, errors);

    if let (Some(power), Some(alarm)) = (input.get("power_key"), input.get("alarm_key")) {
        if power == alarm {
            errors.push("[input] power_key and alarm_key must differ".to_string());
        }
    }
}

/// Validate statistics daemon timing
fn validate_stats(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(stats) = section(config, "stats", errors) else {
        return;
    };

    check_range(stats, "stats", "interval_s", 1, 86_400, errors);
    check_range(stats, "stats", "retry_s", 1, 3_600, errors);
    check_range(stats, "stats", "max_failures", 1, 1_000_000, errors);
}

fn validate_runtime(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(runtime) = section(config, "runtime", errors) else {
        return;
    };

    check_choice(
        runtime,
        "runtime",
        "mode",
        &["default", "charge_test", "power_test", "input_test"],
        errors,
    );
}
