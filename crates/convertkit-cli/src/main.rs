//! convertkit CLI - convert values and format numbers from the command line.

use clap::{Parser, Subcommand};
use convertkit::text::{chinese, words};
use convertkit::{Convert, ConvertConfig, ConvertError, TargetType, Value};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

/// Config file read when `--config` is not given.
const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser)]
#[command(name = "convertkit")]
#[command(about = "Convert values between types and format numbers as words")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file [default: config.yaml, ignored if absent]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a value to a target type
    Convert {
        /// Target type, e.g. i32, bool, list<i64>, map<string,f64>
        #[arg(long)]
        to: String,

        /// Default value (JSON) returned when the input does not convert
        #[arg(long, allow_hyphen_values = true)]
        default: Option<String>,

        /// Return the default instead of failing when no converter exists
        #[arg(long)]
        quiet: bool,

        /// Treat VALUE as a plain string instead of JSON
        #[arg(long)]
        raw: bool,

        /// Input value, parsed as JSON when possible
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Spell a number in English amount words
    Words {
        /// Decimal number, e.g. 100.23
        #[arg(allow_hyphen_values = true)]
        number: String,
    },

    /// Abbreviate an integer with k, m, b or t
    Simple {
        /// Integer to abbreviate
        #[arg(allow_negative_numbers = true)]
        number: i64,
    },

    /// Spell a number in Chinese numerals
    Chinese {
        /// Number to spell
        #[arg(allow_negative_numbers = true)]
        number: f64,

        /// Use financial (upper-case) digits
        #[arg(long)]
        traditional: bool,

        /// Money mode: 元, 角, 分 and 整
        #[arg(long)]
        money: bool,
    },

    /// Parse Chinese numerals into a number
    FromChinese {
        /// Chinese numerals, e.g. 两万二
        text: String,

        /// Parse as a money amount (元, 角, 分)
        #[arg(long)]
        money: bool,
    },

    /// List the built-in target types
    Types,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), ConvertError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(ConvertError::Config)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert {
            to,
            default,
            quiet,
            raw,
            value,
        } => {
            let convert = Convert::from_config(config)?;
            let target: TargetType = to.parse()?;
            let value = parse_value(&value, raw);

            let default = match default {
                Some(text) => {
                    let parsed = parse_value(&text, raw);
                    let coerced = convert.convert(&target, parsed)?;
                    if coerced.is_null() {
                        return Err(ConvertError::invalid(format!(
                            "Default '{}' does not convert to {}",
                            text, target
                        )));
                    }
                    coerced
                }
                None => Value::Null,
            };

            info!("Converting to {}", target);
            let result = convert.convert_with_check(Some(&target), value, default, quiet)?;

            if cli.output_json {
                let out = json!({
                    "type": target.to_string(),
                    "value": result.to_json(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", render(&result));
            }
        }

        Commands::Words { number } => {
            let text = words::format_words(&number)?;
            print_text(cli.output_json, &number, &text)?;
        }

        Commands::Simple { number } => {
            let text = words::number_to_simple(number);
            print_text(cli.output_json, &number.to_string(), &text)?;
        }

        Commands::Chinese {
            number,
            traditional,
            money,
        } => {
            let text = chinese::format(number, traditional, money)?;
            print_text(cli.output_json, &number.to_string(), &text)?;
        }

        Commands::FromChinese { text, money } => {
            let number = if money {
                chinese::chinese_money_to_number(&text)?.to_string()
            } else {
                chinese::chinese_to_number(&text)?.to_string()
            };
            print_text(cli.output_json, &text, &number)?;
        }

        Commands::Types => {
            let convert = Convert::from_config(config)?;
            let types: Vec<String> = convert
                .registry()
                .builtin_types()
                .into_iter()
                .map(ToString::to_string)
                .collect();

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&types)?);
            } else {
                println!("Built-in target types:");
                for name in &types {
                    println!("  {}", name);
                }
                println!("\nStructural: list<T>, set<T>, T[], map<K,V>, shared<T>");
            }
        }
    }

    Ok(())
}

/// Load the config file; the default path may be absent, an explicit one may not.
fn load_config(path: Option<&Path>) -> Result<ConvertConfig, ConvertError> {
    match path {
        Some(path) => {
            let config = ConvertConfig::load(path)?;
            debug!("Loaded configuration from {:?}", path);
            Ok(config)
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG);
            if default_path.exists() {
                let config = ConvertConfig::load(default_path)?;
                debug!("Loaded configuration from {:?}", default_path);
                Ok(config)
            } else {
                Ok(ConvertConfig::default())
            }
        }
    }
}

/// Parse a command-line value as JSON, falling back to a plain string.
///
/// Non-integral JSON numbers keep their text so that decimal targets see
/// exactly what was typed.
fn parse_value(text: &str, raw: bool) -> Value {
    if raw {
        return Value::from(text);
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Number(n)) if n.as_i64().is_none() && n.as_u64().is_none() => {
            Value::from(text.trim())
        }
        Ok(json) => Value::from(json),
        Err(_) => Value::from(text),
    }
}

/// Plain-text rendering; null prints as `null` so an empty line never hides it.
fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn print_text(output_json: bool, input: &str, text: &str) -> Result<(), ConvertError> {
    if output_json {
        let out = json!({ "input": input, "output": text });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        "trace" => Level::TRACE,
        other => return Err(format!("Unknown verbosity '{}'", other)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("Unknown log format '{}'", other)),
    }

    Ok(())
}
