use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use stdioframe_invoke::Exchange;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ExchangeOutput<'a> {
    executable: String,
    message: &'a str,
    request_size: usize,
    request: String,
    response_size: usize,
    response: String,
    reply: &'a str,
    trailing_bytes: usize,
    #[serde(skip_serializing_if = "str::is_empty")]
    stderr: &'a str,
    elapsed_ms: u128,
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    message: &'a str,
    payload_size: usize,
    trailing_bytes: usize,
}

pub fn print_exchange(message: &str, exchange: &Exchange, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ExchangeOutput {
                executable: exchange.executable.display().to_string(),
                message,
                request_size: exchange.request.len(),
                request: escape_bytes(&exchange.request),
                response_size: exchange.response.len(),
                response: escape_bytes(&exchange.response),
                reply: &exchange.message,
                trailing_bytes: exchange.trailing_bytes,
                stderr: &exchange.stderr,
                elapsed_ms: exchange.elapsed.as_millis(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["collaborator".to_string(), exchange.executable.display().to_string()])
                .add_row(vec!["message".to_string(), message.to_string()])
                .add_row(vec!["encoded message".to_string(), escape_bytes(&exchange.request)])
                .add_row(vec!["encoded response".to_string(), escape_bytes(&exchange.response)])
                .add_row(vec!["response".to_string(), exchange.message.clone()])
                .add_row(vec!["elapsed".to_string(), format!("{:?}", exchange.elapsed)]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("message: {message}");
            println!("encoded message: {}", escape_bytes(&exchange.request));
            println!("encoded response: {}", escape_bytes(&exchange.response));
            println!("response: {}", exchange.message);
        }
        OutputFormat::Raw => {
            println!("{}", exchange.message);
        }
    }
}

pub fn print_decoded(message: &str, trailing_bytes: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&DecodedOutput {
            message,
            payload_size: message.len(),
            trailing_bytes,
        }),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("message: {message}");
            println!("payload size: {}", message.len());
            if trailing_bytes > 0 {
                println!("ignored trailing bytes: {trailing_bytes}");
            }
        }
        OutputFormat::Raw => println!("{message}"),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json(value: &impl Serialize) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn escape_bytes(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}
