use std::ffi::OsString;
use std::time::Duration;

use stdioframe_invoke::{InvokeConfig, Invoker};

use crate::cmd::InvokeArgs;
use crate::exit::{invoke_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_exchange, OutputFormat};

pub fn run(args: InvokeArgs, format: OutputFormat) -> CliResult<i32> {
    let invoker = Invoker::new(build_config(&args)?);

    tracing::info!(
        collaborator = %args.exe.display(),
        size = args.message.len(),
        timeout = ?invoker.config().timeout,
        "invoking collaborator"
    );

    let exchange = invoker
        .exchange(&args.exe, &args.message)
        .map_err(invoke_error)?;

    tracing::info!(
        size = exchange.message.len(),
        elapsed = ?exchange.elapsed,
        "response decoded"
    );
    if !exchange.stderr.is_empty() {
        tracing::debug!(stderr = %exchange.stderr, "collaborator stderr");
    }

    print_exchange(&args.message, &exchange, format);
    Ok(SUCCESS)
}

fn build_config(args: &InvokeArgs) -> CliResult<InvokeConfig> {
    let timeout = args.timeout.as_deref().map(parse_duration).transpose()?;
    Ok(InvokeConfig {
        timeout,
        args: args.args.iter().map(OsString::from).collect(),
        current_dir: args.cwd.clone(),
        stderr: args.stderr.into(),
    })
}

/// Parse a collaborator timeout: digits followed by `ms`, `s`, `m` or nothing (seconds).
fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    let digits_end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(digits_end);

    let invalid = || {
        CliError::new(
            USAGE,
            format!("invalid timeout {input:?} (e.g. 5s, 500ms, 2m)"),
        )
    };
    let value: u64 = digits.parse().map_err(|_| invalid())?;
    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "" | "s" => Ok(Duration::from_secs(value)),
        "m" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| CliError::new(USAGE, format!("timeout {input:?} is too large"))),
        _ => Err(invalid()),
    }
}
