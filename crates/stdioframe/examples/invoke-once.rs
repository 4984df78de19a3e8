//! Send one message to a collaborator executable and print its reply.
//!
//! Run with:
//!   cargo run --example invoke-once -- <EXECUTABLE> <MESSAGE>

use std::time::Duration;

use stdioframe::invoke::{InvokeConfig, Invoker};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(executable), Some(message)) = (args.next(), args.next()) else {
        eprintln!("usage: invoke-once <EXECUTABLE> <MESSAGE>");
        std::process::exit(64);
    };

    let invoker = Invoker::new(InvokeConfig {
        timeout: Some(Duration::from_secs(10)),
        ..InvokeConfig::default()
    });

    let exchange = invoker.exchange(&executable, &message)?;
    eprintln!(
        "request {} bytes, response {} bytes, {:?}",
        exchange.request.len(),
        exchange.response.len(),
        exchange.elapsed
    );
    println!("{}", exchange.message);
    Ok(())
}
