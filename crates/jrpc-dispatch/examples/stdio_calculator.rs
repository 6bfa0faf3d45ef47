//! Stdio Calculator JSON-RPC Example
//!
//! Reads one JSON-RPC request (or batch) per line from stdin and writes one
//! response line to stdout.
//!
//! ```text
//! echo '{"jsonrpc":"2.0","method":"add","params":[1,2],"id":1}' \
//!     | cargo run -p jrpc-dispatch --example stdio_calculator
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use clap::Parser;
use jrpc_dispatch::prelude::*;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stdio-calculator", about = "JSON-RPC calculator over stdin/stdout")]
struct Cli {
    /// Expose failure detail in error responses
    #[arg(long)]
    verbose: bool,

    /// Use the blocking dispatch path instead of the suspension-aware one
    #[arg(long)]
    blocking: bool,
}

/// State shared by every call through the dispatcher context.
#[derive(Default)]
struct Calculator {
    calls: AtomicU64,
}

fn build_dispatcher(verbose: bool) -> JsonRpcDispatcher<Calculator> {
    JsonRpcDispatcher::builder_with_context(Calculator::default())
        .verbose(verbose)
        .serialize_output(true)
        .api_version(1)
        .method("add", Signature::required(["a", "b"]), |ctx, args| {
            ctx.context().calls.fetch_add(1, Ordering::Relaxed);
            Ok(json!(args.get::<f64>("a")? + args.get::<f64>("b")?))
        })
        .method("subtract", Signature::required(["a", "b"]), |ctx, args| {
            ctx.context().calls.fetch_add(1, Ordering::Relaxed);
            Ok(json!(args.get::<f64>("a")? - args.get::<f64>("b")?))
        })
        .async_method("divide", Signature::required(["a", "b"]), |ctx, args| async move {
            ctx.context().calls.fetch_add(1, Ordering::Relaxed);
            let a: f64 = args.get("a")?;
            let b: f64 = args.get("b")?;
            if b == 0.0 {
                return Err(MethodError::server(-32001, "Division by zero").with_data(json!({"a": a})));
            }
            Ok::<_, MethodError>(json!(a / b))
        })
        .method("stats", Signature::new(), |ctx, _| {
            Ok(json!({"calls": ctx.context().calls.load(Ordering::Relaxed)}))
        })
        .method("api", Signature::new(), |ctx, _| {
            serde_json::to_value(ctx.describe()).map_err(|e| MethodError::internal(e.to_string()))
        })
        .doc("add", "Add two numbers")
        .doc("subtract", "Subtract b from a")
        .doc("divide", "Divide a by b; fails with -32001 when b is zero")
        .doc("stats", "Number of arithmetic calls served")
        .doc("api", "Describe this API")
        .build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dispatcher = build_dispatcher(cli.verbose);
    info!(methods = ?dispatcher.registered_methods(), blocking = cli.blocking, "Calculator ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let output = if cli.blocking {
            let dispatcher = dispatcher.clone();
            tokio::task::spawn_blocking(move || dispatcher.handle(line)).await?
        } else {
            dispatcher.handle_async(line).await
        };
        if let Some(text) = output.as_text() {
            stdout.write_all(text.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}
