//! rustodata - compile OData V2 query requests into JPQL.
//!
//! Loads an entity data model and a request descriptor (both JSON), compiles
//! the request, and prints the resulting plan as JSON on stdout.
//!
//! # Usage
//!
//! ```text
//! rustodata <metadata.json> <request.json | ->
//! ```
//!
//! Passing `-` as the request reads the descriptor from stdin.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUSTODATA_ENTITY_ALIAS_PREFIX` | `E` | Prefix of entity aliases |
//! | `RUSTODATA_RELATIONSHIP_ALIAS_PREFIX` | `R` | Prefix of relationship aliases |
//! | `RUSTODATA_MAX_PAGE_SIZE` | *(unset)* | Upper bound applied to `top` |
//! | `RUSTODATA_JOIN_KIND` | `inner` | `inner` or `left` joins for navigation |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::io::Read;

use anyhow::{Context, Result};
use rustodata_core::{CompilerConfig, QueryCompiler};
use rustodata_model::{EdmModel, QueryRequest};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: rustodata <metadata.json> <request.json | ->";

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`. Logs go to
/// stderr so stdout carries only the plan.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Compile the request in `request_json` against the model in `metadata_json`
/// and render the plan as pretty-printed JSON.
fn run(compiler: &QueryCompiler, metadata_json: &str, request_json: &str) -> Result<String> {
    let model: EdmModel =
        serde_json::from_str(metadata_json).context("failed to parse metadata document")?;
    let request: QueryRequest =
        serde_json::from_str(request_json).context("failed to parse request descriptor")?;
    debug!(
        namespace = %model.namespace,
        entity_sets = model.entity_sets.len(),
        "loaded model"
    );

    let plan = compiler
        .compile(&model, &request)
        .with_context(|| format!("failed to compile request for {}", request.entity_set))?;
    serde_json::to_string_pretty(&plan).context("failed to serialize plan")
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

fn main() -> Result<()> {
    let config = CompilerConfig::from_env().context("invalid configuration")?;
    init_tracing(&config.log_level)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [metadata_path, request_path] = args.as_slice() else {
        anyhow::bail!(USAGE);
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        join_kind = %config.join_kind,
        "starting rustodata"
    );
    let compiler = QueryCompiler::new(config).context("invalid configuration")?;

    let metadata = read_input(metadata_path)?;
    let request = read_input(request_path)?;
    println!("{}", run(&compiler, &metadata, &request)?);
    Ok(())
}
