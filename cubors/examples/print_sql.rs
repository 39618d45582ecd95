use std::{env, fs, path::PathBuf};

use cubo::compiler::QueryCompiler;
use cubo::{CubeQuery, CuboConfig, Intent, SemanticCatalog};
use serde::Deserialize;

#[derive(Deserialize)]
struct RequestFile {
    intent: Intent,
    #[serde(flatten)]
    query: CubeQuery,
}

fn usage() {
    eprintln!("Usage: print_sql <catalog_dir> <request_json>");
    eprintln!("Example: cargo run --example print_sql -- demos/catalog demos/requests/rotacion.json");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    if args.len() < 2 {
        usage();
        std::process::exit(1);
    }

    let catalog_dir = PathBuf::from(args.remove(0));
    let request_path = PathBuf::from(args.remove(0));

    let catalog = SemanticCatalog::load_from_dir(catalog_dir)?;
    let request_str = fs::read_to_string(request_path)?;
    let request: RequestFile = serde_json::from_str(&request_str)?;

    let compiler = QueryCompiler;
    let sql = compiler.compile(
        &catalog,
        request.intent,
        &request.query,
        &CuboConfig::default(),
    )?;
    println!("{sql}");
    Ok(())
}
