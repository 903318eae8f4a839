//! Prints the OpenAPI document to stdout: `cargo run --bin openapi_export > openapi.json`

use anyhow::{Context, Result};
use error_advice::api::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    let json = serde_json::to_string_pretty(&ApiDoc::openapi())
        .context("Failed to serialize OpenAPI spec to JSON")?;
    println!("{json}");
    Ok(())
}
