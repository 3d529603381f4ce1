//! Explain command handler

use super::utils::{load_schema, registry_for};
use crate::cli::ExplainArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::{OutputWriter, SlotReport};
use argbind_core::Schema;
use tracing::{info, instrument};

/// Handle the explain command
#[instrument(skip(config, output), fields(schema = %args.schema.display()))]
pub fn handle_explain(args: ExplainArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("explain_command", &format!("schema: {}", args.schema.display()));

    let (document, classes) = load_schema(&args.schema)?;
    let registry = registry_for(config, &classes)?;
    let schema = Schema::from_json(&document, &registry)?;
    info!(slots = schema.len(), "compiled schema");

    output.section(&format!("Schema: {}", args.schema.display()))?;
    output.slots(&SlotReport::from_schema(&schema))?;

    match schema.spread_slot() {
        Some(slot) => output.info(&format!("Spread slot: {}", slot.label()))?,
        None if schema.is_empty() => output.info("Schema is empty; every argument list matches")?,
        None => {}
    }

    Ok(())
}
