//! Check command handler

use super::utils::{load_case, registry_for};
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{create_operation_span, redaction, timing::Timer};
use crate::output::{MatchReport, OutputWriter};
use argbind_core::match_json;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Handle the check command
///
/// A result that fails to match is still written as a report before the
/// error is returned, so machine formats always carry an outcome.
#[instrument(skip(config, output), fields(case = %args.case.display()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("check_command", &format!("case: {}", args.case.display()));
    output.info(&format!("Checking case: {}", args.case.display()))?;

    let case = load_case(&args.case)?;
    let registry = registry_for(config, &case.classes)?;

    let arg_list: Value = match args.args {
        Some(inline) => serde_json::from_str(&inline)
            .map_err(|e| Error::invalid_args(format!("--args is not valid JSON: {}", e)))?,
        None => case.args.ok_or_else(|| {
            Error::invalid_args(format!(
                "{} has no `args` entry; pass --args",
                args.case.display()
            ))
        })?,
    };
    debug!(args = %redaction::redacted(&arg_list), "matching arguments");

    let result = {
        let span = create_operation_span("match", None);
        let _enter = span.enter();
        match_json(&arg_list, &case.schema, &registry)
    };

    match &result {
        Ok(bindings) => {
            info!(bindings = bindings.len(), "arguments matched");
            output.match_report(&MatchReport::from_result(&result))?;
            Ok(())
        }
        Err(e) => {
            let error = Error::from(e.clone());
            if !error.is_match_failure() {
                return Err(error);
            }
            warn!(kind = ?e.kind(), "arguments did not match");
            output.match_report(&MatchReport::from_result(&result))?;
            Err(error)
        }
    }
}
