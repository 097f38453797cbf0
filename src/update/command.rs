//! Running a single pipeline command.
use std::path::Path;

use super::Context;
use crate::error::{CommandError, escape_output};
use crate::substitute::Variables;

/// Output returned for every command in dry-run mode.
pub const DRY_RUN_OUTPUT: &str = "***DRY RUN***";

/// Space-join the tokens of a command for display.
#[must_use]
pub fn display_command(tokens: &[String]) -> String {
    tokens.join(" ")
}

/// Run one command for `label` in `dir`.
///
/// Every token is placeholder-expanded first, with `label` as
/// `{{app.name}}` and `dir` as `{{app.path}}`. In dry-run mode the command
/// is only logged and [`DRY_RUN_OUTPUT`] is returned. An empty command does
/// nothing and returns empty output. An empty `dir` inherits the current
/// working directory.
///
/// # Errors
///
/// Returns a [`CommandError`] carrying the captured output when the
/// process cannot be launched or exits non-zero.
pub fn execute(
    ctx: &Context,
    command: &[String],
    dir: &str,
    label: &str,
) -> Result<String, CommandError> {
    let vars = Variables::new(label, dir, &ctx.home);
    let tokens = vars.substitute_all(command);
    let Some((program, args)) = tokens.split_first() else {
        ctx.log.debug(&format!("[{label}] empty command, nothing to run"));
        return Ok(String::new());
    };
    let line = display_command(&tokens);

    if ctx.dry_run() {
        ctx.log.dry_run(&format!("[{label}] [path={dir}] {line}"));
        return Ok(DRY_RUN_OUTPUT.to_string());
    }

    match ctx.executor.run(program, args, Path::new(dir)) {
        Ok(result) if result.success => {
            ctx.log.debug(&format!(
                "[{label}] [{line}] [path={dir}]: {}",
                escape_output(&result.output)
            ));
            Ok(result.output)
        }
        Ok(result) => Err(CommandError {
            program: program.clone(),
            args: display_command(args),
            reason: result.status_description(),
            output: result.output,
        }),
        Err(e) => Err(CommandError {
            program: program.clone(),
            args: display_command(args),
            reason: e.to_string(),
            output: String::new(),
        }),
    }
}
