//! Emits results in the `key=value` step-output format.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use tfrun_runner::{ActionResult, CallerOutput, CallerOutputs};

const RUN_ID_KEY: &str = "run-id";
const WORKSPACE_OUTPUTS_KEY: &str = "workspace-outputs";
const MULTILINE_DELIMITER: &str = "__TFRUN_EOF__";

/// Write one output. Multi-line values use the heredoc form.
pub fn write_output<W: Write>(w: &mut W, key: &str, value: &str) -> io::Result<()> {
    if value.contains('\n') {
        let delimiter = heredoc_delimiter(value);
        writeln!(w, "{key}<<{delimiter}")?;
        writeln!(w, "{value}")?;
        writeln!(w, "{delimiter}")
    } else {
        writeln!(w, "{key}={value}")
    }
}

/// A heredoc delimiter that does not occur anywhere in `value`.
fn heredoc_delimiter(value: &str) -> String {
    let mut delimiter = MULTILINE_DELIMITER.to_string();
    let mut suffix = 0u32;
    while value.contains(delimiter.as_str()) {
        suffix += 1;
        delimiter = format!("{MULTILINE_DELIMITER}{suffix}");
    }
    delimiter
}

/// Write a mask command for every line of every sensitive value, so the CI
/// log scrubs them before any value is printed.
///
/// String values are also masked in their JSON-escaped form, which is how
/// they appear inside the combined `workspace-outputs` object.
pub fn write_masks<W: Write>(w: &mut W, outputs: &CallerOutputs) -> io::Result<()> {
    for output in outputs.iter().filter(|o| o.sensitive) {
        for line in output.value.lines().filter(|l| !l.is_empty()) {
            writeln!(w, "::add-mask::{line}")?;
        }
        if let Some(escaped) = json_escaped(output)? {
            writeln!(w, "::add-mask::{escaped}")?;
        }
    }
    Ok(())
}

/// The JSON-escaped form of a string output, when it differs from the value.
fn json_escaped(output: &CallerOutput) -> io::Result<Option<String>> {
    if !matches!(output.raw, Value::String(_)) {
        // Non-string values are already emitted as their JSON text.
        return Ok(None);
    }

    let encoded = serde_json::to_string(&output.raw)?;
    let escaped = &encoded[1..encoded.len() - 1];
    if escaped == output.value || escaped.is_empty() {
        Ok(None)
    } else {
        Ok(Some(escaped.to_string()))
    }
}

/// Write the run id, the combined outputs object, and one entry per output.
pub fn write_result<W: Write>(w: &mut W, result: &ActionResult) -> io::Result<()> {
    let run_id = result.run_id.as_ref().map(|id| id.as_str()).unwrap_or("");
    write_output(w, RUN_ID_KEY, run_id)?;

    if let Some(outputs) = &result.outputs {
        write_output(w, WORKSPACE_OUTPUTS_KEY, &outputs.to_workspace_outputs_json())?;
        for output in outputs {
            write_output(w, &output.name, &output.value)?;
        }
    }
    Ok(())
}

/// Emit `result`: masks always go to stdout, outputs to `file` when given.
pub fn emit(result: &ActionResult, file: Option<&Path>) -> io::Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    if let Some(outputs) = &result.outputs {
        write_masks(&mut stdout, outputs)?;
    }

    match file {
        Some(path) => {
            let mut f = OpenOptions::new().create(true).append(true).open(path)?;
            write_result(&mut f, result)
        }
        None => write_result(&mut stdout, result),
    }
}
