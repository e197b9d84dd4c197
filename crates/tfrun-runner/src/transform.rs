//! Maps raw state outputs into the caller's string-valued output contract.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use tfrun_core::{Output, OutputSet, WorkspaceId};

use crate::error::RunnerError;

/// One output as the caller sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallerOutput {
    /// Name after renaming.
    pub name: String,

    /// String values pass through; everything else is JSON text.
    pub value: String,

    /// The untouched value from the snapshot.
    pub raw: Value,

    /// Whether the caller must redact `value`.
    pub sensitive: bool,
}

/// Outputs of one snapshot, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallerOutputs {
    entries: Vec<CallerOutput>,
}

impl CallerOutputs {
    /// Caller-facing value of an output.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|o| o.value.as_str())
    }

    /// Returns true if the named output is marked for redaction.
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.find(name).is_some_and(|o| o.sensitive)
    }

    /// Names of every output marked for redaction.
    pub fn sensitive_names(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .filter(|o| o.sensitive)
            .map(|o| o.name.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CallerOutput> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All outputs as a single JSON object of name to raw value.
    pub fn to_workspace_outputs_json(&self) -> String {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|o| (o.name.clone(), o.raw.clone()))
            .collect();
        Value::Object(object).to_string()
    }

    fn find(&self, name: &str) -> Option<&CallerOutput> {
        self.entries.iter().find(|o| o.name == name)
    }
}

impl<'a> IntoIterator for &'a CallerOutputs {
    type Item = &'a CallerOutput;
    type IntoIter = std::slice::Iter<'a, CallerOutput>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Output transformation rules.
#[derive(Debug, Clone, Default)]
pub struct OutputTransformer {
    renames: Vec<(String, String)>,
}

impl OutputTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to expose output `from` under the name `to`.
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.push((from.into(), to.into()));
        self
    }

    /// Transform the outputs of `workspace_id`'s current snapshot.
    ///
    /// An empty set is an error: a workspace with nothing to report after an
    /// apply is almost always misconfigured.
    pub fn transform(
        &self,
        workspace_id: &WorkspaceId,
        outputs: OutputSet,
    ) -> Result<CallerOutputs, RunnerError> {
        if outputs.is_empty() {
            return Err(RunnerError::OutputsUnavailable {
                workspace_id: workspace_id.clone(),
            });
        }

        let entries = outputs.into_iter().map(|o| self.map_output(o)).collect();
        Ok(CallerOutputs { entries })
    }

    fn map_output(&self, output: Output) -> CallerOutput {
        let name = self
            .renames
            .iter()
            .find(|(from, _)| *from == output.name)
            .map(|(_, to)| to.clone())
            .unwrap_or(output.name);

        let value = match &output.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        CallerOutput {
            name,
            value,
            raw: output.value,
            sensitive: output.sensitive,
        }
    }
}
