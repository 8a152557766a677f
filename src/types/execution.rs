//! Sandbox execution records.
//!
//! An [`Execution`] is what the sandbox hands back for one code block. The
//! REPL only formats it into the next message and keeps the raw record as
//! message metadata.

use serde::{Deserialize, Serialize};

/// Captured output streams, one entry per line written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logs {
    #[serde(default)]
    pub stdout: Vec<String>,
    #[serde(default)]
    pub stderr: Vec<String>,
}

/// Descriptor of a chart produced during execution. Image data is never carried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    #[serde(rename = "type", default)]
    pub chart_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A rich result of a code block: the value of the trailing expression, a chart, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<Chart>,
}

impl ExecutionArtifact {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            chart: None,
        }
    }

    pub fn chart(chart: Chart) -> Self {
        Self {
            text: None,
            chart: Some(chart),
        }
    }

    pub fn is_chart(&self) -> bool {
        self.chart.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub name: String,
    pub value: String,
    pub traceback: String,
}

impl ExecutionError {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        traceback: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            traceback: traceback.into(),
        }
    }
}

/// Result of running one code block in the sandbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    #[serde(default)]
    pub logs: Logs,
    #[serde(default)]
    pub results: Vec<ExecutionArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
}

impl Execution {
    pub fn success(stdout: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            logs: Logs {
                stdout: stdout.into_iter().map(Into::into).collect(),
                stderr: Vec::new(),
            },
            results: Vec::new(),
            error: None,
        }
    }

    pub fn failure(error: ExecutionError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn with_result(mut self, artifact: ExecutionArtifact) -> Self {
        self.results.push(artifact);
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Textual result payloads joined by newlines.
    pub fn text(&self) -> String {
        self.results
            .iter()
            .filter_map(|r| r.text.as_deref())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn chart_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_chart()).count()
    }
}
