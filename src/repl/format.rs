//! Rendering of execution records into the message the model sees next.

use crate::types::{Execution, ExecutionError};

/// Stand-in for a chart; image data never goes back to the model.
pub const CHART_PLACEHOLDER: &str = "*A chart was produced by the code*";

/// Report for a block that ran to completion.
pub fn format_success(index: usize, execution: &Execution) -> String {
    let logs = execution.logs.stdout.join("\n");
    let text = execution.text();
    let charts = vec![CHART_PLACEHOLDER; execution.chart_count()].join("\n");
    format!(
        "Result of block {}:\n```\n{} {} {}\n```",
        index, logs, text, charts
    )
}

/// Report for a block that raised.
pub fn format_failure(index: usize, error: &ExecutionError) -> String {
    format!(
        "Execution of block {} raised an error:\n```\n{}\n```\nFix the error.",
        index, error.traceback
    )
}

/// Report for one block, whichever way it went.
pub fn format_execution(index: usize, execution: &Execution) -> String {
    match &execution.error {
        Some(error) => format_failure(index, error),
        None => format_success(index, execution),
    }
}

/// One message covering every executed block, in order.
pub fn format_report(executions: &[Execution]) -> String {
    executions
        .iter()
        .enumerate()
        .map(|(i, e)| format_execution(i, e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chart, ExecutionArtifact};

    #[test]
    fn test_success_layout() {
        let execution = Execution::success(["a", "b"])
            .with_result(ExecutionArtifact::text("42"))
            .with_result(ExecutionArtifact::chart(Chart::default()));
        assert_eq!(
            format_success(0, &execution),
            "Result of block 0:\n```\na\nb 42 *A chart was produced by the code*\n```"
        );
    }

    #[test]
    fn test_success_with_nothing_to_show() {
        assert_eq!(
            format_success(3, &Execution::default()),
            "Result of block 3:\n```\n  \n```"
        );
    }

    #[test]
    fn test_failure_layout() {
        let error = ExecutionError::new("NameError", "name 'y' is not defined", "Traceback...");
        assert_eq!(
            format_failure(1, &error),
            "Execution of block 1 raised an error:\n```\nTraceback...\n```\nFix the error."
        );
    }

    #[test]
    fn test_report_joins_blocks() {
        let report = format_report(&[
            Execution::success(["ok"]),
            Execution::failure(ExecutionError::new("E", "v", "tb")),
        ]);
        assert!(report.starts_with("Result of block 0:"));
        assert!(report.contains("```\nExecution of block 1 raised an error:"));
    }
}
