//! Operation report summaries

use s3b_core::{Operation, Report};

fn verb(operation: Operation) -> &'static str {
    match operation {
        Operation::Upload => "uploaded",
        Operation::Download => "downloaded",
        Operation::Mkdir => "created",
        Operation::Delete | Operation::DeleteDirectory => "deleted",
    }
}

/// One-line summary of what succeeded, or `None` when nothing did
pub fn summarize(report: &Report) -> Option<String> {
    if report.cancelled || report.succeeded.is_empty() {
        return None;
    }
    let verb = verb(report.operation);
    let message = match (report.operation, report.succeeded.as_slice()) {
        (Operation::DeleteDirectory, _) => format!("{verb} {} files", report.counted),
        (_, [single]) => format!("{verb} {single}"),
        _ => format!("{verb} {} files", report.counted),
    };
    Some(message)
}

/// One line per failed item
pub fn failure_lines(report: &Report) -> Vec<String> {
    report
        .failed
        .iter()
        .map(|f| format!("{}: {}", f.target, f.error))
        .collect()
}
