use std::fmt;

/// A file that could not be relocated, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeError {
    pub file_name: String,
    pub message: String,
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.message)
    }
}

/// What happened during one run, in visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// New names of the files relocated into dated buckets.
    pub processed: Vec<String>,
    pub errors: Vec<IntakeError>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&mut self, new_name: String) {
        self.processed.push(new_name);
    }

    pub fn record_error(&mut self, file_name: String, message: String) {
        self.errors.push(IntakeError { file_name, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IntakeError {
            file_name: "report.csv".to_string(),
            message: "Permission denied (os error 13)".to_string(),
        };
        assert_eq!(err.to_string(), "report.csv: Permission denied (os error 13)");
    }

    #[test]
    fn test_records_keep_order() {
        let mut summary = RunSummary::new();
        summary.record_processed("140530_b.txt".to_string());
        summary.record_error("c.txt".to_string(), "boom".to_string());
        summary.record_processed("140531_a.txt".to_string());
        assert_eq!(summary.processed, ["140530_b.txt", "140531_a.txt"]);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].to_string(), "c.txt: boom");
    }
}
