use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the outcome of a validation (possibly aggregating other outcomes)
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TestResult {
    /// Indicates that all checks passed
    pub success: bool,

    /// Describes the outcome
    pub message: String,

    /// Holds the aggregated outcomes
    pub children: Vec<TestResult>,
}

impl TestResult {
    /// Allocates a new instance without children
    pub fn new(success: bool, message: &str) -> Self {
        TestResult {
            success,
            message: message.to_string(),
            children: Vec::new(),
        }
    }

    /// Aggregates outcomes; the result is successful if all children are successful
    pub fn aggregate(message: &str, children: Vec<TestResult>) -> Self {
        TestResult {
            success: children.iter().all(|c| c.success),
            message: message.to_string(),
            children,
        }
    }

    /// Appends an outcome and updates the success flag
    pub fn append(&mut self, child: TestResult) {
        self.success = self.success && child.success;
        self.children.push(child);
    }

    /// Returns the messages of all failed outcomes (depth-first)
    pub fn failures(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if !self.success && self.children.is_empty() {
            messages.push(self.message.clone());
        }
        for child in &self.children {
            messages.extend(child.failures());
        }
        messages
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mrk = if self.success { "✅" } else { "❌" };
        write!(f, "{} {}\n", mrk, self.message)?;
        for child in &self.children {
            let mrk = if child.success { "✅" } else { "❌" };
            write!(f, "    {} {}\n", mrk, child.message)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::TestResult;

    #[test]
    fn aggregate_works() {
        let ok = TestResult::new(true, "SXX matches");
        let bad = TestResult::new(false, "SYY differs at row 3");
        let all = TestResult::aggregate("validators", vec![ok.clone()]);
        assert!(all.success);
        let mut all = TestResult::aggregate("validators", vec![ok, bad]);
        assert!(!all.success);
        assert_eq!(all.failures(), &["SYY differs at row 3"]);
        all.append(TestResult::new(true, "EXX matches"));
        assert!(!all.success);
        assert_eq!(all.children.len(), 3);
        assert_eq!(
            format!("{}", all),
            "❌ validators\n    ✅ SXX matches\n    ❌ SYY differs at row 3\n    ✅ EXX matches\n"
        );
        let empty = TestResult::aggregate("nothing", Vec::new());
        assert!(empty.success);
    }
}
