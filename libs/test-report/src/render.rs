//! Console rendering for ledgers.

use crate::ledger::{Ledger, Outcome};

/// ANSI escape sequences used by the report.
pub mod style {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Render the summary block for a ledger: total counts, then every failure
/// and skip with its label and reason, in recorded order.
pub fn format_summary(ledger: &Ledger) -> String {
    let summary = ledger.summary();
    let mut output = String::new();

    output.push_str(&format!(
        "\n{}Results:{} {}{} passed{}, {}{} failed{}, {}{} skipped{}\n",
        style::BOLD,
        style::RESET,
        style::GREEN,
        summary.passed,
        style::RESET,
        if summary.failed > 0 {
            style::RED
        } else {
            style::GREEN
        },
        summary.failed,
        style::RESET,
        style::YELLOW,
        summary.skipped,
        style::RESET,
    ));

    if summary.failed > 0 {
        output.push_str(&format!("\n{}Failures:{}\n", style::BOLD, style::RESET));
        for record in ledger.records() {
            if record.outcome == Outcome::Failed {
                output.push_str(&format!(
                    "  {}✗ {}{}: {}\n",
                    style::RED,
                    record.label,
                    style::RESET,
                    record.reason.as_deref().unwrap_or("(no reason recorded)"),
                ));
            }
        }
    }

    if summary.skipped > 0 {
        output.push_str(&format!("\n{}Skipped:{}\n", style::BOLD, style::RESET));
        for record in ledger.records() {
            if record.outcome == Outcome::Skipped {
                output.push_str(&format!(
                    "  {}⊘ {}{}: {}\n",
                    style::YELLOW,
                    record.label,
                    style::RESET,
                    record.reason.as_deref().unwrap_or("(no reason recorded)"),
                ));
            }
        }
    }

    output
}

pub fn print_summary(ledger: &Ledger) {
    print!("{}", format_summary(ledger));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_enumerates_failures_in_recorded_order() {
        let mut ledger = Ledger::new();
        ledger.record_fail("first", "reason one");
        ledger.record_pass("ok");
        ledger.record_fail("second", "reason two");

        let rendered = format_summary(&ledger);
        let first = rendered.find("first").expect("first failure listed");
        let second = rendered.find("second").expect("second failure listed");
        assert!(first < second);
        assert!(rendered.contains("reason one"));
        assert!(rendered.contains("reason two"));
    }

    #[test]
    fn summary_omits_failure_block_when_clean() {
        let mut ledger = Ledger::new();
        ledger.record_pass("ok");
        ledger.record_skip("maybe", "no data");

        let rendered = format_summary(&ledger);
        assert!(!rendered.contains("Failures:"));
        assert!(rendered.contains("Skipped:"));
        assert!(rendered.contains("no data"));
    }
}
