//! Human-readable recovery report.

use crate::suggestion::{Suggestion, SuggestionKind};

const RULE: &str = "------------------------------------------------------------";
const BANNER: &str = "============================================================";

/// Format suggestions as a display-ready report, terminations first.
///
/// Termination details are expanded for the first few entries only;
/// with many equal-size solutions the full traces get repetitive.
pub fn format_report(suggestions: &[Suggestion]) -> String {
    if suggestions.is_empty() {
        return "No recovery strategies needed (no deadlock detected).".to_string();
    }

    let mut out = Vec::new();
    out.push(BANNER.to_string());
    out.push("RECOVERY STRATEGIES".to_string());
    out.push(BANNER.to_string());
    out.push(String::new());

    let terminations: Vec<&Suggestion> = suggestions
        .iter()
        .filter(|s| s.kind == SuggestionKind::Terminate)
        .collect();
    let preemptions: Vec<&Suggestion> = suggestions
        .iter()
        .filter(|s| s.kind == SuggestionKind::Preempt)
        .collect();

    if !terminations.is_empty() {
        out.push("OPTION 1: Process Termination".to_string());
        out.push(RULE.to_string());
        out.push("Terminate processes to release their resources.".to_string());
        out.push(String::new());

        for (i, suggestion) in terminations.iter().enumerate() {
            out.push(format!("  {}. {}", i + 1, suggestion.description));
            if i < 3 {
                out.push(String::new());
                for line in suggestion.explanation.lines() {
                    out.push(format!("     {line}"));
                }
                out.push(String::new());
            }
        }
        out.push(String::new());
    }

    if !preemptions.is_empty() {
        out.push("OPTION 2: Resource Preemption".to_string());
        out.push(RULE.to_string());
        out.push("Preempt resources from processes (requires rollback).".to_string());
        out.push(String::new());

        for (i, suggestion) in preemptions.iter().enumerate() {
            out.push(format!("  {}. {}", i + 1, suggestion.description));
        }

        out.push(String::new());
        out.push("Note: preemption requires saving process state for a later restart.".to_string());
    }

    out.push(BANNER.to_string());
    out.join("\n")
}
