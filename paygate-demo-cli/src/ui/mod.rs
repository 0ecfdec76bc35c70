//! Terminal rendering for gateway requests and responses

use colored::{ColoredString, Colorize};
use paygate_lib::params::SIGN;
use paygate_lib::{BusinessStatus, Params};

fn line(mark: ColoredString, message: &str) {
    println!("{} {}", mark, message);
}

/// Print a success message
pub fn success(message: &str) {
    line("✓".green().bold(), message);
}

/// Print an error message to stderr
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    line("ℹ".blue().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    line("⚠".yellow().bold(), message);
}

/// Print an operation title, tagged when talking to the sandbox
pub fn title(text: &str, sandbox: bool) {
    if sandbox {
        println!("\n{} {}", text.bold().underline(), "[sandbox]".magenta());
    } else {
        println!("\n{}", text.bold().underline());
    }
}

/// Print a single labelled value
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// Render the business tier outcome
pub fn business(status: &BusinessStatus) {
    match status {
        BusinessStatus::Success => success(&format!("result_code {}", "SUCCESS".green())),
        BusinessStatus::Failed {
            err_code,
            err_code_des,
        } => {
            let detail = failure_detail(err_code, err_code_des);
            line("✗".red().bold(), &format!("result_code {} {}", "FAIL".red(), detail));
        }
    }
}

fn failure_detail(err_code: &str, err_code_des: &str) -> String {
    match (err_code.is_empty(), err_code_des.is_empty()) {
        (true, true) => "(no error code)".to_string(),
        (false, true) => err_code.to_string(),
        (true, false) => err_code_des.to_string(),
        (false, false) => format!("{} ({})", err_code, err_code_des),
    }
}

/// Render whether the response signature was checked
pub fn signature(checked: bool) {
    if checked {
        line("🔒".normal(), "signature verified");
    } else {
        line("·".dimmed(), &"signature not checked for this operation".dimmed().to_string());
    }
}

/// Print response or request fields as an aligned table; `sign` is dimmed
pub fn fields(params: &Params) {
    println!("{}", "─".repeat(60).dimmed());
    let width = params.keys().map(str::len).max().unwrap_or(0);
    for (key, value) in params.iter() {
        if key == SIGN {
            println!("  {}  {}", format!("{:width$}", key).dimmed(), value.dimmed());
        } else {
            println!("  {}  {}", format!("{:width$}", key).cyan(), value);
        }
    }
}

/// Print JSON prettily
pub fn json(value: &serde_json::Value) {
    if let Ok(pretty) = serde_json::to_string_pretty(value) {
        println!("{}", pretty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_detail() {
        assert_eq!(
            failure_detail("ORDERPAID", "order already paid"),
            "ORDERPAID (order already paid)"
        );
        assert_eq!(failure_detail("NOTENOUGH", ""), "NOTENOUGH");
        assert_eq!(failure_detail("", "system busy"), "system busy");
        assert_eq!(failure_detail("", ""), "(no error code)");
    }
}
