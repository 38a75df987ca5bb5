use crate::compare::ReferenceReport;

/// Prints per-reference comparison results to stdout, worst match first.
pub fn print_reports(reports: &[ReferenceReport], verbose: bool) {
    for report in reports {
        for line in format_report_lines(report, verbose) {
            println!("{}", line);
        }
    }
}

fn format_report_lines(report: &ReferenceReport, verbose: bool) -> Vec<String> {
    let description = report.description.as_deref().unwrap_or("(no description)");

    let mut lines = vec![format!("Results for {} ({}):", description, report.key)];

    if report.discrepancies.is_empty() {
        lines.push("  perfect match".to_string());
    } else if verbose {
        lines.push(format!("  {} files are different", report.discrepancies.len()));
        for discrepancy in &report.discrepancies {
            lines.push(format!("  {}", discrepancy));
        }
    } else {
        lines.push(format!(
            "  {} files are different. use --verbose to see details",
            report.discrepancies.len()
        ));
    }

    lines
}
