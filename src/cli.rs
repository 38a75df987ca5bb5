use clap::Parser;
use std::path::PathBuf;

/// File integrity tool comparing a scanned tree against stored snapshot databases
#[derive(Parser, Debug)]
#[command(name = "bundlecheck", version, about, long_about = None)]
pub struct Cli {
    /// Scan this file tree as the live side of the comparison
    #[arg(
        short,
        long,
        value_name = "PATH",
        conflicts_with = "load",
        required_unless_present = "load"
    )]
    pub scan: Option<PathBuf>,

    /// Load a previously stored snapshot as the live side instead of scanning
    #[arg(short, long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Ignore wildcard pattern for the live scan, e.g. '*.txt' (repeatable;
    /// supplying any pattern replaces the default)
    #[arg(
        short,
        long,
        value_name = "PATTERN",
        default_values = ["Contents/_MASReceipt/*"]
    )]
    pub ignore: Vec<String>,

    /// Database file pattern (repeatable); relative patterns resolve against
    /// the database directory
    #[arg(short = 'D', long, value_name = "PATTERN", default_values = ["*.json"])]
    pub db: Vec<String>,

    /// Compare the live side against the database (implied when --store is
    /// not given)
    #[arg(short, long)]
    pub compare: bool,

    /// Store the live snapshot to this file; a relative path resolves
    /// against the database directory
    #[arg(
        short = 'S',
        long,
        value_name = "FILE",
        requires = "scan",
        requires = "description",
        conflicts_with = "load"
    )]
    pub store: Option<PathBuf>,

    /// Description for a stored snapshot
    #[arg(short, long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Show per-entry discrepancy detail; repeat for debug logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_parse(args: &[&str]) -> Result<Cli, clap::Error> {
        <Cli as Parser>::try_parse_from(args)
    }

    #[test]
    fn test_scan_alone_is_valid() {
        let cli = try_parse(&["bundlecheck", "--scan", "/some/app"]).unwrap();

        assert_eq!(cli.scan, Some(PathBuf::from("/some/app")));
        assert!(!cli.compare);
    }

    #[test]
    fn test_scan_and_load_are_mutually_exclusive() {
        let result = try_parse(&["bundlecheck", "--scan", "/a", "--load", "snap.json"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_one_of_scan_or_load_is_required() {
        let result = try_parse(&["bundlecheck", "--compare"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_store_requires_scan() {
        let result = try_parse(&[
            "bundlecheck",
            "--load",
            "snap.json",
            "--store",
            "out.json",
            "--description",
            "d",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_store_requires_description() {
        let result = try_parse(&["bundlecheck", "--scan", "/a", "--store", "out.json"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_store_with_scan_and_description_is_valid() {
        let cli = try_parse(&[
            "bundlecheck",
            "--scan",
            "/a",
            "--store",
            "out.json",
            "--description",
            "My App 1.0",
        ])
        .unwrap();

        assert_eq!(cli.store, Some(PathBuf::from("out.json")));
        assert_eq!(cli.description, Some("My App 1.0".to_string()));
    }

    #[test]
    fn test_default_ignore_pattern() {
        let cli = try_parse(&["bundlecheck", "--scan", "/a"]).unwrap();

        assert_eq!(cli.ignore, vec!["Contents/_MASReceipt/*".to_string()]);
    }

    #[test]
    fn test_user_ignore_patterns_replace_default() {
        let cli = try_parse(&[
            "bundlecheck",
            "--scan",
            "/a",
            "--ignore",
            "*.log",
            "--ignore",
            "tmp/*",
        ])
        .unwrap();

        assert_eq!(cli.ignore, vec!["*.log".to_string(), "tmp/*".to_string()]);
    }

    #[test]
    fn test_default_db_pattern() {
        let cli = try_parse(&["bundlecheck", "--scan", "/a"]).unwrap();

        assert_eq!(cli.db, vec!["*.json".to_string()]);
    }

    #[test]
    fn test_verbose_is_counted() {
        let cli = try_parse(&["bundlecheck", "--scan", "/a", "-vv"]).unwrap();

        assert_eq!(cli.verbose, 2);
    }
}
