//! `s1cli version`

use std::fmt::Write;

use crate::cli::VersionArgs;

/// Width of the verbose report frame.
const FRAME_WIDTH: usize = 75;

/// Build and release information compiled into the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub title: &'static str,
    pub short_title: &'static str,
    pub version: &'static str,
    /// Abbreviated commit hash
    pub build: String,
    pub code_name: &'static str,
    pub is_developer_build: bool,
}

impl ProductInfo {
    /// Information about the running binary.
    pub fn current() -> Self {
        Self::new(
            env!("CARGO_PKG_VERSION"),
            option_env!("S1CLI_COMMIT").unwrap_or("unknown"),
            option_env!("S1CLI_CODENAME").unwrap_or("unnamed"),
            cfg!(debug_assertions),
        )
    }

    fn new(
        version: &'static str,
        commit: &str,
        code_name: &'static str,
        is_developer_build: bool,
    ) -> Self {
        Self {
            title: "SentinelOne API Client",
            short_title: "S1 API Client",
            version,
            build: commit.chars().take(8).collect(),
            code_name,
            is_developer_build,
        }
    }

    /// One-line version and build.
    pub fn summary(&self) -> String {
        let mut line = format!("{} build {} ({})", self.version, self.build, self.code_name);
        if self.is_developer_build {
            line.push_str(" [Developer Build]");
        }
        line
    }

    /// Framed multi-line report.
    pub fn report(&self) -> String {
        let title = format!("{} Version Information", self.title);
        let rule = "=".repeat(FRAME_WIDTH);
        let inner = FRAME_WIDTH - 2;

        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "|{:^inner$}|", title, inner = inner);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "{:>30} : {} build {}",
            format!("{} CLI version", self.short_title),
            self.version,
            self.build
        );
        let _ = writeln!(out, "{:>30} : {}", "Code Name", self.code_name);
        let _ = writeln!(out, "{:>30} : {}", "Developer Build", self.is_developer_build);
        out
    }
}

/// Render the requested version output.
pub fn render(args: &VersionArgs, info: &ProductInfo) -> String {
    if args.short {
        info.version.to_string()
    } else if args.verbose {
        info.report()
    } else {
        info.summary()
    }
}

/// Print version information to stdout.
pub fn run(args: &VersionArgs) {
    println!("{}", render(args, &ProductInfo::current()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(developer: bool) -> ProductInfo {
        ProductInfo::new("1.2.3", "0123456789abcdef", "Falcon", developer)
    }

    #[test]
    fn test_short_output() {
        let args = VersionArgs {
            short: true,
            verbose: false,
        };
        assert_eq!(render(&args, &info(false)), "1.2.3");
    }

    #[test]
    fn test_summary_output() {
        assert_eq!(info(false).summary(), "1.2.3 build 01234567 (Falcon)");
        assert_eq!(
            info(true).summary(),
            "1.2.3 build 01234567 (Falcon) [Developer Build]"
        );
    }

    #[test]
    fn test_verbose_report() {
        let args = VersionArgs {
            short: false,
            verbose: true,
        };
        let report = render(&args, &info(true));

        assert!(report.contains("SentinelOne API Client Version Information"));
        assert!(report.contains("S1 API Client CLI version : 1.2.3 build 01234567"));
        assert!(report.contains("Code Name : Falcon"));
        assert!(report.contains("Developer Build : true"));
        assert!(report
            .lines()
            .filter(|line| line.starts_with('|'))
            .all(|line| line.chars().count() == FRAME_WIDTH));
    }

    #[test]
    fn test_current_uses_package_version() {
        assert_eq!(ProductInfo::current().version, env!("CARGO_PKG_VERSION"));
    }
}
