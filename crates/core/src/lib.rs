pub mod audit;
pub mod codec;
pub mod domain;
pub mod genre;
pub mod snapshot;

pub mod config {
    use anyhow::Context;

    /// Rows published per genre by the weekly charts.
    pub const DEFAULT_MAX_DEPTH: usize = 10;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ChartOptions {
        /// Chart depth bound; genres with more rows (or fewer) are flagged by the audit.
        pub max_depth: usize,

        /// Flag entries that outsell the entry ranked directly above them.
        pub check_sales_order: bool,
    }

    impl Default for ChartOptions {
        fn default() -> Self {
            Self {
                max_depth: DEFAULT_MAX_DEPTH,
                check_sales_order: true,
            }
        }
    }

    impl ChartOptions {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let mut out = Self::default();

            if let Some(s) = lookup("BOOKCHART_MAX_DEPTH").filter(|s| !s.trim().is_empty()) {
                out.max_depth = s
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("BOOKCHART_MAX_DEPTH must be an integer (got {s:?})"))?;
            }

            if let Some(s) = lookup("BOOKCHART_CHECK_SALES_ORDER").filter(|s| !s.trim().is_empty()) {
                out.check_sales_order = parse_flag(&s)
                    .with_context(|| format!("BOOKCHART_CHECK_SALES_ORDER must be a boolean (got {s:?})"))?;
            }

            anyhow::ensure!(out.max_depth >= 1, "BOOKCHART_MAX_DEPTH must be >= 1");
            Ok(out)
        }
    }

    fn parse_flag(s: &str) -> Option<bool> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }

}
