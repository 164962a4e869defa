//! Application-wide constants and configuration values
//!
//! This module centralizes all magic numbers and configuration constants
//! to improve maintainability and make the codebase more configurable.

#![allow(dead_code)]

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 100;

/// User-Agent header sent with every page request. The statistics site serves a
/// reduced page (tables wrapped in HTML comments, or nothing at all) to clients
/// that identify as bots, so requests present a regular browser signature.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Default delay between consecutive table fetches in milliseconds
pub const DEFAULT_POLITENESS_DELAY_MS: u64 = 1500;

/// Upper bound of the random jitter added to the politeness delay (milliseconds)
pub const POLITENESS_JITTER_MS: u64 = 500;

/// Sentinel written wherever a statistic has no value
pub const NOT_AVAILABLE: &str = "N/a";

/// Delimiter between a colliding column name and the owning table's name,
/// e.g. `goals__shooting`
pub const SUFFIX_DELIMITER: &str = "__";

/// Minimum minutes played for a row to survive the minutes gate
pub const DEFAULT_MIN_MINUTES: u32 = 90;

/// Minutes floor for the transfer-value join (strictly greater than)
pub const DEFAULT_TRANSFER_MIN_MINUTES: f64 = 900.0;

/// Identity columns, in the order they lead every exported table
pub const IDENTITY_COLUMNS: [&str; 5] = ["Player", "Team", "Nation", "Position", "Age"];

/// Age bounds used when deciding whether a number can be a literal age.
/// Both bounds are exclusive.
pub mod age {
    pub const MIN_EXCLUSIVE: i64 = 14;
    pub const MAX_EXCLUSIVE: i64 = 50;

    /// Oldest birth year accepted when deriving an age (exclusive)
    pub const MIN_BIRTH_YEAR_EXCLUSIVE: i64 = 1900;
}

/// Fraction of values in a column that must parse as numbers for the column
/// to participate in summary statistics
pub const NUMERIC_COLUMN_RATIO: f64 = 0.1;

/// Default output locations
pub mod output {
    /// Exported wide statistics table
    pub const RESULT_FILE: &str = "result.csv";

    /// Plain-text top/bottom 3 report
    pub const TOP_BOTTOM_FILE: &str = "top_3.txt";

    /// Per-team summary statistics table
    pub const SUMMARY_FILE: &str = "results2.csv";

    /// Transfer-value join output
    pub const TRANSFERS_FILE: &str = "transfers_over_minutes.csv";
}

/// Default source site coordinates
pub mod source {
    /// Domain the statistics tables are fetched from
    pub const DOMAIN: &str = "https://fbref.com";

    /// Competition path segment, e.g. `en/comps/9` for the Premier League
    pub const COMPETITION_PATH: &str = "en/comps/9";

    /// Trailing page slug shared by every table URL
    pub const COMPETITION_SLUG: &str = "Premier-League-Stats";
}

/// Retry behavior for transient HTTP failures
pub mod retry {
    /// Maximum number of retries for a single page fetch
    pub const MAX_RETRIES: u32 = 3;

    /// Initial backoff delay in milliseconds; doubled on each retry
    pub const INITIAL_BACKOFF_MS: u64 = 250;
}
