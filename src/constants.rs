pub mod cache {
    use std::time::Duration;

    pub const SEARCH_TTL_SECONDS: u64 = 600;

    pub const OPERATION_TIMEOUT_MS: u64 = 250;

    /// One year.
    pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

    pub const MEMORY_MAX_ENTRIES: u64 = 10_000;

    #[must_use]
    pub const fn max_ttl() -> Duration {
        Duration::from_secs(MAX_TTL_SECONDS)
    }
}

pub mod limits {

    pub const DEFAULT_LISTING_LIMIT: u64 = 20;

    pub const MAX_TITLE_LENGTH: usize = 200;

    pub const MAX_NAME_LENGTH: usize = 100;
}
