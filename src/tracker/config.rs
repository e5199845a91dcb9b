pub mod api {
    pub const CATALOG_URL: &str = "https://codeforces.com/api/problemset.problems";
    pub const FALLBACK_CATALOG_URL: &str = "https://mirror.codeforces.com/api/problemset.problems";
    pub const STATUS_URL: &str = "https://codeforces.com/api/user.status";
    pub const INFO_URL: &str = "https://codeforces.com/api/user.info";
    pub const PROBLEM_URL: &str = "https://codeforces.com";
}
pub mod fetch {
    use std::time::Duration;
    pub const PAGE_SIZE: usize = 1000;
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
}
pub mod cache {
    use std::time::Duration;
    pub const CATALOG_TTL: Duration = Duration::from_secs(60 * 60);
    pub const CATALOG_KEY: &str = "cf_problems_cache_v1";
    pub const TAG_COUNTS_KEY: &str = "cf_tag_counts_v1";
    pub const HANDLE_KEY: &str = "cf_user_handle_v1";
    pub const USER_INFO_KEY: &str = "cf_user_info_v1";
    pub const SOLVED_KEY: &str = "cf_user_solved_v1";
}
