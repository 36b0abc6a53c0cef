/// PBKDF2-HMAC-SHA256 iteration count for new password hashes
pub const PASSWORD_ITERATIONS: u32 = 65_536;

/// Random salt size in bytes
pub const PASSWORD_SALT_LEN: usize = 16;

/// Derived key size in bytes (256 bits)
pub const PASSWORD_KEY_LEN: usize = 32;

/// Highest iteration count accepted from a stored credential
pub const PASSWORD_MAX_ITERATIONS: u32 = 1_000_000;

/// Longest stored hash accepted, in bytes
pub const PASSWORD_MAX_KEY_LEN: usize = 64;

/// Session key holding the authenticated user id
pub const SESSION_KEY_CURRENT_USER: &str = "current_user_id";

/// Sentinel stored under `SESSION_KEY_CURRENT_USER` when nobody is logged in
pub const NO_SESSION_USER_ID: i64 = -1;

/// Added to third-party catalog ids so they never collide with our own
pub const EXTERNAL_PRODUCT_ID_OFFSET: i64 = 10_000;

/// Default backend base URL (Android emulator loopback)
pub const DEFAULT_API_BASE_URL: &str = "http://10.0.2.2:8080/";

/// Default third-party catalog base URL
pub const DEFAULT_EXTERNAL_CATALOG_URL: &str = "https://dummyjson.com/";

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// How many third-party products are mixed into the catalog
pub const DEFAULT_EXTERNAL_CATALOG_LIMIT: usize = 10;

/// Demo account seeded into an empty users table
pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_EMAIL: &str = "demo@example.com";
pub const DEMO_USER_PASSWORD: &str = "demo123";
