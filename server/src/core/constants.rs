// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "FlightLens";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "flightlens";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".flightlens";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "flightlens.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FLIGHTLENS_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "FLIGHTLENS_DEBUG";

/// Environment variable for server host
pub const ENV_HOST: &str = "FLIGHTLENS_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "FLIGHTLENS_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FLIGHTLENS_LOG";

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "FLIGHTLENS_DATA_DIR";

/// Environment variable for the session token signing secret
pub const ENV_SESSION_SECRET: &str = "FLIGHTLENS_SESSION_SECRET";

/// Environment variable to force the Secure attribute on the session cookie
pub const ENV_COOKIE_SECURE: &str = "FLIGHTLENS_COOKIE_SECURE";

/// Environment variable for the delay-prediction endpoint URL
pub const ENV_PREDICTION_URL: &str = "FLIGHTLENS_PREDICTION_URL";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5170;

// =============================================================================
// Authentication
// =============================================================================

/// Cookie name for the session token
pub const SESSION_COOKIE_NAME: &str = "flightlens_session";

/// Session token lifetime in seconds (1 hour)
pub const SESSION_TTL_SECS: i64 = 3600;

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "flightlens.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for general API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for auth endpoints (64 KB)
pub const AUTH_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Prediction Proxy
// =============================================================================

/// Default timeout for upstream prediction calls in seconds
pub const PREDICTION_DEFAULT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
