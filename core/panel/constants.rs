


pub const APP_NAME: &str = "Backoffice";


/* ------------------------- client facing messages ------------------------- */
pub static UNAUTHORIZED: &str = "Unauthorized";
pub static NO_TOKEN_PROVIDED: &str = "No token provided";
pub static TOKEN_EXPIRED: &str = "Token expired";
pub static INVALID_TOKEN: &str = "Invalid token";
pub static INVALID_CREDENTIALS: &str = "Invalid credentials";
pub static CREDENTIALS_REQUIRED: &str = "Username and password are required";
pub static INVALID_BODY: &str = "Invalid request body";
pub static MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
pub static INVALID_STATUS: &str = "Invalid status";
pub static WITHDRAWAL_UPDATED: &str = "Withdrawal updated";
pub static WITHDRAWAL_NOT_FOUND: &str = "Withdrawal not found";
pub static METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub static ROUTE_NOT_FOUND: &str = "Not found";
pub static DB_CONFIG_ERROR: &str = "Database configuration error";
pub static EXPORT_NOT_AVAILABLE: &str = "Export not available";
pub static INTERNAL_SERVER_ERROR: &str = "Internal server error";


/* ------------------------------ wire headers ------------------------------ */
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const MAX_AGE: &str = "Access-Control-Max-Age";
pub const ALLOWED_REQUEST_HEADERS: &str = "Content-Type, X-Auth-Token";
pub const PREFLIGHT_MAX_AGE: &str = "86400";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";


/* ------------------------------- passport -------------------------------- */
pub const DEFAULT_JWT_SECRET: &str = "default-secret-key-change-in-production";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;


/* -------------------------------- reports -------------------------------- */
pub const TREND_WINDOW_MONTHS: u32 = 6;
pub const TOP_USERS_LIMIT: i64 = 10;
pub const MONEY_SCALE: i64 = 2;


/* ------------------------------- defaults -------------------------------- */
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PANEL_PORT: u16 = 7442;
pub const DEFAULT_DB_POOL_SIZE: u32 = 10;
