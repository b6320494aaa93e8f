pub const DEFAULT_CONFIG_PATH: &str = "inkpost.toml";
pub const ADMIN_PASSWORD_VAR: &str = "INKPOST_ADMIN_PASSWORD";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3030";

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 5; // 5 megabytes
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
pub const UPLOADS_URL_PREFIX: &str = "/api/uploads";

pub const ADMIN_COOKIE: &str = "admin-auth";
pub const ADMIN_COOKIE_VALUE: &str = "authenticated";
pub const DEFAULT_SESSION_DAYS: i64 = 7;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_POSTS_PER_PAGE: i64 = 9;
pub const DEFAULT_HOME_POSTS: i64 = 6;

pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";
pub const MENU_ITEMS: &[(&str, &str)] = &[
    ("Posts", "/posts"),
    ("Categories", "/categories"),
    ("Tags", "/tags"),
    ("Search", "/search"),
];
