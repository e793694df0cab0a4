//! Analytics schema
//!
//! `event_id` columns have no FOREIGN KEY clause; the relation to
//! `app_events` is soft. They are indexed for the event → metrics lookups.

pub(super) const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS app_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_type TEXT NOT NULL,
        timestamp INTEGER NOT NULL,
        url TEXT NOT NULL,
        domain TEXT NOT NULL,
        referrer TEXT,
        user_agent TEXT NOT NULL,
        language TEXT NOT NULL,
        screen_width INTEGER NOT NULL,
        screen_height INTEGER NOT NULL,
        viewport_width INTEGER NOT NULL,
        viewport_height INTEGER NOT NULL,
        ip_address TEXT NOT NULL,
        country TEXT,
        region TEXT,
        city TEXT,
        timezone TEXT,
        session_id TEXT NOT NULL,
        user_id TEXT,
        device_type TEXT,
        browser TEXT,
        operating_system TEXT,
        is_bot INTEGER,
        metadata TEXT,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_app_events_session ON app_events (session_id)",
    "CREATE INDEX IF NOT EXISTS idx_app_events_type ON app_events (event_type)",
    "CREATE INDEX IF NOT EXISTS idx_app_events_timestamp ON app_events (timestamp)",
    "CREATE TABLE IF NOT EXISTS app_performance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id TEXT NOT NULL,
        event_id INTEGER,
        metric_type TEXT NOT NULL,
        timestamp INTEGER NOT NULL,
        url TEXT NOT NULL,
        details TEXT NOT NULL,
        metadata TEXT,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_app_performance_session ON app_performance (session_id)",
    "CREATE INDEX IF NOT EXISTS idx_app_performance_event ON app_performance (event_id)",
    "CREATE INDEX IF NOT EXISTS idx_app_performance_timestamp ON app_performance (timestamp)",
    "CREATE TABLE IF NOT EXISTS app_usage (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id TEXT NOT NULL,
        event_id INTEGER,
        action_type TEXT NOT NULL,
        timestamp INTEGER NOT NULL,
        url TEXT NOT NULL,
        details TEXT NOT NULL,
        metadata TEXT,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_app_usage_session ON app_usage (session_id)",
    "CREATE INDEX IF NOT EXISTS idx_app_usage_event ON app_usage (event_id)",
    "CREATE INDEX IF NOT EXISTS idx_app_usage_timestamp ON app_usage (timestamp)",
];
