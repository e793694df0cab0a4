//! Analytics session identity

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::utils::{current_timestamp_millis, millis_since};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 13;

/// Generate `session_<unix-millis>_<13 base36 chars>`
pub fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("session_{}_{}", current_timestamp_millis(), suffix)
}

/// Session id plus the session and page-view clocks
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    started_at: DateTime<Utc>,
    page_view_started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            started_at: now,
            page_view_started_at: now,
        }
    }

    /// Reuse the id stored in `path`, or create one and store it.
    ///
    /// The clocks always start now. Read and write failures are logged and
    /// fall back to a fresh, unpersisted id.
    pub fn load_or_create(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) if !content.trim().is_empty() => {
                return Self::new(content.trim());
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable session file");
            }
        }

        let session = Self::new(generate_session_id());
        if let Err(e) = fs::write(path, &session.id) {
            tracing::warn!(path = %path.display(), error = %e, "could not persist session id");
        }
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn page_view_started_at(&self) -> DateTime<Utc> {
        self.page_view_started_at
    }

    /// Start timing a new page view
    pub fn restart_page_view(&mut self) {
        self.page_view_started_at = Utc::now();
    }

    /// Milliseconds since the current page view started
    pub fn page_view_duration(&self) -> i64 {
        millis_since(self.page_view_started_at)
    }
}
