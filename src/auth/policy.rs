//! Token lifetime policy.
//!
//! The login endpoint does not report an expiry, so the client assumes one.
//! Whether 24 hours matches the server's real token lifetime is not
//! documented; keep it adjustable rather than baked in.

use time::{Duration, OffsetDateTime};

/// Assumed lifetime of a freshly issued token.
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::hours(24);

/// Tokens this close to their assumed expiry are treated as expired.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::minutes(5);

/// How long a token is trusted and how early it is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    /// Assumed validity window, measured from login time
    pub validity: Duration,
    /// Safety buffer subtracted from the assumed expiry
    pub refresh_margin: Duration,
}

impl TokenPolicy {
    /// Create a policy with explicit values.
    pub fn new(validity: Duration, refresh_margin: Duration) -> Self {
        Self {
            validity,
            refresh_margin,
        }
    }

    /// Expiry assigned to a token issued at `issued_at`.
    pub fn expiry_from(&self, issued_at: OffsetDateTime) -> OffsetDateTime {
        issued_at + self.validity
    }

    /// Whether a token expiring at `expires_at` is still usable at `now`.
    pub fn is_fresh(&self, expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
        now < expires_at - self.refresh_margin
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VALIDITY, DEFAULT_REFRESH_MARGIN)
    }
}
