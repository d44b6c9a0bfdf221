use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::domain::{errors::ValidationError, value_objects::ObjectKey};

/// Path segment that marks an object as short-lived test data
pub const TEST_DATA_SEGMENT: &str = "test_data";

pub const DEFAULT_TTL_DAYS: u32 = 30;
pub const DEFAULT_TEST_DATA_TTL_DAYS: u32 = 7;

/// Retention category of a stored object, derived from its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    Default,
    TestData,
}

impl ObjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectCategory::Default => "DEFAULT_TTL",
            ObjectCategory::TestData => "TEST_DATA_TTL",
        }
    }
}

impl std::fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one object against a [`TtlPolicy`]
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectVerdict {
    pub key: ObjectKey,
    pub category: ObjectCategory,
    pub ttl_days: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
}

/// Retention durations per object category.
///
/// Objects with a `test_data` path segment use the test-data TTL, everything
/// else the default TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    default_ttl_days: u32,
    test_data_ttl_days: u32,
}

impl TtlPolicy {
    pub fn new(default_ttl_days: u32, test_data_ttl_days: u32) -> Result<Self, ValidationError> {
        if default_ttl_days == 0 {
            return Err(ValidationError::InvalidTtl {
                field: "default_ttl".to_string(),
                value: default_ttl_days.to_string(),
                expected: "at least 1 day".to_string(),
            });
        }

        if test_data_ttl_days == 0 {
            return Err(ValidationError::InvalidTtl {
                field: "test_data_ttl".to_string(),
                value: test_data_ttl_days.to_string(),
                expected: "at least 1 day".to_string(),
            });
        }

        Ok(Self {
            default_ttl_days,
            test_data_ttl_days,
        })
    }

    pub fn default_ttl_days(&self) -> u32 {
        self.default_ttl_days
    }

    pub fn test_data_ttl_days(&self) -> u32 {
        self.test_data_ttl_days
    }

    pub fn classify(&self, key: &ObjectKey) -> ObjectCategory {
        if key.has_segment(TEST_DATA_SEGMENT) {
            ObjectCategory::TestData
        } else {
            ObjectCategory::Default
        }
    }

    pub fn ttl_days(&self, category: ObjectCategory) -> u32 {
        match category {
            ObjectCategory::Default => self.default_ttl_days,
            ObjectCategory::TestData => self.test_data_ttl_days,
        }
    }

    /// Instant at which an object created at `created_at` expires.
    ///
    /// Saturates at the maximum representable time.
    pub fn expires_at(&self, key: &ObjectKey, created_at: DateTime<Utc>) -> DateTime<Utc> {
        let ttl = Duration::days(i64::from(self.ttl_days(self.classify(key))));
        created_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Evaluate an object against the policy. Expiry is inclusive: an object
    /// whose expiration instant equals `now` is expired.
    pub fn evaluate(
        &self,
        key: &ObjectKey,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ObjectVerdict {
        let category = self.classify(key);
        let expires_at = self.expires_at(key, created_at);
        let expired = now >= expires_at;

        debug!(
            key = %key,
            %created_at,
            %expires_at,
            %now,
            "Evaluating object"
        );

        if expired {
            info!("Object {} is marked for deletion. TTL: {}", key, category);
        } else {
            info!(
                "Object {} is not expired. TTL: {}, Expiration Date: {}",
                key, category, expires_at
            );
        }

        ObjectVerdict {
            key: key.clone(),
            category,
            ttl_days: self.ttl_days(category),
            created_at,
            expires_at,
            expired,
        }
    }

    pub fn should_delete(
        &self,
        key: &ObjectKey,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        self.evaluate(key, created_at, now).expired
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            default_ttl_days: DEFAULT_TTL_DAYS,
            test_data_ttl_days: DEFAULT_TEST_DATA_TTL_DAYS,
        }
    }
}
