use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;

use crate::domain::{errors::ValidationError, value_objects::InstanceId};

/// Long-lived cache VM that must survive every sweep
pub const CACHE_INSTANCE_ID: &str = "dp7329odurnhplpf5ff0";

/// A compute instance as reported by the listing call
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub id: InstanceId,
    pub name: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Instance identifiers that are never deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList(BTreeSet<InstanceId>);

impl AllowList {
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn with(mut self, id: InstanceId) -> Self {
        self.0.insert(id);
        self
    }

    pub fn insert(&mut self, id: InstanceId) {
        self.0.insert(id);
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstanceId> {
        self.0.iter()
    }
}

impl Default for AllowList {
    /// Contains the cache VM only.
    fn default() -> Self {
        Self(InstanceId::new(CACHE_INSTANCE_ID).into_iter().collect())
    }
}

/// Why an instance survives a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    AllowListed,
    TooYoung,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceAction {
    Keep(KeepReason),
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceVerdict {
    pub id: InstanceId,
    pub created_at: DateTime<Utc>,
    pub action: InstanceAction,
}

impl InstanceVerdict {
    pub fn is_delete(&self) -> bool {
        self.action == InstanceAction::Delete
    }
}

/// Uniform age threshold for compute instances
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceAgePolicy {
    ttl_hours: u32,
    allow_list: AllowList,
}

impl InstanceAgePolicy {
    pub fn new(ttl_hours: u32, allow_list: AllowList) -> Result<Self, ValidationError> {
        if ttl_hours == 0 {
            return Err(ValidationError::InvalidTtl {
                field: "ttl_hours".to_string(),
                value: ttl_hours.to_string(),
                expected: "at least 1 hour".to_string(),
            });
        }

        Ok(Self {
            ttl_hours,
            allow_list,
        })
    }

    pub fn ttl_hours(&self) -> u32 {
        self.ttl_hours
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Instances created strictly before this instant are too old
    pub fn threshold(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(Duration::hours(i64::from(self.ttl_hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn evaluate(&self, instance: &Instance, now: DateTime<Utc>) -> InstanceVerdict {
        let action = if self.allow_list.contains(&instance.id) {
            InstanceAction::Keep(KeepReason::AllowListed)
        } else if instance.created_at < self.threshold(now) {
            InstanceAction::Delete
        } else {
            InstanceAction::Keep(KeepReason::TooYoung)
        };

        InstanceVerdict {
            id: instance.id.clone(),
            created_at: instance.created_at,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn instance(id: &str, age_hours: i64) -> Instance {
        Instance {
            id: InstanceId::new(id).unwrap(),
            name: None,
            status: Some("RUNNING".to_string()),
            created_at: now() - Duration::hours(age_hours),
        }
    }

    #[test]
    fn test_old_instance_is_deleted() {
        let policy = InstanceAgePolicy::new(24, AllowList::default()).unwrap();
        let verdict = policy.evaluate(&instance("vm-old", 25), now());
        assert_eq!(verdict.action, InstanceAction::Delete);
        assert!(verdict.is_delete());
    }

    #[test]
    fn test_young_instance_is_kept() {
        let policy = InstanceAgePolicy::new(24, AllowList::default()).unwrap();
        let verdict = policy.evaluate(&instance("vm-new", 3), now());
        assert_eq!(verdict.action, InstanceAction::Keep(KeepReason::TooYoung));
    }

    #[test]
    fn test_threshold_is_strict() {
        let policy = InstanceAgePolicy::new(24, AllowList::empty()).unwrap();
        let verdict = policy.evaluate(&instance("vm-edge", 24), now());
        assert_eq!(verdict.action, InstanceAction::Keep(KeepReason::TooYoung));
    }

    #[test]
    fn test_allow_listed_instance_is_never_deleted() {
        let policy = InstanceAgePolicy::new(1, AllowList::default()).unwrap();
        let ancient = instance(CACHE_INSTANCE_ID, 24 * 365 * 5);
        let verdict = policy.evaluate(&ancient, now());
        assert_eq!(verdict.action, InstanceAction::Keep(KeepReason::AllowListed));
    }

    #[test]
    fn test_extra_allow_list_entries() {
        let allow = AllowList::default().with(InstanceId::new("vm-pinned").unwrap());
        assert_eq!(allow.iter().count(), 2);

        let policy = InstanceAgePolicy::new(24, allow).unwrap();
        let verdict = policy.evaluate(&instance("vm-pinned", 100), now());
        assert_eq!(verdict.action, InstanceAction::Keep(KeepReason::AllowListed));
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        assert!(InstanceAgePolicy::new(0, AllowList::default()).is_err());
    }
}
