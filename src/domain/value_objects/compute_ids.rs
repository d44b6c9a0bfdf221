use crate::domain::errors::ValidationError;

/// Identifier of a compute instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyInstanceId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the folder (scope) whose instances are swept
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderId(String);

impl FolderId {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyFolderId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_ids_are_rejected() {
        assert_eq!(InstanceId::new(""), Err(ValidationError::EmptyInstanceId));
        assert_eq!(InstanceId::new("  "), Err(ValidationError::EmptyInstanceId));
        assert_eq!(FolderId::new(""), Err(ValidationError::EmptyFolderId));
    }

    #[test]
    fn test_valid_ids() {
        let id = InstanceId::new("dp7329odurnhplpf5ff0").unwrap();
        assert_eq!(id.as_str(), "dp7329odurnhplpf5ff0");
        assert_eq!(FolderId::new("b1g-folder").unwrap().to_string(), "b1g-folder");
    }
}
