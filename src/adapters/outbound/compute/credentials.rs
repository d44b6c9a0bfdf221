use serde::Deserialize;
use std::path::Path;

use crate::domain::errors::{ComputeError, ComputeResult};

/// Bearer token for the compute API.
///
/// The credential file holds either the raw token or a JSON object with an
/// `iam_token` (or `iamToken`) field.
#[derive(Clone)]
pub struct IamToken(String);

#[derive(Deserialize)]
struct CredentialFile {
    #[serde(alias = "iamToken")]
    iam_token: String,
}

impl IamToken {
    pub fn new(token: impl Into<String>) -> ComputeResult<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ComputeError::Credentials {
                message: "IAM token is empty".to_string(),
            });
        }
        Ok(Self(token))
    }

    pub fn from_file(path: &Path) -> ComputeResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ComputeError::Credentials {
            message: format!("Failed to read credential file {}: {}", path.display(), e),
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> ComputeResult<Self> {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            let file: CredentialFile =
                serde_json::from_str(trimmed).map_err(|e| ComputeError::Credentials {
                    message: format!("Malformed credential file: {}", e),
                })?;
            return Self::new(file.iam_token);
        }
        Self::new(trimmed)
    }

    pub(crate) fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for IamToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IamToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_raw_token() {
        let token = IamToken::parse("  t1.abc-def\n").unwrap();
        assert_eq!(token.secret(), "t1.abc-def");
    }

    #[test]
    fn test_json_token() {
        let token = IamToken::parse(r#"{"iam_token": "t1.json"}"#).unwrap();
        assert_eq!(token.secret(), "t1.json");

        let camel = IamToken::parse(r#"{"iamToken": "t1.camel", "expiresAt": "x"}"#).unwrap();
        assert_eq!(camel.secret(), "t1.camel");
    }

    #[test]
    fn test_empty_or_malformed() {
        assert!(matches!(
            IamToken::parse("   "),
            Err(ComputeError::Credentials { .. })
        ));
        assert!(matches!(
            IamToken::parse(r#"{"token": "x"}"#),
            Err(ComputeError::Credentials { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "t1.from-file").unwrap();

        let token = IamToken::from_file(file.path()).unwrap();
        assert_eq!(token.secret(), "t1.from-file");

        let missing = IamToken::from_file(Path::new("/nonexistent/creds.json"));
        assert!(matches!(missing, Err(ComputeError::Credentials { .. })));
    }

    #[test]
    fn test_debug_redacts() {
        let token = IamToken::new("secret-value").unwrap();
        assert!(!format!("{:?}", token).contains("secret-value"));
    }
}
