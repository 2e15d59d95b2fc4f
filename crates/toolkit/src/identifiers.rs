//! Newtype domain identifiers.
//!
//! Values with identity are wrapped in newtypes so a resource type read from
//! the command line cannot be confused with arbitrary template text.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// A CloudFormation resource type such as `"AWS::EC2::VPC"`.
///
/// Used to select which resources receive common tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceType(String);

impl ResourceType {
    /// Creates a resource type, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the resource type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| "resource type must not be empty".to_string())
    }
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single command-line invocation.
///
/// Generated fresh for every run and recorded on the root tracing span so all
/// log lines from one run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Generates a new random invocation identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identifiers_are_rejected() {
        assert!(ResourceType::new("").is_none());
        assert!("".parse::<ResourceType>().is_err());
        assert_eq!(
            ResourceType::new("AWS::EC2::VPC").unwrap().as_str(),
            "AWS::EC2::VPC"
        );
    }

    #[test]
    fn test_resource_type_parses_from_command_line_text() {
        let parsed: ResourceType = "AWS::IAM::Role".parse().unwrap();
        assert_eq!(parsed.to_string(), "AWS::IAM::Role");
        assert_eq!(
            "".parse::<ResourceType>().unwrap_err(),
            "resource type must not be empty"
        );
    }

    #[test]
    fn test_invocation_ids_are_unique() {
        assert_ne!(InvocationId::new_random(), InvocationId::new_random());
    }
}
