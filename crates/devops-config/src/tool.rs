//! Deployment tools that consume the final config files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// File name of the hand-edited config inside the config dir.
pub const RAW_CONFIG_FILE: &str = "config-raw.json";

/// File name of the declarative schema looked up in the config dir by default.
pub const SCHEMA_FILE: &str = "config-schema.json";

/// A deployment tool with its own final config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeployTool {
    /// Python scripts and applications.
    Python,
    /// Shell scripts (values read with `json-value`).
    ShellScript,
    /// AWS CloudFormation; keys are rendered in BigCamelCase.
    #[serde(rename = "cloudformation")]
    CloudFormation,
    /// AWS Serverless Application Model.
    Sam,
    /// The Serverless framework.
    Serverless,
    /// HashiCorp Terraform.
    Terraform,
}

impl DeployTool {
    /// Every tool, in dump order.
    pub const ALL: [DeployTool; 6] = [
        DeployTool::Python,
        DeployTool::ShellScript,
        DeployTool::CloudFormation,
        DeployTool::Sam,
        DeployTool::Serverless,
        DeployTool::Terraform,
    ];

    /// Kebab-case name used on the command line and in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::ShellScript => "shell-script",
            Self::CloudFormation => "cloudformation",
            Self::Sam => "sam",
            Self::Serverless => "serverless",
            Self::Terraform => "terraform",
        }
    }

    /// Name of the final config file inside the config dir.
    pub fn file_name(self) -> String {
        format!("config-final-for-{}.json", self.as_str())
    }
}

impl fmt::Display for DeployTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeployTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown tool '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// Converts `SNAKE_CASE` or `snake_case` to `BigCamelCase`.
///
/// Each `_`-separated word keeps its first character upper-cased and the rest
/// lower-cased; empty words are dropped.
pub fn to_big_camel_case(text: &str) -> String {
    text.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(DeployTool::Python.file_name(), "config-final-for-python.json");
        assert_eq!(
            DeployTool::ShellScript.file_name(),
            "config-final-for-shell-script.json"
        );
        assert_eq!(
            DeployTool::CloudFormation.file_name(),
            "config-final-for-cloudformation.json"
        );
    }

    #[test]
    fn test_parse_tool_names() {
        for tool in DeployTool::ALL {
            assert_eq!(tool.to_string().parse::<DeployTool>().unwrap(), tool);
        }
        assert_eq!(
            serde_json::to_value(DeployTool::CloudFormation).unwrap(),
            serde_json::json!("cloudformation")
        );
        let err = "ansible".parse::<DeployTool>().unwrap_err();
        assert!(err.starts_with("unknown tool 'ansible'"));
    }

    #[test]
    fn test_big_camel_case() {
        assert_eq!(to_big_camel_case("PROJECT_NAME"), "ProjectName");
        assert_eq!(to_big_camel_case("stage"), "Stage");
        assert_eq!(to_big_camel_case("AWS__REGION_"), "AwsRegion");
        assert_eq!(to_big_camel_case(""), "");
    }
}
