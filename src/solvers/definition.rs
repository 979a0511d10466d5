use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Aggregation;

/// Kind of condition a rule definition expresses.
///
/// Only attribute conditions are evaluated here; the others are accepted by
/// the loader so that their rules can be reported as unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    #[default]
    Attribute,
    Connection,
    Filter,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::Connection => "connection",
            Self::Filter => "filter",
        }
    }
}

/// Resource types a rule targets: `all`, or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResourceTypes {
    #[default]
    All,
    Only(Vec<String>),
}

impl ResourceTypes {
    pub fn matches(&self, resource_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(types) => types.iter().any(|t| t == resource_type || t == "all"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawResourceTypes {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for ResourceTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let types = match RawResourceTypes::deserialize(deserializer)? {
            RawResourceTypes::One(t) => vec![t],
            RawResourceTypes::Many(ts) => ts,
        };
        if types.is_empty() || types.iter().any(|t| t == "all") {
            Ok(Self::All)
        } else {
            Ok(Self::Only(types))
        }
    }
}

impl Serialize for ResourceTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("all"),
            Self::Only(types) => types.serialize(serializer),
        }
    }
}

/// Declarative input to a solver, as deserialized from a check file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    #[serde(default)]
    pub cond_type: ConditionType,
    #[serde(default)]
    pub resource_types: ResourceTypes,
    #[serde(default)]
    pub attribute: Option<String>,
    pub operator: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    /// Compare text case-insensitively (equality, affixes, containment, regex).
    #[serde(default)]
    pub ignore_case: bool,
    /// Overrides the operator's default aggregation.
    #[serde(default)]
    pub aggregation: Option<Aggregation>,
}

impl RuleDefinition {
    /// An attribute rule over all resource types. A JSON `null` value means
    /// no expected value.
    pub fn new(operator: &str, attribute: &str, value: serde_json::Value) -> Self {
        Self {
            cond_type: ConditionType::Attribute,
            resource_types: ResourceTypes::All,
            attribute: Some(attribute.to_string()),
            operator: operator.to_string(),
            value: if value.is_null() { None } else { Some(value) },
            ignore_case: false,
            aggregation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_types_accept_string_or_list() {
        let def: RuleDefinition = serde_yaml::from_str(
            "resource_types: all\nattribute: acl\noperator: exists\n",
        )
        .unwrap();
        assert_eq!(def.resource_types, ResourceTypes::All);

        let def: RuleDefinition = serde_yaml::from_str(
            "resource_types:\n  - aws_s3_bucket\n  - aws_s3_bucket_acl\n\
             attribute: acl\noperator: exists\n",
        )
        .unwrap();
        assert!(def.resource_types.matches("aws_s3_bucket_acl"));
        assert!(!def.resource_types.matches("aws_instance"));
    }

    #[test]
    fn defaults_to_attribute_condition() {
        let def: RuleDefinition =
            serde_json::from_str(r#"{"attribute": "x", "operator": "is_true"}"#).unwrap();
        assert_eq!(def.cond_type, ConditionType::Attribute);
        assert!(def.value.is_none());
        assert!(!def.ignore_case);
    }
}
