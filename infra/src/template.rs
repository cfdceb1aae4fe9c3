use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::StackResult;

/// `{"Ref": logical_id}`
pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [logical_id, attribute]}`
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::Sub": template}`
pub fn sub(template: &str) -> Value {
    json!({ "Fn::Sub": template })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    pub properties: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: Value,
    pub description: String,
}

/// CloudFormation template; resources are keyed by logical id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    pub description: String,
    pub resources: BTreeMap<String, Resource>,
    pub outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            format_version: "2010-09-09".to_string(),
            description: description.into(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Add a resource whose properties are any serializable value
    pub fn add_resource<P: Serialize>(
        &mut self,
        logical_id: &str,
        resource_type: &str,
        properties: P,
    ) -> StackResult<()> {
        self.add_resource_depending_on(logical_id, resource_type, properties, &[])
    }

    pub fn add_resource_depending_on<P: Serialize>(
        &mut self,
        logical_id: &str,
        resource_type: &str,
        properties: P,
        depends_on: &[&str],
    ) -> StackResult<()> {
        let resource = Resource {
            resource_type: resource_type.to_string(),
            properties: serde_json::to_value(properties)?,
            depends_on: depends_on.iter().map(|id| id.to_string()).collect(),
        };
        self.resources.insert(logical_id.to_string(), resource);
        Ok(())
    }

    pub fn add_output(&mut self, name: &str, value: Value, description: &str) {
        self.outputs.insert(
            name.to_string(),
            Output {
                value,
                description: description.to_string(),
            },
        );
    }

    pub fn to_json_pretty(&self) -> StackResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
