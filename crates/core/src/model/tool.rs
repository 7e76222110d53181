//! Tool definitions and tool calls.

use schemars::Schema;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

/// A tool the model may call.
#[derive(Debug, Clone)]
pub struct Tool {
    /// The name of the tool
    pub name: String,

    /// The description of the tool
    pub description: String,

    /// JSON schema of the arguments
    pub parameters: Schema,
}

impl Tool {
    /// Create a tool whose arguments are described by `T`.
    pub fn new<T: schemars::JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: schemars::schema_for!(T),
        }
    }
}

/// Serialized in the `{"type": "function", "function": {...}}` envelope.
impl Serialize for Tool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Function<'a> {
            name: &'a str,
            description: &'a str,
            parameters: &'a Schema,
        }

        let mut tool = serializer.serialize_struct("Tool", 2)?;
        tool.serialize_field("type", "function")?;
        tool.serialize_field(
            "function",
            &Function {
                name: &self.name,
                description: &self.description,
                parameters: &self.parameters,
            },
        )?;
        tool.end()
    }
}

/// A tool call made by the model
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ToolCall {
    /// The ID of the tool call
    #[serde(default)]
    pub id: String,

    /// The type of tool (currently only "function")
    #[serde(default = "function_type", rename = "type")]
    pub call_type: String,

    /// The function to call
    pub function: FunctionCall,
}

fn function_type() -> String {
    "function".into()
}

/// A function call within a tool call
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FunctionCall {
    /// The name of the function to call
    pub name: String,

    /// The arguments to pass to the function (JSON string)
    #[serde(default)]
    pub arguments: String,
}

/// Controls which tool is called by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Model will not call any tool
    None,
    /// Model can pick between generating a message or calling tools
    #[default]
    Auto,
    /// Model must call one or more tools
    Required,
}
