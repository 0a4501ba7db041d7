//! Flat tool list for simple discovery clients.

use serde::Serialize;

use crate::domains::tools::{ParamType, ToolCatalog, ToolDescriptor};

/// One parameter as shown in the tool list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterListing {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: ParamType,
}

/// One tool as shown in the tool list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolListing {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParameterListing>,
}

impl From<&ToolDescriptor> for ToolListing {
    fn from(descriptor: &ToolDescriptor) -> Self {
        Self {
            name: descriptor.name(),
            description: descriptor.description(),
            parameters: descriptor
                .parameters()
                .iter()
                .map(|p| ParameterListing {
                    name: p.name,
                    description: p.description,
                    required: p.required,
                    kind: p.kind,
                })
                .collect(),
        }
    }
}

/// Render every tool in catalog order.
pub fn tool_list(catalog: &ToolCatalog) -> Vec<ToolListing> {
    catalog.iter().map(|d| ToolListing::from(d.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_list_shape() {
        let list = tool_list(&ToolCatalog::standard());
        assert_eq!(list.len(), 14);

        let update = list.iter().find(|t| t.name == "AtualizarAsync").unwrap();
        let value = serde_json::to_value(update).unwrap();
        assert_eq!(
            value["parameters"],
            json!([
                {
                    "name": "id",
                    "description": "Código ou identificador do livro",
                    "required": true,
                    "type": "integer"
                },
                {
                    "name": "livro",
                    "description": "Dados para atualização de um livro",
                    "required": true,
                    "type": "object"
                }
            ])
        );
    }

    #[test]
    fn test_tool_list_is_deterministic() {
        let catalog = ToolCatalog::standard();
        let first = serde_json::to_string(&tool_list(&catalog)).unwrap();
        let second = serde_json::to_string(&tool_list(&catalog)).unwrap();
        assert_eq!(first, second);
    }
}
