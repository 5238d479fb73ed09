//! Prompt construction for enhancement batches.

use taxon_common_config::ServiceConfig;
use taxon_tree::EnhancementBatch;

use crate::generator::GenerationRequest;

/// Shown in place of an empty description.
pub const NO_DESCRIPTION: &str = "No description";

/// System prompt and sampling parameters for enhancement requests.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSettings {
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&ServiceConfig> for PromptSettings {
    fn from(service: &ServiceConfig) -> Self {
        Self {
            system_prompt: service.system_prompt.clone(),
            max_tokens: service.max_tokens,
            temperature: service.temperature,
        }
    }
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self::from(&ServiceConfig::default())
    }
}

/// The user prompt for one batch.
pub fn build_prompt(batch: &EnhancementBatch) -> String {
    let tools: Vec<String> = batch
        .nodes_to_enhance
        .iter()
        .map(|node| {
            let description = if node.current_description.trim().is_empty() {
                NO_DESCRIPTION
            } else {
                node.current_description.as_str()
            };
            format!("- {}: {}", node.name, description)
        })
        .collect();

    format!(
        r#"Enhance these creative technology tools/concepts with concise, informative descriptions (50-150 characters each).
Category: {category}

Tools to enhance:
{tools}

For each tool, provide:
1. A clear, concise description (50-150 chars) explaining what it is and its primary use
2. 1-2 relevant links (official site, documentation, or authoritative source)

Focus on accuracy and usefulness for creative technologists.

Return in this JSON format:
{{
  "enhancements": [
    {{
      "name": "tool_name",
      "description": "enhanced description here",
      "links": {{"Official": "https://example.com", "Docs": "https://docs.example.com"}}
    }}
  ]
}}
"#,
        category = batch.category,
        tools = tools.join("\n"),
    )
}

/// The full request for one batch.
pub fn generation_request(batch: &EnhancementBatch, settings: &PromptSettings) -> GenerationRequest {
    GenerationRequest {
        system: settings.system_prompt.clone(),
        prompt: build_prompt(batch),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxon_tree::BatchNode;

    fn batch() -> EnhancementBatch {
        EnhancementBatch {
            batch_id: "Game Engines_1".into(),
            category: "Game Engines".into(),
            nodes_to_enhance: vec![
                BatchNode {
                    name: "Godot".into(),
                    current_description: "".into(),
                    current_links: Default::default(),
                    path: "Root/Game Engines/Godot".into(),
                },
                BatchNode {
                    name: "Bevy".into(),
                    current_description: "Rust ECS engine".into(),
                    current_links: Default::default(),
                    path: "Root/Game Engines/Bevy".into(),
                },
            ],
        }
    }

    #[test]
    fn test_prompt_lists_every_tool() {
        let prompt = build_prompt(&batch());
        assert!(prompt.contains("Category: Game Engines"));
        assert!(prompt.contains("- Godot: No description\n- Bevy: Rust ECS engine"));
        assert!(prompt.contains(r#""enhancements": ["#));
    }

    #[test]
    fn test_request_uses_settings() {
        let settings = PromptSettings {
            system_prompt: "sys".into(),
            max_tokens: 100,
            temperature: 0.0,
        };
        let request = generation_request(&batch(), &settings);
        assert_eq!(request.system, "sys");
        assert_eq!(request.max_tokens, 100);
        assert!(request.prompt.starts_with("Enhance these"));
    }

    #[test]
    fn test_default_settings_match_service_defaults() {
        let settings = PromptSettings::default();
        assert_eq!(settings.max_tokens, 2000);
        assert!((settings.temperature - 0.3).abs() < f32::EPSILON);
        assert!(settings.system_prompt.contains("creative technology"));
    }
}
