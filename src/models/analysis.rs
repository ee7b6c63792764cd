use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub mime_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// One fully-assembled request to the remote model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub request_id: String,
    pub system_prompt: String,
    pub instructions: Vec<String>,
    pub task: String,
    pub image: ImageAttachment,
    pub search_enabled: bool,
    pub markdown: bool,
}

impl AnalysisRequest {
    /// Persona, instruction list and format directive as one system message.
    pub fn system_instruction(&self) -> String {
        let mut message = self.system_prompt.trim().to_string();

        if !self.instructions.is_empty() {
            message.push_str("\n\n## Instructions\n");
            for instruction in &self.instructions {
                message.push_str("- ");
                message.push_str(instruction);
                message.push('\n');
            }
        }

        if self.markdown {
            message.push_str("\nUse markdown to format your answers.");
        }

        message
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub content: String,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_layout() {
        let request = AnalysisRequest {
            request_id: "req".into(),
            system_prompt: "  You are a pharmacist.\n".into(),
            instructions: vec!["Read the label.".into(), "Rate safety.".into()],
            task: "Analyze".into(),
            image: ImageAttachment {
                mime_type: "image/png".into(),
                data: vec![],
            },
            search_enabled: true,
            markdown: true,
        };

        let system = request.system_instruction();
        assert!(system.starts_with("You are a pharmacist."));
        assert!(system.contains("- Read the label.\n- Rate safety.\n"));
        assert!(system.ends_with("Use markdown to format your answers."));
    }
}
