use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str = "\
You are a Pharmaceutical & Nutrition Expert specializing in drug compositions, supplement analysis, and health safety.
Your role is to analyze medicine and supplement ingredient labels from images, explain their effects, and assess their safety for different users.
You simplify complex medical jargon, ensuring users make informed health choices based on science-backed insights.
Provide responses in Markdown format.";

pub const INSTRUCTIONS: [&str; 8] = [
    "Extract ingredient details from medicine or supplement labels.",
    "Explain active and inactive ingredients in simple terms.",
    "Identify potential allergens, harmful additives, or unnecessary fillers.",
    "Highlight contraindications and potential interactions with common conditions/medications.",
    "Assess suitability for different demographics (pregnant women, elderly, children).",
    "Check regulatory approvals (FDA, GMP, etc.).",
    "Provide a safety rating and suggest alternative products if necessary.",
    "Use the Search tool to verify medical claims and side effects.",
];

pub const ANALYSIS_TASK: &str = "Analyze the given image for medicine or supplement ingredients.";

/// Fixed persona and instructions shared by every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub system_prompt: String,
    pub instructions: Vec<String>,
    pub task: String,
    pub markdown: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::medicine_analyzer()
    }
}

impl AgentConfig {
    pub fn medicine_analyzer() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            instructions: INSTRUCTIONS.iter().map(|s| s.to_string()).collect(),
            task: ANALYSIS_TASK.to_string(),
            markdown: true,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }
}
