use crate::catalog::{ModelDescriptor, Provider};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nature of the prompt, used to filter candidates by specialty.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    General,
    Coding,
    Reasoning,
    Multimodal,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::General => "general",
            TaskType::Coding => "coding",
            TaskType::Reasoning => "reasoning",
            TaskType::Multimodal => "multimodal",
        }
    }

    /// `General` fits every model; other task types need the matching specialty.
    pub fn matches(&self, model: &ModelDescriptor) -> bool {
        match self {
            TaskType::General => true,
            other => model.has_specialty(other.as_str()),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optimization objective for ranking candidates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Cost,
    Speed,
    Quality,
    Balanced,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Cost => "cost",
            Priority::Speed => "speed",
            Priority::Quality => "quality",
            Priority::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs to one model selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionRequest {
    pub task_type: TaskType,
    pub priority: Priority,
    pub force_provider: Option<Provider>,
    pub force_model: Option<String>,
    pub max_cost_per_million: Option<f64>,
}

impl SelectionRequest {
    pub fn new(task_type: TaskType, priority: Priority) -> Self {
        Self {
            task_type,
            priority,
            ..Default::default()
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.force_provider = Some(provider);
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.force_model = Some(model_id.into());
        self
    }

    pub fn with_max_cost(mut self, max_cost_per_million: f64) -> Self {
        self.max_cost_per_million = Some(max_cost_per_million);
        self
    }
}
