use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const STOCK_AVATAR_URL: &str = "https://avatar.iran.liara.run/public/boy";
pub const AVATAR_PLACEHOLDER_BASE: &str = "https://avatar.iran.liara.run/username";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Day {
    Today,
    Tomorrow,
}

impl Day {
    pub fn as_str(self) -> &'static str {
        match self {
            Day::Today => "Today",
            Day::Tomorrow => "Tomorrow",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "today" => Some(Day::Today),
            "tomorrow" => Some(Day::Tomorrow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// The persisted entity. Field names on the wire stay camelCase so existing
/// stored collections keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,

    pub task_name: String,

    pub description: String,

    pub selected_day: Day,

    pub selected_priority: Priority,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub avatar: Option<String>,
}

/// Create-form payload. Day and priority are unselected until the user picks
/// them; validation requires both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub task_name: String,
    pub description: String,
    pub selected_day: Option<Day>,
    pub selected_priority: Option<Priority>,
    pub tags: Vec<String>,
}

/// Shallow-merge payload for updates: set fields override, unset fields keep
/// the prior value. `avatar` is double-optional so a patch can clear it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub task_name: Option<String>,
    pub description: Option<String>,
    pub selected_day: Option<Day>,
    pub selected_priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub avatar: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    TaskName,
    SelectedDay,
    SelectedPriority,
    Description,
}

impl TaskField {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskField::TaskName => "taskName",
            TaskField::SelectedDay => "selectedDay",
            TaskField::SelectedPriority => "selectedPriority",
            TaskField::Description => "description",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required fields missing or blank: {}", .fields.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
    pub fields: Vec<TaskField>,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        if self.task_name.trim().is_empty() {
            fields.push(TaskField::TaskName);
        }
        if self.selected_day.is_none() {
            fields.push(TaskField::SelectedDay);
        }
        if self.selected_priority.is_none() {
            fields.push(TaskField::SelectedPriority);
        }
        if self.description.trim().is_empty() {
            fields.push(TaskField::Description);
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields })
        }
    }
}

impl Task {
    /// Validates the draft and mints a fresh id. Ids are never supplied by
    /// callers, which is what keeps the uniqueness invariant.
    pub fn from_draft(draft: TaskDraft) -> Result<Self, ValidationError> {
        draft.validate()?;
        let TaskDraft {
            task_name,
            description,
            selected_day,
            selected_priority,
            tags,
        } = draft;
        let (Some(selected_day), Some(selected_priority)) = (selected_day, selected_priority)
        else {
            return Err(ValidationError {
                fields: vec![TaskField::SelectedDay, TaskField::SelectedPriority],
            });
        };

        Ok(Self {
            id: Uuid::new_v4(),
            task_name: task_name.trim().to_string(),
            description: description.trim().to_string(),
            selected_day,
            selected_priority,
            tags: normalize_tags(tags),
            avatar: Some(STOCK_AVATAR_URL.to_string()),
        })
    }

    /// Re-check after a patch merge; day and priority cannot be unset on a
    /// stored task, so only the text fields can go blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        if self.task_name.trim().is_empty() {
            fields.push(TaskField::TaskName);
        }
        if self.description.trim().is_empty() {
            fields.push(TaskField::Description);
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields })
        }
    }

    pub fn merged(&self, patch: &TaskPatch) -> Task {
        let mut out = self.clone();
        if let Some(name) = &patch.task_name {
            out.task_name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            out.description = description.trim().to_string();
        }
        if let Some(day) = patch.selected_day {
            out.selected_day = day;
        }
        if let Some(priority) = patch.selected_priority {
            out.selected_priority = priority;
        }
        if let Some(tags) = &patch.tags {
            out.tags = normalize_tags(tags.clone());
        }
        if let Some(avatar) = &patch.avatar {
            out.avatar = avatar.clone();
        }
        out
    }

    /// Display image: the stored URL, or a generated placeholder keyed by the
    /// name's first character when no avatar was ever set.
    pub fn avatar_url(&self) -> String {
        match self.avatar.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => {
                let initial = self.task_name.chars().next().unwrap_or('?');
                format!("{AVATAR_PLACEHOLDER_BASE}?username={initial}")
            }
        }
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}
