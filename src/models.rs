use serde::{Deserialize, Serialize};

// Task priority as produced by the generation step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    None,
    Low,
    Normal,
    High,
    Critical,
}

// A label as referenced by the generation step; id is present only
// if the generator already matched an existing workspace label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelRef {
    pub id: Option<String>,
    pub name: String,
}

// One candidate task extracted from a journal entry. Immutable once
// produced; the workflow only derives editable state from it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTask {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelRef>,
    #[serde(default)]
    pub label_suggestions: Vec<String>,
}

// Authoritative workspace label
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLabel {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: String,
}

// One selectable label per candidate label per task. id == None and
// is_new == true together mean "created on commit if selected".
#[derive(Clone, Debug, PartialEq)]
pub struct TaskLabelOption {
    pub id: Option<String>,
    pub name: String,
    pub display_name: String,
    pub is_new: bool,
    pub selected: bool,
}

// A destination list, flattened out of the board catalog
#[derive(Clone, Debug, PartialEq)]
pub struct ListOption {
    pub id: String,
    pub name: Option<String>,
    pub board_id: String,
    pub board_name: Option<String>,
    pub status: Option<String>,
    pub position: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardList {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lists: Option<Vec<BoardList>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePreviewRequest {
    pub entry: String,
    pub preview_only: bool,
    pub generate_descriptions: bool,
    pub generate_priority: bool,
    pub generate_labels: bool,
    pub client_timezone: String,
    pub client_timestamp: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMetadata {
    pub generated_with_ai: bool,
    pub total_tasks: usize,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePreviewResponse {
    pub tasks: Vec<ExtractedTask>,
    pub metadata: PreviewMetadata,
}

// A label attached to a task at commit time; a missing id means the
// label is created server-side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommitLabelPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitTaskPayload {
    pub name: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub labels: Vec<CommitLabelPayload>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTasksRequest {
    pub entry: String,
    pub list_id: String,
    pub tasks: Vec<CommitTaskPayload>,
    pub generated_with_ai: bool,
    pub label_ids: Vec<String>,
    pub generate_descriptions: bool,
    pub generate_priority: bool,
    pub generate_labels: bool,
    pub client_timezone: String,
    pub client_timestamp: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTasksResponse {
    #[serde(default)]
    pub tasks: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub metadata: Option<CreateMetadata>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMetadata {
    #[serde(default)]
    pub total_tasks: Option<usize>,
}
