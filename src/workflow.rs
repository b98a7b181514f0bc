use crate::catalog;
use crate::due_date::{adjust_to_end_of_day, format_for_commit, parse_incoming};
use crate::error::Error;
use crate::extract::{extract_text, DocNode};
use crate::labels::{reconcile, refresh_options};
use crate::models::{
    Board, CommitLabelPayload, CommitTaskPayload, CreateTasksRequest, CreateTasksResponse,
    ExtractedTask, GeneratePreviewRequest, GeneratePreviewResponse, ListOption, TaskLabelOption,
    WorkspaceLabel,
};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Generating,
    PreviewOpen,
    Creating,
}

/// The journal-to-task conversion session. Owns all mutable preview
/// state; transitions are synchronous and the two collaborator calls
/// are driven from the outside: `begin_*` validates and hands back the
/// request payload, `complete_*` consumes the collaborator's outcome.
pub struct JournalWorkflow {
    phase: Phase,
    entry: String,
    preview_entry: String,
    tasks: Vec<ExtractedTask>,
    label_options: Vec<Vec<TaskLabelOption>>,
    due_dates: Vec<Option<DateTime<FixedOffset>>>,
    expanded: Vec<bool>,
    list_options: Vec<ListOption>,
    selected_list: Option<String>,
    label_filter: Vec<String>,
    generate_descriptions: bool,
    generate_priority: bool,
    generate_labels: bool,
    generated_with_ai: bool,
    // Entry captured when generation started, so editor changes made
    // while the call is in flight cannot skew the preview.
    inflight_entry: String,
    // Version stamp the label/due-date derivations were computed for.
    // Derivations rerun only when this key changes, so user edits
    // survive unrelated catalog or label refreshes.
    derived_key: Option<(String, usize)>,
    workspace_labels: Vec<WorkspaceLabel>,
    client_timezone: String,
}

impl JournalWorkflow {
    pub fn new(client_timezone: &str) -> JournalWorkflow {
        JournalWorkflow {
            phase: Phase::Idle,
            entry: String::new(),
            preview_entry: String::new(),
            tasks: Vec::new(),
            label_options: Vec::new(),
            due_dates: Vec::new(),
            expanded: Vec::new(),
            list_options: Vec::new(),
            selected_list: None,
            label_filter: Vec::new(),
            generate_descriptions: true,
            generate_priority: true,
            generate_labels: true,
            generated_with_ai: false,
            inflight_entry: String::new(),
            derived_key: None,
            workspace_labels: Vec::new(),
            client_timezone: client_timezone.to_string(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn tasks(&self) -> &[ExtractedTask] {
        &self.tasks
    }

    pub fn label_options(&self) -> &[Vec<TaskLabelOption>] {
        &self.label_options
    }

    pub fn due_dates(&self) -> &[Option<DateTime<FixedOffset>>] {
        &self.due_dates
    }

    pub fn expanded(&self) -> &[bool] {
        &self.expanded
    }

    pub fn list_options(&self) -> &[ListOption] {
        &self.list_options
    }

    pub fn selected_list(&self) -> Option<&str> {
        self.selected_list.as_deref()
    }

    pub fn label_filter(&self) -> &[String] {
        &self.label_filter
    }

    pub fn set_entry(&mut self, text: &str) {
        self.entry = text.to_string();
    }

    /// Take the editor's document tree as the journal entry.
    pub fn set_document(&mut self, doc: Option<&DocNode>) {
        self.entry = extract_text(doc);
    }

    pub fn set_generate_descriptions(&mut self, on: bool) {
        self.generate_descriptions = on;
    }

    pub fn set_generate_priority(&mut self, on: bool) {
        self.generate_priority = on;
    }

    pub fn set_generate_labels(&mut self, on: bool) {
        self.generate_labels = on;
    }

    fn pending(&self) -> bool {
        matches!(self.phase, Phase::Generating | Phase::Creating)
    }

    /// Start converting the current entry. Validates synchronously and
    /// returns the generate-preview request for the caller to send.
    pub fn begin_generation(&mut self, now: DateTime<Utc>) -> Result<GeneratePreviewRequest, Error> {
        if self.pending() {
            return Err(Error::RequestPending);
        }
        let entry = self.entry.trim().to_string();
        if entry.is_empty() {
            return Err(Error::EmptyEntry);
        }
        self.phase = Phase::Generating;
        self.inflight_entry = entry.clone();
        Ok(GeneratePreviewRequest {
            entry,
            preview_only: true,
            generate_descriptions: self.generate_descriptions,
            generate_priority: self.generate_priority,
            generate_labels: self.generate_labels,
            client_timezone: self.client_timezone.clone(),
            client_timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Feed the generate-preview outcome back in. Success opens the
    /// preview; failure surfaces the error and falls back to idle.
    pub fn complete_generation(
        &mut self,
        result: Result<GeneratePreviewResponse, Error>,
    ) -> Result<(), Error> {
        if self.phase != Phase::Generating {
            // stale completion from a superseded session
            return Ok(());
        }
        match result {
            Ok(response) => {
                self.preview_entry = std::mem::take(&mut self.inflight_entry);
                self.tasks = response.tasks;
                self.generated_with_ai = response.metadata.generated_with_ai;
                self.label_filter.clear();
                self.default_list_selection();
                self.phase = Phase::PreviewOpen;
                self.resync_derived();
                Ok(())
            }
            Err(err) => {
                self.inflight_entry.clear();
                self.phase = Phase::Idle;
                Err(err)
            }
        }
    }

    /// Skip generation: preview the trimmed entry as a single bare task.
    pub fn open_manual_preview(&mut self) -> Result<(), Error> {
        if self.pending() {
            return Err(Error::RequestPending);
        }
        let entry = self.entry.trim().to_string();
        if entry.is_empty() {
            return Err(Error::EmptyEntry);
        }
        self.tasks = vec![ExtractedTask {
            id: "manual-1".to_string(),
            name: entry.clone(),
            description: None,
            priority: None,
            due_date: None,
            labels: Vec::new(),
            label_suggestions: Vec::new(),
        }];
        self.preview_entry = entry;
        self.generated_with_ai = false;
        self.label_filter.clear();
        self.default_list_selection();
        self.phase = Phase::PreviewOpen;
        self.resync_derived();
        Ok(())
    }

    /// Recompute destination options from the board catalog, correcting
    /// a selection whose list has disappeared.
    pub fn sync_catalog(&mut self, boards: &[Board]) {
        self.list_options = catalog::list_options(boards);
        let still_there = self
            .selected_list
            .as_ref()
            .map(|id| self.list_options.iter().any(|o| &o.id == id))
            .unwrap_or(false);
        if !still_there {
            self.selected_list = None;
            if self.phase == Phase::PreviewOpen {
                self.default_list_selection();
            }
        }
    }

    /// Accept a fresh authoritative label set. May arrive in any phase;
    /// already-derived options are upgraded in place, user selections
    /// untouched.
    pub fn set_workspace_labels(&mut self, labels: Vec<WorkspaceLabel>) {
        self.workspace_labels = labels;
        refresh_options(&mut self.label_options, &self.workspace_labels);
    }

    pub fn toggle_label_option(&mut self, task: usize, option: usize) {
        if let Some(o) = self
            .label_options
            .get_mut(task)
            .and_then(|opts| opts.get_mut(option))
        {
            o.selected = !o.selected;
        }
    }

    pub fn set_due_date(&mut self, task: usize, date: Option<DateTime<FixedOffset>>) {
        // edits land nowhere once the commit is in flight
        if self.phase == Phase::Creating {
            return;
        }
        if let Some(slot) = self.due_dates.get_mut(task) {
            *slot = date;
        }
    }

    pub fn select_list(&mut self, list_id: &str) {
        if self.list_options.iter().any(|o| o.id == list_id) {
            self.selected_list = Some(list_id.to_string());
        }
    }

    pub fn toggle_label_filter(&mut self, label_id: &str) {
        match self.label_filter.iter().position(|id| id == label_id) {
            Some(i) => {
                self.label_filter.remove(i);
            }
            None => self.label_filter.push(label_id.to_string()),
        }
    }

    pub fn toggle_expanded(&mut self, task: usize) {
        if let Some(flag) = self.expanded.get_mut(task) {
            *flag = !*flag;
        }
    }

    /// Validate and build the create-tasks request from the edited
    /// preview. The session stays fully intact until the outcome comes
    /// back through `complete_commit`.
    pub fn begin_commit(&mut self, now: DateTime<Utc>) -> Result<CreateTasksRequest, Error> {
        if self.pending() {
            return Err(Error::RequestPending);
        }
        if self.phase != Phase::PreviewOpen || self.tasks.is_empty() {
            return Err(Error::NoTasks);
        }
        let list_id = match &self.selected_list {
            Some(id) => id.clone(),
            None => return Err(Error::NoListSelected),
        };

        let tasks = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| CommitTaskPayload {
                name: task.name.clone(),
                description: if self.generate_descriptions {
                    task.description.clone()
                } else {
                    None
                },
                priority: if self.generate_priority {
                    task.priority
                } else {
                    None
                },
                due_date: format_for_commit(self.due_dates.get(i).copied().flatten()),
                labels: self
                    .label_options
                    .get(i)
                    .map(|options| {
                        options
                            .iter()
                            .filter(|o| o.selected)
                            .map(|o| CommitLabelPayload {
                                id: o.id.clone(),
                                name: o.name.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        self.phase = Phase::Creating;
        Ok(CreateTasksRequest {
            entry: self.preview_entry.clone(),
            list_id,
            tasks,
            generated_with_ai: self.generated_with_ai,
            label_ids: self.label_filter.clone(),
            generate_descriptions: self.generate_descriptions,
            generate_priority: self.generate_priority,
            generate_labels: self.generate_labels,
            client_timezone: self.client_timezone.clone(),
            client_timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Feed the create-tasks outcome back in. Success resets the whole
    /// session and yields the destination board id so the caller can
    /// invalidate its cache; failure reopens the preview with every
    /// edit intact.
    pub fn complete_commit(
        &mut self,
        result: Result<CreateTasksResponse, Error>,
    ) -> Result<Option<String>, Error> {
        if self.phase != Phase::Creating {
            return Ok(None);
        }
        match result {
            Ok(_) => {
                let board = self.selected_list.as_ref().and_then(|id| {
                    self.list_options
                        .iter()
                        .find(|o| &o.id == id)
                        .map(|o| o.board_id.clone())
                });
                self.reset();
                Ok(board)
            }
            Err(err) => {
                self.phase = Phase::PreviewOpen;
                Err(err)
            }
        }
    }

    /// Abandon the preview. Same reset as a successful commit, minus
    /// notification and invalidation.
    pub fn cancel(&mut self) {
        if self.phase == Phase::PreviewOpen {
            self.reset();
        }
    }

    // Re-derive label options and due dates when the preview they were
    // computed for changes. A new preview supersedes the old one and
    // discards its edits; the same key never recomputes.
    fn resync_derived(&mut self) {
        let key = (self.preview_entry.clone(), self.tasks.len());
        if self.derived_key.as_ref() == Some(&key) {
            return;
        }
        self.label_options = reconcile(&self.tasks, &self.workspace_labels);
        self.due_dates = self
            .tasks
            .iter()
            .map(|task| parse_incoming(task.due_date.as_deref()).map(adjust_to_end_of_day))
            .collect();
        self.expanded = vec![false; self.tasks.len()];
        self.derived_key = Some(key);
    }

    fn default_list_selection(&mut self) {
        if self.selected_list.is_none() {
            self.selected_list = self.list_options.first().map(|o| o.id.clone());
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.entry.clear();
        self.preview_entry.clear();
        self.tasks.clear();
        self.label_options.clear();
        self.due_dates.clear();
        self.expanded.clear();
        self.selected_list = None;
        self.label_filter.clear();
        self.generated_with_ai = false;
        self.inflight_entry.clear();
        self.derived_key = None;
    }
}
