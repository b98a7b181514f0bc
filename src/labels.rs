use crate::models::{ExtractedTask, TaskLabelOption, WorkspaceLabel};
use regex::Regex;
use std::collections::{HashMap, HashSet};

// Most label options offered per task
pub const MAX_LABEL_OPTIONS: usize = 6;

/// Case- and whitespace-insensitive label identity. Two names are the
/// same label iff their normalized forms are equal and non-empty.
pub fn normalize_label(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Turn a normalized token into a presentable label name. Never applied
/// to an authoritative workspace label's name.
pub fn format_label(normalized: &str) -> String {
    normalized
        .split(' ')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Manufacture label suggestions from task text when none were supplied.
/// Bounded by MAX_LABEL_OPTIONS and never returns a disallowed name.
pub fn derive_suggestions(
    title: &str,
    description: Option<&str>,
    disallowed: &HashSet<String>,
) -> Vec<String> {
    let haystack = format!("{} {}", title, description.unwrap_or("")).to_lowercase();

    let token_re = Regex::new(r"[a-z0-9]{3,}").unwrap();
    let mut collected: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for token in token_re.find_iter(&haystack) {
        let normalized = normalize_label(token.as_str());
        if normalized.is_empty() || collected.contains(&normalized) || disallowed.contains(&normalized)
        {
            continue;
        }
        collected.insert(normalized.clone());
        out.push(format_label(&normalized));
        if out.len() == MAX_LABEL_OPTIONS {
            break;
        }
    }

    // Last resort: first usable word of the title on its own
    if out.is_empty() {
        let word = title
            .split(|c: char| !c.is_alphanumeric())
            .find(|w| w.len() > 2 && !disallowed.contains(&normalize_label(w)));
        if let Some(word) = word {
            out.push(format_label(&normalize_label(word)));
        }
    }

    out
}

/// Build the per-task label option seed for a batch of extracted tasks,
/// resolving explicit labels and suggestions against the workspace set
/// by normalized name. One option list per task, capped, first
/// discovery wins on duplicates.
pub fn reconcile(
    tasks: &[ExtractedTask],
    workspace_labels: &[WorkspaceLabel],
) -> Vec<Vec<TaskLabelOption>> {
    let by_name: HashMap<String, &WorkspaceLabel> = workspace_labels
        .iter()
        .map(|label| (normalize_label(&label.name), label))
        .collect();

    tasks
        .iter()
        .map(|task| reconcile_task(task, &by_name))
        .collect()
}

fn reconcile_task(
    task: &ExtractedTask,
    by_name: &HashMap<String, &WorkspaceLabel>,
) -> Vec<TaskLabelOption> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut options = Vec::new();

    // Explicit labels arrive pre-selected: the generator attached them
    // with confidence
    for label in &task.labels {
        let normalized = normalize_label(&label.name);
        if normalized.is_empty() || seen.contains(&normalized) {
            continue;
        }
        seen.insert(normalized.clone());
        match by_name.get(&normalized) {
            // The authoritative name wins over the supplied one
            Some(existing) => options.push(existing_option(existing, true)),
            None => options.push(TaskLabelOption {
                id: label.id.clone(),
                name: label.name.clone(),
                display_name: label.name.clone(),
                is_new: label.id.is_none(),
                selected: true,
            }),
        }
    }

    // Suggestions: reusing an existing label is the low-risk choice, so
    // a match auto-selects; a brand-new label needs explicit opt-in
    for suggestion in &task.label_suggestions {
        push_suggested(&mut options, &mut seen, suggestion, by_name);
    }

    if options.is_empty() {
        let mut disallowed: HashSet<String> = by_name.keys().cloned().collect();
        disallowed.extend(seen.iter().cloned());
        let derived = derive_suggestions(&task.name, task.description.as_deref(), &disallowed);
        for name in &derived {
            push_suggested(&mut options, &mut seen, name, by_name);
        }
    }

    options.truncate(MAX_LABEL_OPTIONS);
    options
}

fn push_suggested(
    options: &mut Vec<TaskLabelOption>,
    seen: &mut HashSet<String>,
    name: &str,
    by_name: &HashMap<String, &WorkspaceLabel>,
) {
    let normalized = normalize_label(name);
    if normalized.is_empty() || seen.contains(&normalized) {
        return;
    }
    seen.insert(normalized.clone());
    match by_name.get(&normalized) {
        Some(existing) => options.push(existing_option(existing, true)),
        None => {
            let display = format_label(&normalized);
            options.push(TaskLabelOption {
                id: None,
                name: display.clone(),
                display_name: display,
                is_new: true,
                selected: false,
            });
        }
    }
}

fn existing_option(label: &WorkspaceLabel, selected: bool) -> TaskLabelOption {
    TaskLabelOption {
        id: Some(label.id.clone()),
        name: label.name.clone(),
        display_name: label.name.clone(),
        is_new: false,
        selected,
    }
}

/// Secondary pass run when the authoritative label set changes after the
/// seed was built: upgrade still-unidentified options in place once their
/// name matches a workspace label. Selection state is left untouched.
pub fn refresh_options(options: &mut [Vec<TaskLabelOption>], workspace_labels: &[WorkspaceLabel]) {
    let by_name: HashMap<String, &WorkspaceLabel> = workspace_labels
        .iter()
        .map(|label| (normalize_label(&label.name), label))
        .collect();

    for task_options in options.iter_mut() {
        for option in task_options.iter_mut() {
            if option.id.is_some() {
                continue;
            }
            if let Some(existing) = by_name.get(&normalize_label(&option.name)) {
                option.id = Some(existing.id.clone());
                option.name = existing.name.clone();
                option.display_name = existing.name.clone();
                option.is_new = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LabelRef;

    fn workspace_label(id: &str, name: &str) -> WorkspaceLabel {
        WorkspaceLabel {
            id: id.to_string(),
            name: name.to_string(),
            color: "blue".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn task(name: &str, labels: Vec<LabelRef>, suggestions: Vec<&str>) -> ExtractedTask {
        ExtractedTask {
            id: "t1".to_string(),
            name: name.to_string(),
            description: None,
            priority: None,
            due_date: None,
            labels,
            label_suggestions: suggestions.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_normalize_ignores_case_and_whitespace() {
        assert_eq!(normalize_label("  Groceries "), normalize_label("groceries"));
        assert_eq!(normalize_label("HOME office"), "home office");
    }

    #[test]
    fn test_format_capitalizes_each_segment() {
        assert_eq!(format_label("home office"), "Home Office");
        assert_eq!(format_label("  spaced   out "), "Spaced Out");
    }

    #[test]
    fn test_derive_caps_at_six_and_honors_disallow() {
        let disallowed: HashSet<String> = ["milk".to_string()].into_iter().collect();
        let derived = derive_suggestions(
            "Buy milk and eggs for the weekend brunch with friends",
            Some("remember the farmers market downtown"),
            &disallowed,
        );
        assert!(derived.len() <= MAX_LABEL_OPTIONS);
        assert!(!derived.iter().any(|d| normalize_label(d) == "milk"));
        // "and"/"the" are three letters and legitimately count as tokens
        assert_eq!(derived[0], "Buy");
    }

    #[test]
    fn test_derive_falls_back_to_first_title_word() {
        // no ASCII-alphanumeric run reaches length 3, so the title-word
        // fallback supplies the single suggestion
        let derived = derive_suggestions("naïve döt", None, &HashSet::new());
        assert_eq!(derived, vec!["Naïve".to_string()]);

        let all_short = derive_suggestions("do it", None, &HashSet::new());
        assert!(all_short.is_empty());
    }

    #[test]
    fn test_explicit_label_matching_workspace_takes_authoritative_name() {
        let tasks = vec![task(
            "Buy milk",
            vec![LabelRef {
                id: None,
                name: "  groceries ".to_string(),
            }],
            vec![],
        )];
        let options = reconcile(&tasks, &[workspace_label("L1", "Groceries")]);
        assert_eq!(
            options[0],
            vec![TaskLabelOption {
                id: Some("L1".to_string()),
                name: "Groceries".to_string(),
                display_name: "Groceries".to_string(),
                is_new: false,
                selected: true,
            }]
        );
    }

    #[test]
    fn test_unmatched_suggestion_starts_unselected() {
        let tasks = vec![task("Buy milk", vec![], vec!["groceries"])];
        let options = reconcile(&tasks, &[]);
        assert_eq!(
            options[0],
            vec![TaskLabelOption {
                id: None,
                name: "Groceries".to_string(),
                display_name: "Groceries".to_string(),
                is_new: true,
                selected: false,
            }]
        );
    }

    #[test]
    fn test_matched_suggestion_is_selected() {
        let tasks = vec![task("Buy milk", vec![], vec!["groceries"])];
        let options = reconcile(&tasks, &[workspace_label("L1", "Groceries")]);
        assert!(options[0][0].selected);
        assert_eq!(options[0][0].id.as_deref(), Some("L1"));
    }

    #[test]
    fn test_duplicates_between_labels_and_suggestions_collapse() {
        let tasks = vec![task(
            "Buy milk",
            vec![LabelRef {
                id: Some("L1".to_string()),
                name: "Groceries".to_string(),
            }],
            vec!["GROCERIES", "errands"],
        )];
        let options = reconcile(&tasks, &[]);
        let normalized: Vec<String> = options[0]
            .iter()
            .map(|o| normalize_label(&o.name))
            .collect();
        assert_eq!(normalized, vec!["groceries", "errands"]);
    }

    #[test]
    fn test_fallback_derivation_skips_existing_workspace_names() {
        // no labels, no suggestions: derived tokens kick in, but tokens
        // naming an existing workspace label are disallowed up front
        let tasks = vec![task("Water the plants", vec![], vec![])];
        let options = reconcile(&tasks, &[workspace_label("L1", "Water")]);
        assert!(!options[0].is_empty());
        assert!(options[0].iter().all(|o| normalize_label(&o.name) != "water"));
        assert!(options[0].iter().all(|o| !o.selected && o.is_new));
    }

    #[test]
    fn test_option_list_is_capped() {
        let tasks = vec![task(
            "alpha beta gamma delta epsilon zeta eta theta",
            vec![],
            vec![],
        )];
        let options = reconcile(&tasks, &[]);
        assert_eq!(options[0].len(), MAX_LABEL_OPTIONS);
    }

    #[test]
    fn test_non_new_options_reference_real_workspace_ids() {
        let workspace = vec![workspace_label("L1", "Groceries"), workspace_label("L2", "Home")];
        let tasks = vec![task(
            "Tidy up",
            vec![LabelRef {
                id: None,
                name: "home".to_string(),
            }],
            vec!["groceries", "yard"],
        )];
        let options = reconcile(&tasks, &workspace);
        for option in &options[0] {
            if !option.is_new {
                let id = option.id.as_deref().unwrap();
                assert!(workspace.iter().any(|l| l.id == id));
            }
        }
    }

    #[test]
    fn test_refresh_upgrades_unidentified_options_only() {
        let tasks = vec![task("Buy milk", vec![], vec!["groceries"])];
        let mut options = reconcile(&tasks, &[]);
        assert!(options[0][0].is_new && !options[0][0].selected);

        refresh_options(&mut options, &[workspace_label("L1", "groceries")]);
        let upgraded = &options[0][0];
        assert_eq!(upgraded.id.as_deref(), Some("L1"));
        assert_eq!(upgraded.name, "groceries");
        assert!(!upgraded.is_new);
        // selection survives the upgrade
        assert!(!upgraded.selected);
    }

    #[test]
    fn test_refresh_leaves_matched_options_alone() {
        let workspace = vec![workspace_label("L1", "Groceries")];
        let tasks = vec![task("Buy milk", vec![], vec!["groceries"])];
        let mut options = reconcile(&tasks, &workspace);
        let before = options.clone();
        refresh_options(&mut options, &[workspace_label("L9", "Groceries")]);
        assert_eq!(options, before);
    }
}
