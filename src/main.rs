use chrono::Utc;
use journal_tasks::api::{create_tasks, fetch_boards, fetch_workspace_labels, generate_preview};
use journal_tasks::cache::QueryCache;
use journal_tasks::config::Config;
use journal_tasks::{Error, JournalWorkflow};
use std::env;
use std::io::Read;

// Thin driver: journal-tasks [--manual] [--commit] [--list <id>] [entry]
// With no entry argument the journal text is read from stdin.
#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load()?;

    let mut manual = false;
    let mut commit = false;
    let mut list_id: Option<String> = None;
    let mut entry_words = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--manual" => manual = true,
            "--commit" => commit = true,
            "--list" => list_id = args.next(),
            _ => entry_words.push(arg),
        }
    }

    let entry = if entry_words.is_empty() {
        let mut buffer = String::new();
        if std::io::stdin().read_to_string(&mut buffer).is_err() {
            buffer.clear();
        }
        buffer
    } else {
        entry_words.join(" ")
    };

    let mut workflow = JournalWorkflow::new(&config.timezone);
    workflow.set_entry(&entry);

    let boards = fetch_boards(&config.instance_url, &config.api_key).await?;
    workflow.sync_catalog(&boards);

    match fetch_workspace_labels(&config.instance_url, &config.api_key).await {
        Ok(labels) => workflow.set_workspace_labels(labels),
        // labels only enrich the preview; keep going without them
        Err(err) => eprintln!("Warning: could not fetch labels: {}", err),
    }

    if manual {
        workflow.open_manual_preview()?;
    } else {
        let request = workflow.begin_generation(Utc::now())?;
        let result = generate_preview(&config.instance_url, &config.api_key, &request).await;
        workflow.complete_generation(result)?;
    }

    if let Some(id) = &list_id {
        workflow.select_list(id);
    }

    let destination = workflow
        .selected_list()
        .and_then(|id| workflow.list_options().iter().find(|o| o.id == id))
        .cloned();
    match &destination {
        Some(list) => println!(
            "Destination: {} ({})",
            list.name.as_deref().unwrap_or(&list.id),
            list.board_name.as_deref().unwrap_or(&list.board_id),
        ),
        None => println!("Destination: none available"),
    }

    for (i, task) in workflow.tasks().iter().enumerate() {
        println!("\n[{}] {}", i + 1, task.name);
        if let Some(desc) = &task.description {
            println!("    {}", desc);
        }
        if let Some(due) = workflow.due_dates()[i] {
            println!("    due {}", due.to_rfc3339());
        }
        for option in &workflow.label_options()[i] {
            let mark = if option.selected { "x" } else { " " };
            let new = if option.is_new { " (new)" } else { "" };
            println!("    [{}] {}{}", mark, option.display_name, new);
        }
    }

    if !commit {
        println!("\nPreview only; rerun with --commit to create these tasks.");
        workflow.cancel();
        return Ok(());
    }

    let request = workflow.begin_commit(Utc::now())?;
    let created = request.tasks.len();
    let result = create_tasks(&config.instance_url, &config.api_key, &request).await;
    let mut cache = QueryCache::new();
    match workflow.complete_commit(result) {
        Ok(board) => {
            if let Some(board_id) = board {
                cache.invalidate_board(&board_id);
            }
            println!("\nCreated {} task(s).", created);
            Ok(())
        }
        Err(err) => {
            eprintln!("Error creating tasks: {}", err);
            Err(err)
        }
    }
}
