use crate::models::{Board, ListOption};

// Lists in one of these states never accept new tasks
const CLOSED_STATUSES: [&str; 2] = ["done", "closed"];

/// Flatten the board catalog into ordered destination-list options.
/// Boards keep catalog order; within a board, lists sort by position
/// with unpositioned lists last. Completed and closed lists are
/// excluded. Pure; recomputed on every catalog change.
pub fn list_options(boards: &[Board]) -> Vec<ListOption> {
    let mut out = Vec::new();
    for board in boards {
        let mut lists = board.lists.clone().unwrap_or_default();
        lists.sort_by_key(|list| list.position.unwrap_or(i64::MAX));
        for list in lists {
            let status = list
                .status
                .as_deref()
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_default();
            if CLOSED_STATUSES.contains(&status.as_str()) {
                continue;
            }
            out.push(ListOption {
                id: list.id,
                name: list.name,
                board_id: board.id.clone(),
                board_name: board.name.clone(),
                status: list.status,
                position: list.position,
            });
        }
    }
    out
}
