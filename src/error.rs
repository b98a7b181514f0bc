use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Validation: detected before any network call, no state transition
    #[error("journal entry is empty")]
    EmptyEntry,
    #[error("no destination list selected")]
    NoListSelected,
    #[error("no tasks to create")]
    NoTasks,
    #[error("another request is still in flight")]
    RequestPending,

    // Collaborator failures
    #[error("{0}")]
    Api(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("config: {0}")]
    Config(String),
}
