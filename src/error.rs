use thiserror::Error;

/// Errors surfaced to whoever drives a dish page.
#[derive(Error, Debug)]
pub enum Error {
    #[error("the menu has no dishes")]
    EmptyMenu,

    #[error("dish {0} is not on the menu")]
    NotFound(String),

    #[error("the comment form is invalid")]
    InvalidForm,

    #[error("no dish is loaded")]
    NoDish,

    #[error("fail to fetch dishes: {0:#}")]
    Fetch(anyhow::Error),

    #[error("fail to save dish: {0:#}")]
    Persist(anyhow::Error),
}
