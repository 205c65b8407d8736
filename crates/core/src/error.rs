use thiserror::Error;

use crate::model::{BankError, QuestionError, ResultError};
use crate::selector::EmptySelectionError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error(transparent)]
    Selection(#[from] EmptySelectionError),
}
