//! Errors raised while assembling a [`Model`](crate::model::Model).

use thiserror::Error;

use crate::identifier::Id;

/// A structural problem in the semantic model or its DI plane.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("unknown element type `{0}`")]
    UnknownElementType(String),

    #[error("element `{0}` is defined more than once")]
    DuplicateElement(Id),

    #[error("element `{element}` has more than one DI record (`{first}` and `{second}`)")]
    DuplicateDi { element: Id, first: Id, second: Id },
}
