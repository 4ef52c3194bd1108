use serde::Serialize;

use crate::{error::CatalogError, schema::Id};

/// Who is asking. Handed to every projection and mutation explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Viewer {
    Anonymous,
    User(Id),
}

impl Viewer {
    pub fn user_id(&self) -> Option<Id> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }
}

impl From<Id> for Viewer {
    fn from(value: Id) -> Self {
        Viewer::User(value)
    }
}

impl From<Option<Id>> for Viewer {
    fn from(value: Option<Id>) -> Self {
        value.map(Viewer::User).unwrap_or(Viewer::Anonymous)
    }
}

/// Only the author may change or delete their own resource.
pub fn ensure_author(author_id: Id, actor: Id) -> Result<(), CatalogError> {
    if author_id != actor {
        return Err(CatalogError::PermissionDenied);
    }
    Ok(())
}
