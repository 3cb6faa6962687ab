/// Lifecycle of one operation kind on one resource.
///
/// `Pending` and `Failed` are mutually exclusive by construction; success
/// returns the slot to `Idle`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OpStatus {
    #[default]
    Idle,
    Pending,
    Failed(String),
}

impl OpStatus {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Failure reason, if the last attempt failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Drop a failure; leaves `Pending` alone.
    pub fn clear_error(&mut self) {
        if matches!(self, Self::Failed(_)) {
            *self = Self::Idle;
        }
    }
}

/// Operation kinds that own a status slot on a resource slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    List,
    Create,
    Update,
    Delete,
    Restore,
}

impl OpKind {
    pub const ALL: [Self; 5] = [Self::List, Self::Create, Self::Update, Self::Delete, Self::Restore];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
        }
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
