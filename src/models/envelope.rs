use serde::Serialize;

/// `{ "data": ... }` wrapper returned by every read or write of an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{ "deleted": true }` returned by deletions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

impl Deleted {
    pub fn yes() -> Self {
        Self { deleted: true }
    }
}
