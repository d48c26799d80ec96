//! Backend commands queued from UI to backend worker.

use uuid::Uuid;

use crate::ui::map::tiles::TileKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Lookup { request_id: Uuid, address: String },
    FetchTile { key: TileKey, url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lookup { .. } => "lookup",
            Self::FetchTile { .. } => "fetch_tile",
        }
    }
}
