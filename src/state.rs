use std::sync::Arc;

use crate::config::Config;
use crate::drafts::DraftStore;
use crate::persistence::PersistenceClient;
use crate::sessions::FillSessions;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub drafts: DraftStore,
    pub client: PersistenceClient,
    pub sessions: FillSessions,
}
