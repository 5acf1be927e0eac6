use serde::Deserialize;

use crate::api::CollectionService;
use crate::config::Config;
use crate::session::Session;
use crate::views::ViewRegistry;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub session: Session,
    pub views: ViewRegistry,
    pub service: Box<dyn CollectionService>,
}

impl AppState {
    pub fn new(config: Config, service: Box<dyn CollectionService>) -> Self {
        Self {
            config,
            session: Session::new(),
            views: ViewRegistry::default(),
            service,
        }
    }
}
