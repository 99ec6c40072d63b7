use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::OrmConn,
    services::auth_service::RevokedSessions,
    whatsapp::WhatsAppClient,
};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub sessions: RevokedSessions,
    pub whatsapp: WhatsAppClient,
}

impl AppState {
    pub fn new(orm: OrmConn, config: AppConfig) -> Self {
        let whatsapp = WhatsAppClient::from_config(config.whatsapp.as_ref());
        Self {
            orm,
            config: Arc::new(config),
            sessions: RevokedSessions::new(),
            whatsapp,
        }
    }
}
