use infra::db::Db;

use crate::auth::{AuthConfig, JwtService, OAuthService};
use crate::config::AppConfig;
use crate::services::{ExportService, Mailer, Notifier};

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    config: AppConfig,
    jwt_service: JwtService,
    oauth_service: OAuthService,
    mailer: Mailer,
}

impl AppState {
    pub fn new(db: Db) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        let config = AppConfig::from_env()?;
        let jwt_service = JwtService::new(&auth_config);
        let oauth_service = OAuthService::new(auth_config);
        let mailer = Mailer::new(config.mail.clone());

        Ok(Self {
            db,
            config,
            jwt_service,
            oauth_service,
            mailer,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn oauth_service(&self) -> &OAuthService {
        &self.oauth_service
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.db.clone(), self.mailer.clone(), self.config.clone())
    }

    pub fn exporter(&self) -> ExportService {
        ExportService::new(self.db.clone(), self.mailer.clone(), self.config.clone())
    }
}
