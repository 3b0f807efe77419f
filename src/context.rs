use std::sync::Arc;

use anyhow::Result;
use meetgrid_core::config::MeetgridConfig;
use meetgrid_core::identity::{IdentityProvider, StaticIdentity};
use meetgrid_core::store::{DocumentStore, LocalStore};
use meetgrid_core::Session;

use crate::notify::TerminalNotifier;

/// Everything a command needs: config, the local document store and who
/// is acting.
pub struct AppContext {
    pub config: MeetgridConfig,
    pub store: Arc<LocalStore>,
    pub identity: Arc<StaticIdentity>,
}

impl AppContext {
    pub fn load(user_override: Option<String>) -> Result<Self> {
        let config = MeetgridConfig::load()?;
        let data_path = config.data_path();
        tracing::debug!(data_dir = %data_path.display(), "using event store");
        let store = Arc::new(LocalStore::new(data_path));
        let identity = Arc::new(StaticIdentity::from(
            user_override.or_else(|| config.username.clone()),
        ));

        Ok(AppContext {
            config,
            store,
            identity,
        })
    }

    pub fn username(&self) -> Result<String> {
        self.identity.current_user().ok_or_else(|| {
            anyhow::anyhow!(
                "No username set.\n\n\
                Pass one with:\n  \
                meetgrid --user <name> ...\n\n\
                or save a default with:\n  \
                meetgrid config --username <name>"
            )
        })
    }

    pub async fn open_session(&self, event_id: &str) -> Result<Session> {
        let session = Session::open(
            event_id,
            self.store.clone(),
            self.identity.clone(),
            Arc::new(TerminalNotifier),
        )
        .await?;
        Ok(session)
    }

    pub fn documents(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
