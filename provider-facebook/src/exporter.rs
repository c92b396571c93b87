//! Facebook events exporter
//!
//! Every exported event belongs to one synthetic calendar created with the
//! exporter.

use async_trait::async_trait;
use core_auth::{AppCredentials, CredentialManager, TokensAndUrlAuthData};
use core_runtime::config::TransferConfig;
use core_transfer::models::{CalendarContainer, CalendarModel};
use core_transfer::{
    AuthorizedHttpClient, ExportResult, ExportState, Exporter, JobId, PaginationToken,
    ResumableExporter,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::events::{EventTranslator, EventsSource};

pub const CALENDAR_NAME: &str = "Facebook Events Export";
pub const CALENDAR_DESCRIPTION: &str = "Events exported from Facebook.";

pub struct FacebookEventsExporter {
    calendar: CalendarModel,
    pages: ResumableExporter<EventsSource>,
}

impl FacebookEventsExporter {
    /// Exporter reading from the public Graph API.
    pub fn new(client: Arc<AuthorizedHttpClient>) -> Self {
        Self::with_source(client, EventsSource::new)
    }

    /// Exporter reading from `base_url` instead of the public Graph API.
    pub fn with_base_url(client: Arc<AuthorizedHttpClient>, base_url: &str) -> Self {
        Self::with_source(client, |translator| {
            EventsSource::with_base_url(base_url, translator)
        })
    }

    fn with_source(
        client: Arc<AuthorizedHttpClient>,
        source: impl FnOnce(EventTranslator) -> EventsSource,
    ) -> Self {
        let calendar = CalendarModel {
            id: Uuid::new_v4().to_string(),
            name: CALENDAR_NAME.to_string(),
            description: CALENDAR_DESCRIPTION.to_string(),
        };
        let source = source(EventTranslator::new(calendar.id.clone()));

        Self {
            calendar,
            pages: ResumableExporter::new(source, client),
        }
    }

    /// Bind an exporter to one user's authorization.
    ///
    /// Graph user tokens carry no refresh token, so a 401 ends the job.
    pub fn connect(
        config: &TransferConfig,
        auth: &TokensAndUrlAuthData,
        app: &AppCredentials,
    ) -> Self {
        let credential = CredentialManager::create_credential(auth, app);
        let credentials = Arc::new(CredentialManager::new(config.http_client.clone(), credential));
        Self::new(Arc::new(AuthorizedHttpClient::from_config(config, credentials)))
    }

    pub fn calendar(&self) -> &CalendarModel {
        &self.calendar
    }

    pub async fn state(&self) -> ExportState {
        self.pages.state().await
    }
}

#[async_trait]
impl Exporter<CalendarContainer> for FacebookEventsExporter {
    #[instrument(skip(self, token), fields(job_id = %job_id))]
    async fn export(
        &self,
        job_id: &JobId,
        token: Option<&PaginationToken>,
    ) -> core_transfer::Result<ExportResult<CalendarContainer>> {
        let page = self.pages.export(job_id, token).await?;

        if page.payload().is_empty() {
            info!("No Facebook events to export");
            return Ok(page.map(|_| CalendarContainer::default()));
        }

        if page.is_end() {
            info!("No more Facebook events to export");
        } else {
            info!("Continuing to fetch Facebook events to export");
        }

        Ok(page.map(|events| CalendarContainer {
            calendars: vec![self.calendar.clone()],
            events,
        }))
    }
}
