//! Service graph shared by the HTTP server and the CLI.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::adapters::sqlite::{
    SqliteActivityRepository, SqliteClientProfileRepository, SqliteLeadFormRepository,
    SqliteLeadRepository,
};
use crate::domain::ports::{
    ActivityRepository, ClientProfileRepository, InvitationDispatcher, LeadFormRepository,
    LeadRepository,
};
use crate::services::{
    ActivityService, ConversionService, FormService, IntakeService, LeadService,
};

/// Every application service, built over one set of repositories.
pub struct Services {
    pub intake: IntakeService,
    pub forms: FormService,
    pub leads: LeadService,
    pub activity: Arc<ActivityService>,
    pub conversion: ConversionService,
}

impl Services {
    /// Wire the services over explicit ports.
    pub fn new(
        forms: Arc<dyn LeadFormRepository>,
        leads: Arc<dyn LeadRepository>,
        activities: Arc<dyn ActivityRepository>,
        clients: Arc<dyn ClientProfileRepository>,
        dispatcher: Arc<dyn InvitationDispatcher>,
    ) -> Self {
        let activity = Arc::new(ActivityService::new(activities));
        Self {
            intake: IntakeService::new(forms.clone(), leads.clone()),
            forms: FormService::new(forms),
            leads: LeadService::new(leads.clone(), clients),
            conversion: ConversionService::new(leads, dispatcher, activity.clone()),
            activity,
        }
    }

    /// Wire the services over the SQLite repositories.
    pub fn sqlite(pool: SqlitePool, dispatcher: Arc<dyn InvitationDispatcher>) -> Self {
        Self::new(
            Arc::new(SqliteLeadFormRepository::new(pool.clone())),
            Arc::new(SqliteLeadRepository::new(pool.clone())),
            Arc::new(SqliteActivityRepository::new(pool.clone())),
            Arc::new(SqliteClientProfileRepository::new(pool)),
            dispatcher,
        )
    }
}
