//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use slotwise_core::{
    AvailabilityRepository, AvailabilityService, BookingService, CalendarProvider, Clock,
    CredentialRefresher, CredentialRepository, MeetingRepository, SystemClock, TokenRefresher,
};
use slotwise_domain::{Config, Result};
use slotwise_infra::{
    DbManager, GoogleCalendarProvider, GoogleOAuthClient, GoogleOAuthSettings, HttpClient,
    SqliteAvailabilityRepository, SqliteCredentialRepository, SqliteEventRepository,
    SqliteMeetingRepository, SqliteReconciliationSink,
};
use tracing::{info, instrument};

/// `User-Agent` sent on every provider request.
pub const USER_AGENT: &str = concat!("slotwise/", env!("CARGO_PKG_VERSION"));

/// Type alias for credential repository port trait object
type DynCredentialRepository = dyn CredentialRepository;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub clock: Arc<dyn Clock>,

    // Storage kept reachable for provisioning and reconciliation
    pub events: Arc<SqliteEventRepository>,
    pub credentials: Arc<DynCredentialRepository>,
    pub reconciliation: Arc<SqliteReconciliationSink>,

    // Google integration
    pub oauth: Arc<GoogleOAuthClient>,

    // Core services
    pub availability_service: Arc<AvailabilityService>,
    pub booking_service: Arc<BookingService>,
}

impl AppContext {
    /// Build the context on the system clock.
    ///
    /// # Errors
    /// Fails when the time zone is unknown, the database cannot be opened or
    /// migrated, or the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    #[instrument(skip_all, fields(db_path = %config.database.path))]
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let time_zone = config.booking.time_zone()?;

        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let events = Arc::new(SqliteEventRepository::new(Arc::clone(&db)));
        let availability: Arc<dyn AvailabilityRepository> =
            Arc::new(SqliteAvailabilityRepository::new(Arc::clone(&db)));
        let meetings: Arc<dyn MeetingRepository> =
            Arc::new(SqliteMeetingRepository::new(Arc::clone(&db)));
        let credentials: Arc<DynCredentialRepository> =
            Arc::new(SqliteCredentialRepository::new(Arc::clone(&db)));
        let reconciliation = Arc::new(SqliteReconciliationSink::new(Arc::clone(&db)));

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.booking.provider_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        let oauth = Arc::new(GoogleOAuthClient::new(
            http.clone(),
            GoogleOAuthSettings::from_config(&config.google),
            Arc::clone(&clock),
        ));
        let calendar: Arc<dyn CalendarProvider> =
            Arc::new(GoogleCalendarProvider::new(http, config.google.calendar_api_base.clone()));

        let token_refresher: Arc<dyn TokenRefresher> = oauth.clone();
        let refresher = Arc::new(CredentialRefresher::new(
            token_refresher,
            Arc::clone(&credentials),
            Arc::clone(&clock),
            chrono::Duration::seconds(config.booking.refresh_threshold_secs),
        ));

        let availability_service = Arc::new(AvailabilityService::new(
            events.clone(),
            availability,
            Arc::clone(&meetings),
            Arc::clone(&clock),
            time_zone,
        ));
        let booking_service = Arc::new(BookingService::new(
            events.clone(),
            meetings,
            Arc::clone(&credentials),
            refresher,
            calendar,
            reconciliation.clone(),
            Arc::clone(&clock),
            Duration::from_secs(config.booking.request_timeout_secs),
        ));

        info!(time_zone = %time_zone, "application context ready");

        Ok(Self {
            config,
            db,
            clock,
            events,
            credentials,
            reconciliation,
            oauth,
            availability_service,
            booking_service,
        })
    }

    /// Verify the database answers.
    pub fn health_check(&self) -> Result<()> {
        self.db.health_check()
    }
}
