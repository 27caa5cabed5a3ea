//! # Server Configuration
//!
//! Router, shared state and startup for the job tracker API.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::achievements::AchievementService;
use crate::achievements::holidays::HolidayCalendars;
use crate::auth::auth_middleware;
use crate::cache::QueryCaches;
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry::trace_context_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub caches: QueryCaches,
    pub calendars: Arc<HolidayCalendars>,
    pub clock: Arc<dyn Clock>,
    pub achievements: AchievementService,
}

impl AppState {
    /// Wires the shared collaborators around `db`.
    pub fn new(config: AppConfig, db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        let db = Arc::new(db);
        let caches = QueryCaches::new(&config.cache);
        let calendars = Arc::new(HolidayCalendars::new());
        let achievements = AchievementService::new(
            Arc::clone(&db),
            caches.clone(),
            Arc::clone(&calendars),
            Arc::clone(&clock),
        );

        Self {
            db,
            config: Arc::new(config),
            caches,
            calendars,
            clock,
            achievements,
        }
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/achievements", get(handlers::achievements::get_achievements))
        .route("/jobs", post(handlers::jobs::create_job))
        .route("/jobs/{id}/status", patch(handlers::jobs::update_job_status))
        .route("/interviews", post(handlers::interviews::create_interview))
        .route(
            "/offers",
            get(handlers::offers::list_offers).post(handlers::offers::create_offer),
        )
        .route(
            "/offers/{id}",
            get(handlers::offers::get_offer)
                .put(handlers::offers::update_offer)
                .delete(handlers::offers::delete_offer),
        )
        .route(
            "/rejections",
            get(handlers::rejections::list_rejections).post(handlers::rejections::create_rejection),
        )
        .route(
            "/rejections/{id}",
            get(handlers::rejections::get_rejection)
                .put(handlers::rejections::update_rejection)
                .delete(handlers::rejections::delete_rejection),
        )
        .route(
            "/weekly-application-goal",
            get(handlers::goals::get_goals).put(handlers::goals::update_goals),
        )
        .route(
            "/weekly-application-day-tracker",
            get(handlers::trackers::weekly_application_day_tracker),
        )
        .route(
            "/weekly-application-goal-tracker",
            get(handlers::trackers::weekly_application_goal_tracker),
        )
        .route(
            "/monthly-interview-goal-tracker",
            get(handlers::trackers::monthly_interview_goal_tracker),
        )
        .route(
            "/interview-conversion-rate",
            get(handlers::trackers::interview_conversion_rate),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/achievements", get(handlers::achievements::achievements_page))
        .nest("/api", api)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(CorsLayer::permissive())
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::from_config(&config));
    let app = create_app(AppState::new(config, db, clock));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

struct SessionSecurity;

impl Modify for SessionSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::achievements::get_achievements,
        crate::handlers::achievements::achievements_page,
        crate::handlers::jobs::create_job,
        crate::handlers::jobs::update_job_status,
        crate::handlers::interviews::create_interview,
        crate::handlers::offers::list_offers,
        crate::handlers::offers::create_offer,
        crate::handlers::offers::get_offer,
        crate::handlers::offers::update_offer,
        crate::handlers::offers::delete_offer,
        crate::handlers::rejections::list_rejections,
        crate::handlers::rejections::create_rejection,
        crate::handlers::rejections::get_rejection,
        crate::handlers::rejections::update_rejection,
        crate::handlers::rejections::delete_rejection,
        crate::handlers::goals::get_goals,
        crate::handlers::goals::update_goals,
        crate::handlers::trackers::weekly_application_day_tracker,
        crate::handlers::trackers::weekly_application_goal_tracker,
        crate::handlers::trackers::monthly_interview_goal_tracker,
        crate::handlers::trackers::interview_conversion_rate,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::ApplicationStatus,
            crate::models::AchievementCategory,
            crate::models::CandidateGoal,
            crate::models::RejectionInitiator,
            crate::error::ApiError,
            crate::handlers::HealthStatus,
            crate::achievements::AchievementsReport,
            crate::achievements::presentation::AchievementView,
            crate::repositories::AwardedAchievement,
            crate::handlers::jobs::CreateJobRequest,
            crate::handlers::jobs::UpdateJobStatusRequest,
            crate::handlers::jobs::JobResponse,
            crate::handlers::interviews::CreateInterviewRequest,
            crate::handlers::interviews::InterviewResponse,
            crate::handlers::jobs::JobSummary,
            crate::handlers::offers::CreateOfferRequest,
            crate::handlers::offers::OfferRequest,
            crate::handlers::offers::OfferResponse,
            crate::handlers::offers::DeletedResponse,
            crate::handlers::rejections::CreateRejectionRequest,
            crate::handlers::rejections::RejectionRequest,
            crate::handlers::rejections::RejectionResponse,
            crate::goals::GoalSettingsRequest,
            crate::goals::GoalSettings,
            crate::handlers::trackers::WeeklyDayTracker,
            crate::handlers::trackers::WeeklyGoalTracker,
            crate::handlers::trackers::DayPresence,
            crate::handlers::trackers::MonthlyInterviewTracker,
            crate::handlers::trackers::InterviewConversionRate,
        )
    ),
    modifiers(&SessionSecurity),
    tags(
        (name = "root", description = "Service information and health"),
        (name = "achievements", description = "Achievement badges and weekly streak"),
        (name = "jobs", description = "Job application logging"),
        (name = "interviews", description = "Interview logging"),
        (name = "offers", description = "Job offers"),
        (name = "rejections", description = "Rejections"),
        (name = "goals", description = "Goal settings and trackers"),
    ),
    info(
        title = "Job Tracker API",
        description = "Job application tracking with achievements and weekly streaks",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
