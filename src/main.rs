use std::{process, sync::Arc, time::Duration};

use axum::{ServiceExt, body::Body, http::Request};
use quire::{
    application::{
        admin::posts::AdminPostService,
        auth::{AuthService, RegisterUserCommand},
        error::AppError,
        repos::{HealthRepo, PostsRepo, PostsWriteRepo, SessionsRepo, UsersRepo},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, SessionCookie},
        telemetry,
    },
};
use tokio::signal;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
        config::Command::CreateUser(args) => run_create_user(settings, args).await,
    }
}

async fn connect(settings: &config::Settings) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn auth_service(
    repositories: &Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> AuthService {
    let users: Arc<dyn UsersRepo> = repositories.clone();
    let sessions: Arc<dyn SessionsRepo> = repositories.clone();
    AuthService::new(users, sessions, settings.session.ttl)
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    connect(&settings).await?;
    info!(target = "quire::migrate", "Migrations applied");
    Ok(())
}

async fn run_create_user(
    settings: config::Settings,
    args: config::CreateUserArgs,
) -> Result<(), AppError> {
    let repositories = connect(&settings).await?;
    let auth = auth_service(&repositories, &settings);

    let user = auth
        .register_user(RegisterUserCommand {
            email: args.email,
            name: args.name,
            role: args.role.into(),
            password: args.password,
        })
        .await
        .map_err(|err| AppError::validation(err.to_string()))?;

    info!(
        target = "quire::create_user",
        user_id = %user.id,
        email = %user.email,
        role = %user.role,
        "User created"
    );
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = connect(&settings).await?;
    let auth = Arc::new(auth_service(&repositories, &settings));

    match auth.purge_expired_sessions().await {
        Ok(removed) => info!(
            target = "quire::serve",
            removed, "Purged expired sessions"
        ),
        Err(err) => warn!(
            target = "quire::serve",
            error = %err,
            "Failed to purge expired sessions"
        ),
    }

    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let health: Arc<dyn HealthRepo> = repositories.clone();

    let state = AdminState {
        posts: Arc::new(AdminPostService::new(posts_repo, posts_write_repo)),
        auth,
        health,
        session: SessionCookie::from(&settings.session),
        per_page: settings.admin.per_page,
        key: http::session_key(&settings.session).map_err(AppError::from)?,
    };

    serve_http(&settings, state).await
}

async fn serve_http(settings: &config::Settings, state: AdminState) -> Result<(), AppError> {
    let app = http::build_app(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "quire::serve",
        addr = %settings.server.addr,
        "Listening"
    );

    let grace = settings.server.graceful_shutdown;
    axum::serve(
        listener,
        ServiceExt::<Request<Body>>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal(grace))
    .await
    .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "quire::serve", "Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM, then arms a hard deadline for in-flight requests.
/// Resolves on Ctrl-C. A listener that fails to install never resolves.
async fn wait_for_ctrl_c<F>(listener: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = listener.await {
        error!(target = "quire::serve", error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn shutdown_signal(grace: Duration) {
    let ctrl_c = wait_for_ctrl_c(signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(target = "quire::serve", error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(
        target = "quire::serve",
        grace_seconds = grace.as_secs(),
        "Shutdown requested; draining connections"
    );
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        warn!(target = "quire::serve", "Graceful shutdown timed out");
        process::exit(1);
    });
}
