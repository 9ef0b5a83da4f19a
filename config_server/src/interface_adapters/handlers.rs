use crate::domain::entities::ModulePlan;
use crate::domain::errors::ConfigError;
use crate::interface_adapters::protocol::{ErrorResponse, LoginForm, ModeResponse, SetCtfModeForm};
use crate::interface_adapters::state::{
    AppState, ConfiguredAccounts, InMemorySessionStore, SystemClock,
};
use crate::use_cases::current_mode::CurrentModeUseCase;
use crate::use_cases::login::LoginUseCase;
use crate::use_cases::logout::LogoutUseCase;
use crate::use_cases::set_ctf_mode::SetCtfModeUseCase;
use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{error, info, warn};

// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";
// Cookie carrying the CSRF token bound to the session.
pub const CSRF_COOKIE: &str = "token";

const CONFIG_PAGE: &str = "/admin/config";
const LOGIN_PAGE: &str = "/login";

// Handler for operator login. Sets the session and CSRF cookies on success.
#[tracing::instrument(name = "login", skip_all, fields(user = tracing::field::Empty))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let use_case = LoginUseCase {
        clock: SystemClock,
        store: session_store(&state),
        verifier: ConfiguredAccounts {
            accounts: state.accounts.clone(),
        },
        ttl_seconds: state.session_ttl_seconds,
    };

    match use_case.execute(form).await {
        Ok(result) => {
            tracing::Span::current().record("user", result.user_name.as_str());
            info!(role = ?result.role, "operator signed in");
            let jar = jar
                .add(
                    Cookie::build((SESSION_COOKIE, result.session_token))
                        .path("/")
                        .http_only(true)
                        .same_site(SameSite::Strict),
                )
                .add(
                    Cookie::build((CSRF_COOKIE, result.csrf_token))
                        .path("/")
                        .same_site(SameSite::Strict),
                );
            (jar, found(CONFIG_PAGE, String::new())).into_response()
        }
        Err(ConfigError::InvalidLoginName | ConfigError::InvalidCredentials) => {
            warn!("login rejected");
            found(LOGIN_PAGE, "Login Failed".to_string())
        }
        Err(err) => {
            error!(error = %err, "login failed");
            found(LOGIN_PAGE, error_page("Could not sign in right now."))
        }
    }
}

// Handler for revoking the caller's session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = session_token(&jar);
    let use_case = LogoutUseCase {
        store: session_store(&state),
    };

    if let Err(err) = use_case.execute(token).await {
        error!(error = %err, "failed to revoke session");
    }

    let jar = jar
        .remove(Cookie::build(SESSION_COOKIE).path("/"))
        .remove(Cookie::build(CSRF_COOKIE).path("/"));
    (jar, found(LOGIN_PAGE, String::new())).into_response()
}

// Handler for enabling CTF mode.
//
// Always answers 302; clients read the outcome from the body. Denied callers
// get an empty body, CSRF and storage failures get an error page. A body that
// does not parse as the form counts as an empty CSRF token.
#[tracing::instrument(name = "set_ctf_mode", skip_all)]
pub async fn set_ctf_mode(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<SetCtfModeForm>, FormRejection>,
) -> Response {
    let csrf_token = match form {
        Ok(Form(form)) => form.csrf_token,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable ctf mode form");
            String::new()
        }
    };

    let use_case = SetCtfModeUseCase {
        clock: SystemClock,
        sessions: session_store(&state),
        modes: state.modes.clone(),
    };

    match use_case.execute(session_token(&jar), csrf_token).await {
        Ok(result) => {
            info!(
                user = %result.user_name,
                changed = result.changed,
                mode = result.mode.as_str(),
                "ctf mode enabled"
            );
            found(
                CONFIG_PAGE,
                format!(
                    "<h3 class='title'>CTF Mode Enabled</h3>\
                     <p>The module plan is now {}. Players unlock modules one level at a time.</p>",
                    result.mode.as_str()
                ),
            )
        }
        Err(err @ (ConfigError::NotAuthenticated | ConfigError::SessionExpired)) => {
            warn!(error = %err, "ctf mode request without a valid session");
            found(LOGIN_PAGE, String::new())
        }
        Err(ConfigError::NotAdmin) => {
            warn!("non-admin attempted to enable ctf mode");
            found(CONFIG_PAGE, String::new())
        }
        Err(ConfigError::CsrfMismatch) => {
            warn!("csrf token mismatch on ctf mode request");
            found(
                CONFIG_PAGE,
                error_page("The request could not be verified. Reload the page and try again."),
            )
        }
        Err(err) => {
            error!(error = %err, "failed to enable ctf mode");
            found(CONFIG_PAGE, error_page("Could not update the module plan."))
        }
    }
}

// Handler for reading the current module plan.
pub async fn current_mode(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<ModeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = CurrentModeUseCase {
        clock: SystemClock,
        sessions: session_store(&state),
        modes: state.modes.clone(),
    };

    let mode: ModulePlan = use_case
        .execute(session_token(&jar))
        .await
        .map_err(map_mode_error)?;

    Ok(Json(ModeResponse {
        mode,
        ctf_mode: mode.is_ctf_mode(),
    }))
}

fn session_store(state: &AppState) -> InMemorySessionStore {
    InMemorySessionStore {
        sessions: state.sessions.clone(),
    }
}

fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

// 302 Found with an HTML body. `Redirect` only offers 303/307/308.
fn found(location: &'static str, body: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)], Html(body)).into_response()
}

fn error_page(detail: &str) -> String {
    format!("<h3 class='title'>Error Occurred</h3><p>{detail}</p>")
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

fn map_mode_error(err: ConfigError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ConfigError::NotAuthenticated => {
            error_response(StatusCode::UNAUTHORIZED, "invalid session")
        }
        ConfigError::SessionExpired => error_response(StatusCode::UNAUTHORIZED, "session expired"),
        ConfigError::NotAdmin => error_response(StatusCode::UNAUTHORIZED, "admin role required"),
        ConfigError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
        ConfigError::CsrfMismatch
        | ConfigError::InvalidLoginName
        | ConfigError::InvalidCredentials => {
            error_response(StatusCode::BAD_REQUEST, "invalid request")
        }
    }
}
