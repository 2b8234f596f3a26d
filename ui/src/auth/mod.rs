// Authentication state and auth-flow URL handling
use leptos::*;

use crate::api::{ApiError, AuthService};
use crate::routing::AuthView;
use crate::types::{LoginCredentials, TwoFactorMethod, User, UserRole};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthContext {
    pub user: Option<User>,
    pub two_factor_required: Option<TwoFactorMethod>,
    pub is_loading: bool,
}

impl AuthContext {
    /// Signed in with no second factor outstanding.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.two_factor_required.is_none()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }
}

pub type AuthState = RwSignal<AuthContext>;

pub fn provide_auth_context() -> AuthState {
    let auth_state = create_rw_signal(AuthContext::default());
    provide_context(auth_state);
    auth_state
}

/// Auth state from context, providing a fresh one if none exists.
pub fn use_auth() -> AuthState {
    use_context::<AuthState>().unwrap_or_else(provide_auth_context)
}

pub fn sign_in(auth: AuthState, user: User) {
    auth.set(AuthContext {
        user: Some(user),
        two_factor_required: None,
        is_loading: false,
    });
}

/// Marks the session as waiting for a second factor.
pub fn require_two_factor(auth: AuthState, method: TwoFactorMethod) {
    auth.update(|ctx| ctx.two_factor_required = Some(method));
}

pub fn sign_out(auth: AuthState) {
    auth.set(AuthContext::default());
}

/// Restores the session from the backend cookie, if there is one.
///
/// A 401 means "not signed in" and is not an error.
pub async fn restore_session<S: AuthService + ?Sized>(auth: AuthState, service: &S) -> Result<(), ApiError> {
    auth.update(|ctx| ctx.is_loading = true);
    let result = service.current_user().await;

    match result {
        Ok(user) => {
            sign_in(auth, user);
            Ok(())
        }
        Err(err) if err.is_unauthorized() => {
            sign_out(auth);
            Ok(())
        }
        Err(err) => {
            auth.update(|ctx| ctx.is_loading = false);
            Err(err)
        }
    }
}

/// Outcome of a password sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn(UserRole),
    TwoFactorRequired(TwoFactorMethod),
}

/// Signs in with a password.
///
/// When the backend asks for a second factor the context is left waiting
/// for it; otherwise the user is fetched and signed in.
pub async fn log_in<S: AuthService + ?Sized>(
    auth: AuthState,
    service: &S,
    credentials: &LoginCredentials,
) -> Result<LoginOutcome, ApiError> {
    let response = service.login(credentials).await?;
    if response.requires_two_factor {
        let method = response.two_factor_method.unwrap_or(TwoFactorMethod::Email);
        require_two_factor(auth, method);
        return Ok(LoginOutcome::TwoFactorRequired(method));
    }

    let user = service.current_user().await?;
    let role = user.role;
    sign_in(auth, user);
    Ok(LoginOutcome::SignedIn(role))
}

/// Verifies the pending second factor and completes the sign-in.
pub async fn verify_second_factor<S: AuthService + ?Sized>(
    auth: AuthState,
    service: &S,
    code: &str,
) -> Result<UserRole, ApiError> {
    service.verify_two_factor(code).await?;
    let user = service.current_user().await?;
    let role = user.role;
    sign_in(auth, user);
    Ok(role)
}

/// Value of `name` in a `#a=1&b=2` location fragment.
pub fn fragment_param<'a>(hash: &'a str, name: &str) -> Option<&'a str> {
    hash.trim_start_matches('#')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Auth view forced by the URL, independent of the route table.
///
/// A `type=recovery` fragment opens the password reset form; an OAuth
/// callback path or an `access_token` fragment opens the callback handler,
/// which takes precedence.
pub fn auth_view_override(path: &str, hash: &str) -> Option<AuthView> {
    if path.contains("/auth/callback") || fragment_param(hash, "access_token").is_some() {
        Some(AuthView::OAuthCallback)
    } else if fragment_param(hash, "type") == Some("recovery") {
        Some(AuthView::ResetPassword)
    } else {
        None
    }
}

/// `(pathname, hash)` of the browser location.
pub fn browser_location() -> Option<(String, String)> {
    #[cfg(target_arch = "wasm32")]
    {
        let location = web_sys::window()?.location();
        Some((location.pathname().ok()?, location.hash().unwrap_or_default()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}
