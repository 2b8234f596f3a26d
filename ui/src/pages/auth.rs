use leptos::*;

use crate::api::{use_api_client, ApiError, AuthService};
use crate::auth::{
    auth_view_override, browser_location, fragment_param, log_in, use_auth, verify_second_factor,
};
use crate::components::layout::LoadingSpinner;
use crate::routing::{use_route_state, AuthView, RouteView};
use crate::types::{LoginCredentials, PasswordResetConfirm, PasswordResetRequest, UserRole};

pub const VERIFICATION_CODE_LENGTH: usize = 6;
pub const MIN_PASSWORD_LENGTH: usize = 8;

const INPUT_CLASS: &str = "mt-1 appearance-none relative block w-full px-3 py-2 border border-slate-300 placeholder-slate-500 text-slate-900 rounded-md focus:outline-none focus:ring-blue-500 focus:border-blue-500 sm:text-sm";
const SUBMIT_CLASS: &str = "w-full flex justify-center py-2 px-4 border border-transparent text-sm font-medium rounded-md text-white bg-blue-600 hover:bg-blue-700 disabled:opacity-50 disabled:cursor-not-allowed";

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<LoginCredentials, &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required");
    }
    if !is_valid_email(email) {
        return Err("Please enter a valid email address");
    }
    if password.is_empty() {
        return Err("Password is required");
    }
    Ok(LoginCredentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_code(code: &str) -> Result<String, &'static str> {
    let code = code.trim();
    if code.len() != VERIFICATION_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err("Enter the 6-digit code");
    }
    Ok(code.to_string())
}

pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters");
    }
    if password != confirm {
        return Err("Passwords do not match");
    }
    Ok(())
}

/// Recovery token from the reset link fragment.
pub fn recovery_token(hash: &str) -> Option<String> {
    fragment_param(hash, "token")
        .or_else(|| fragment_param(hash, "access_token"))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Message shown for a failed request.
fn error_text(err: &ApiError) -> String {
    match err {
        ApiError::Http { message, .. } => message.clone(),
        ApiError::Network(_) => "Unable to reach the server. Please try again.".to_string(),
        _ => err.to_string(),
    }
}

pub fn auth_title(view: AuthView) -> &'static str {
    match view {
        AuthView::Landing => "Sponsor a student's education",
        AuthView::Login => "Sign in to your account",
        AuthView::ForgotPassword => "Forgot your password?",
        AuthView::ResetPassword => "Choose a new password",
        AuthView::RegisterSelect => "Create an account",
        AuthView::RegisterSponsor => "Register as a sponsor",
        AuthView::RegisterInstitution => "Register your institution",
        AuthView::RegisterStudent => "Register as a student",
        AuthView::RegisterStudentHighSchool => "High school student registration",
        AuthView::RegisterStudentUniversity => "University student registration",
        AuthView::VerifyEmail => "Verify your email",
        AuthView::VerifySms => "Verify your phone",
        AuthView::TwoFactorSetup => "Set up two-factor authentication",
        AuthView::TwoFactorVerify => "Enter your verification code",
        AuthView::OAuthCallback => "Completing sign-in",
        AuthView::About => "About DestinyPal",
        AuthView::Contact => "Contact us",
        AuthView::Terms => "Terms of service",
        AuthView::Privacy => "Privacy policy",
        AuthView::Donate => "Make a donation",
    }
}

/// Views reachable from `view` by the flow's own buttons.
pub fn auth_links(view: AuthView) -> &'static [(AuthView, &'static str)] {
    use AuthView::*;

    match view {
        Landing => &[
            (Login, "Sign in"),
            (RegisterSelect, "Get started"),
            (About, "About"),
            (Contact, "Contact"),
            (Donate, "Donate"),
        ],
        Login => &[
            (ForgotPassword, "Forgot password?"),
            (RegisterSelect, "Create an account"),
            (Terms, "Terms"),
            (Privacy, "Privacy"),
            (Landing, "Home"),
        ],
        ForgotPassword | ResetPassword | VerifyEmail | VerifySms => &[(Login, "Back to sign in")],
        RegisterSelect => &[
            (RegisterSponsor, "I want to sponsor"),
            (RegisterInstitution, "I represent an institution"),
            (RegisterStudent, "I am a student"),
            (Login, "Back to sign in"),
        ],
        RegisterSponsor | RegisterInstitution => &[
            (RegisterSelect, "Back"),
            (Login, "Already have an account?"),
        ],
        RegisterStudent => &[
            (RegisterStudentHighSchool, "High school"),
            (RegisterStudentUniversity, "University"),
            (RegisterSelect, "Back"),
            (Login, "Already have an account?"),
        ],
        RegisterStudentHighSchool | RegisterStudentUniversity => &[
            (RegisterStudent, "Back"),
            (Login, "Already have an account?"),
        ],
        TwoFactorSetup | TwoFactorVerify | OAuthCallback => &[(Login, "Back to sign in")],
        About | Contact | Terms | Privacy | Donate => &[(Landing, "Home"), (Login, "Sign in")],
    }
}

#[component]
pub fn AuthRouter(
    on_authenticated: Callback<UserRole>,
    #[prop(optional)] initial_view: Option<AuthView>,
) -> impl IntoView {
    let auth = use_auth();
    let (current, set_view) = use_route_state(initial_view.unwrap_or(AuthView::Landing));

    // Password recovery links and OAuth redirects carry their intent in the URL.
    create_effect(move |_| {
        let forced = browser_location().and_then(|(path, hash)| auth_view_override(&path, &hash));
        if let Some(view) = forced {
            set_view.call(view);
        }
    });

    create_effect(move |_| {
        if auth.with(|ctx| ctx.two_factor_required.is_some()) {
            set_view.call(AuthView::TwoFactorVerify);
        }
    });

    create_effect(move |_| {
        let role = auth.with(|ctx| if ctx.is_authenticated() { ctx.role() } else { None });
        if let Some(role) = role {
            on_authenticated.call(role);
        }
    });

    let loading = create_memo(move |_| auth.with(|ctx| ctx.is_loading));

    move || {
        if loading.get() {
            return view! { <LoadingSpinner/> }.into_view();
        }

        let view = current.get();
        let form = match view {
            AuthView::Login => view! { <LoginForm/> }.into_view(),
            AuthView::TwoFactorVerify => view! { <TwoFactorForm/> }.into_view(),
            AuthView::ForgotPassword => view! { <ForgotPasswordForm/> }.into_view(),
            AuthView::ResetPassword => view! { <ResetPasswordForm on_reset=set_view/> }.into_view(),
            _ => ().into_view(),
        };
        let links = auth_links(view)
            .iter()
            .map(|&(target, label)| {
                view! {
                    <a
                        href=target.url()
                        class="text-blue-600 hover:text-blue-800 font-medium"
                        on:click=move |ev: ev::MouseEvent| {
                            ev.prevent_default();
                            set_view.call(target);
                        }
                    >
                        {label}
                    </a>
                }
            })
            .collect_view();

        view! {
            <div class="min-h-screen bg-gradient-to-br from-slate-50 to-slate-100 flex items-center justify-center">
                <div class="max-w-md w-full space-y-6 text-center">
                    <h2 class="text-3xl font-extrabold text-slate-900">{auth_title(view)}</h2>
                    {form}
                    <div class="flex flex-wrap justify-center gap-4">{links}</div>
                </div>
            </div>
        }
        .into_view()
    }
}

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="text-left">
            <label for=id class="block text-sm font-medium text-slate-700">{label}</label>
            <input
                id=id
                name=id
                type=kind
                class=INPUT_CLASS
                prop:value=value
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
fn FormError(error: ReadSignal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|err| view! {
            <div class="rounded-md bg-red-50 p-4">
                <p class="text-sm font-medium text-red-800">{err}</p>
            </div>
        })
    }
}

#[component]
fn LoginForm() -> impl IntoView {
    let auth = use_auth();
    let client = use_api_client();
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);

    // A signed-in or 2FA-pending context moves the router on by itself.
    let login = create_action(move |credentials: &LoginCredentials| {
        let client = client.clone();
        let credentials = credentials.clone();
        async move {
            match log_in(auth, &client, &credentials).await {
                Ok(outcome) => tracing::debug!(?outcome, "password sign-in accepted"),
                Err(err) => set_error.set(Some(error_text(&err))),
            }
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        match validate_login(&email.get_untracked(), &password.get_untracked()) {
            Ok(credentials) => login.dispatch(credentials),
            Err(msg) => set_error.set(Some(msg.to_string())),
        }
    };

    view! {
        <form class="space-y-6" on:submit=on_submit>
            <TextField id="email" label="Email address" kind="email" value=email set_value=set_email/>
            <TextField id="password" label="Password" kind="password" value=password set_value=set_password/>
            <FormError error=error/>
            <button type="submit" class=SUBMIT_CLASS disabled=move || login.pending().get()>
                {move || if login.pending().get() { "Signing in..." } else { "Sign in" }}
            </button>
        </form>
    }
}

#[component]
fn TwoFactorForm() -> impl IntoView {
    let auth = use_auth();
    let client = use_api_client();
    let (code, set_code) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);

    let verify = create_action(move |code: &String| {
        let client = client.clone();
        let code = code.clone();
        async move {
            if let Err(err) = verify_second_factor(auth, &client, &code).await {
                set_error.set(Some(error_text(&err)));
            }
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        match validate_code(&code.get_untracked()) {
            Ok(code) => verify.dispatch(code),
            Err(msg) => set_error.set(Some(msg.to_string())),
        }
    };

    view! {
        <form class="space-y-6" on:submit=on_submit>
            <TextField id="code" label="Verification code" value=code set_value=set_code/>
            <FormError error=error/>
            <button type="submit" class=SUBMIT_CLASS disabled=move || verify.pending().get()>
                "Verify"
            </button>
        </form>
    }
}

#[component]
fn ForgotPasswordForm() -> impl IntoView {
    let client = use_api_client();
    let (email, set_email) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (sent, set_sent) = create_signal(None::<String>);

    let request = create_action(move |email: &String| {
        let client = client.clone();
        let request = PasswordResetRequest { email: email.clone() };
        async move {
            match client.request_password_reset(&request).await {
                Ok(response) if !response.message.is_empty() => set_sent.set(Some(response.message)),
                Ok(_) => set_sent.set(Some("Check your email for a reset link.".to_string())),
                Err(err) => set_error.set(Some(error_text(&err))),
            }
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        let value = email.get_untracked().trim().to_string();
        if is_valid_email(&value) {
            request.dispatch(value);
        } else {
            set_error.set(Some("Please enter a valid email address".to_string()));
        }
    };

    move || match sent.get() {
        Some(message) => view! { <p class="text-sm text-slate-700">{message}</p> }.into_view(),
        None => view! {
            <form class="space-y-6" on:submit=on_submit>
                <TextField id="email" label="Email address" kind="email" value=email set_value=set_email/>
                <FormError error=error/>
                <button type="submit" class=SUBMIT_CLASS disabled=move || request.pending().get()>
                    "Send reset link"
                </button>
            </form>
        }
        .into_view(),
    }
}

#[component]
fn ResetPasswordForm(on_reset: Callback<AuthView>) -> impl IntoView {
    let client = use_api_client();
    let token = browser_location().and_then(|(_, hash)| recovery_token(&hash));
    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);

    let reset = create_action(move |request: &PasswordResetConfirm| {
        let client = client.clone();
        let request = request.clone();
        async move {
            match client.confirm_password_reset(&request).await {
                Ok(_) => on_reset.call(AuthView::Login),
                Err(err) => set_error.set(Some(error_text(&err))),
            }
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        let Some(token) = token.clone() else {
            set_error.set(Some("This reset link is invalid or has expired".to_string()));
            return;
        };
        let new_password = password.get_untracked();
        match validate_new_password(&new_password, &confirm.get_untracked()) {
            Ok(()) => reset.dispatch(PasswordResetConfirm { token, new_password }),
            Err(msg) => set_error.set(Some(msg.to_string())),
        }
    };

    view! {
        <form class="space-y-6" on:submit=on_submit>
            <TextField id="password" label="New password" kind="password" value=password set_value=set_password/>
            <TextField id="confirm" label="Confirm password" kind="password" value=confirm set_value=set_confirm/>
            <FormError error=error/>
            <button type="submit" class=SUBMIT_CLASS disabled=move || reset.pending().get()>
                "Update password"
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_links_never_point_to_self() {
        for &view in AuthView::ALL {
            assert!(!auth_links(view).is_empty(), "{view} is a dead end");
            for (target, _) in auth_links(view) {
                assert_ne!(*target, view);
            }
        }
    }

    #[test]
    fn test_registration_reaches_every_student_form() {
        let targets: Vec<_> = auth_links(AuthView::RegisterStudent).iter().map(|(v, _)| *v).collect();
        assert!(targets.contains(&AuthView::RegisterStudentHighSchool));
        assert!(targets.contains(&AuthView::RegisterStudentUniversity));
    }

    #[test]
    fn test_validate_login() {
        assert_eq!(validate_login("", "x").unwrap_err(), "Email is required");
        assert_eq!(validate_login("not-an-email", "x").unwrap_err(), "Please enter a valid email address");
        assert_eq!(validate_login("a@b", "x").unwrap_err(), "Please enter a valid email address");
        assert_eq!(validate_login("a@example.com", "").unwrap_err(), "Password is required");

        let credentials = validate_login("  a@example.com ", "secret").unwrap();
        assert_eq!(credentials.email, "a@example.com");
    }

    #[test]
    fn test_validate_code_and_password() {
        assert_eq!(validate_code(" 123456 ").unwrap(), "123456");
        assert!(validate_code("12345").is_err());
        assert!(validate_code("12345a").is_err());

        assert!(validate_new_password("short", "short").is_err());
        assert_eq!(validate_new_password("longenough", "different").unwrap_err(), "Passwords do not match");
        assert!(validate_new_password("longenough", "longenough").is_ok());
    }

    #[test]
    fn test_recovery_token() {
        assert_eq!(recovery_token("#type=recovery&token=abc"), Some("abc".to_string()));
        assert_eq!(recovery_token("#access_token=xyz&type=recovery"), Some("xyz".to_string()));
        assert_eq!(recovery_token("#type=recovery&token="), None);
        assert_eq!(recovery_token(""), None);
    }

    #[test]
    fn test_error_text() {
        let err = ApiError::Http { status: 401, message: "Invalid credentials".to_string() };
        assert_eq!(error_text(&err), "Invalid credentials");
        assert!(error_text(&ApiError::Network("refused".to_string())).contains("server"));
    }
}
