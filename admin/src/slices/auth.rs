//! Admin session
//!
//! Login and session checks set the authenticated user; logout and failed
//! session checks clear it. A failed session check is expected on a fresh
//! start, so it is not recorded as a slice error.

use super::{LifecycleEvent, Operation};
use crate::endpoints;
use crate::envelope::HttpMethod;
use crate::environment::AdminEnvironment;
use crate::inputs::{JsonBody, LoginInput};
use crate::models::{AdminUser, Session};
use crate::thunk::Thunk;
use folio_core::effect::Effect;
use folio_core::reducer::Reducer;
use folio_core::{AsyncSlice, Lifecycle, OperationReducer, SliceStatus, SmallVec};
use serde::Serialize;
use serde::de::IgnoredAny;

/// Slice name used in lifecycle events
pub const SLICE: &str = "auth";

/// Loading-flag keys
#[allow(missing_docs)]
pub mod keys {
    use folio_core::OperationKey;

    pub const LOGIN: OperationKey = OperationKey::new("login");
    pub const CHECK_AUTH: OperationKey = OperationKey::new("checkAuth");
    pub const LOGOUT: OperationKey = OperationKey::new("logout");
    pub const INITIALIZE_ADMIN: OperationKey = OperationKey::new("initializeAdmin");
    pub const GENERATE_OTP: OperationKey = OperationKey::new("generateOTP");
    pub const VERIFY_OTP_UPDATE_EMAIL: OperationKey = OperationKey::new("verifyOTPAndUpdateEmail");
    pub const VERIFY_OTP_UPDATE_PASSWORD: OperationKey =
        OperationKey::new("verifyOTPAndUpdatePassword");

    pub const ALL: [OperationKey; 7] = [
        LOGIN,
        CHECK_AUTH,
        LOGOUT,
        INITIALIZE_ADMIN,
        GENERATE_OTP,
        VERIFY_OTP_UPDATE_EMAIL,
        VERIFY_OTP_UPDATE_PASSWORD,
    ];
}

/// Session slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Loading flags, last error, last update
    #[serde(flatten)]
    pub status: SliceStatus,
    /// Whether the backend accepted the session
    pub is_authenticated: bool,
    /// The logged-in admin
    pub user: Option<AdminUser>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            status: SliceStatus::new(&keys::ALL),
            is_authenticated: false,
            user: None,
        }
    }
}

impl AuthState {
    fn sign_in(&mut self, session: Option<Session>) {
        self.is_authenticated = true;
        self.user = session.and_then(|session| session.user);
    }

    fn sign_out(&mut self) {
        self.is_authenticated = false;
        self.user = None;
    }
}

impl AsyncSlice for AuthState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }
}

/// Session actions
#[derive(Debug, Clone)]
pub enum AuthAction {
    /// Log in with email and password
    Login(Lifecycle<LoginInput, Option<Session>>),
    /// Ask the backend who is logged in
    CheckAuth(Lifecycle<(), Option<Session>>),
    /// End the session
    Logout(Lifecycle<(), IgnoredAny>),
    /// Create the first admin account
    InitializeAdmin(Lifecycle<JsonBody, IgnoredAny>),
    /// Email a one-time password
    GenerateOtp(Lifecycle<JsonBody, IgnoredAny>),
    /// Change the admin email with an OTP
    VerifyOtpAndUpdateEmail(Lifecycle<JsonBody, IgnoredAny>),
    /// Change the admin password with an OTP
    VerifyOtpAndUpdatePassword(Lifecycle<JsonBody, IgnoredAny>),
    /// Drop the recorded error
    ClearError,
    /// Back to the initial state
    Reset,
    /// Set the user directly; authenticated iff a user is given
    SetUser(Option<AdminUser>),
}

impl AuthAction {
    /// The lifecycle signal carried by this action, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<LifecycleEvent<'_>> {
        let event = match self {
            Self::Login(phase) => LifecycleEvent::of(SLICE, keys::LOGIN, phase),
            Self::CheckAuth(phase) => LifecycleEvent::of(SLICE, keys::CHECK_AUTH, phase),
            Self::Logout(phase) => LifecycleEvent::of(SLICE, keys::LOGOUT, phase),
            Self::InitializeAdmin(phase) => LifecycleEvent::of(SLICE, keys::INITIALIZE_ADMIN, phase),
            Self::GenerateOtp(phase) => LifecycleEvent::of(SLICE, keys::GENERATE_OTP, phase),
            Self::VerifyOtpAndUpdateEmail(phase) => {
                LifecycleEvent::of(SLICE, keys::VERIFY_OTP_UPDATE_EMAIL, phase)
            },
            Self::VerifyOtpAndUpdatePassword(phase) => {
                LifecycleEvent::of(SLICE, keys::VERIFY_OTP_UPDATE_PASSWORD, phase)
            },
            Self::ClearError | Self::Reset | Self::SetUser(_) => return None,
        };
        Some(event)
    }
}

const LOGIN: Operation<AuthState, LoginInput, Option<Session>> = Operation::new(
    OperationReducer::new(keys::LOGIN, |state: &mut AuthState, _, session| state.sign_in(session))
        .on_rejected(AuthState::sign_out),
    Thunk::new("login", HttpMethod::Post, endpoints::auth::LOGIN),
);

const CHECK_AUTH: Operation<AuthState, (), Option<Session>> = Operation::new(
    OperationReducer::new(keys::CHECK_AUTH, |state: &mut AuthState, _, session| state.sign_in(session))
        .on_rejected(AuthState::sign_out)
        .quiet(),
    Thunk::new("checkAuth", HttpMethod::Get, endpoints::auth::GET_ADMIN_USER),
);

const LOGOUT: Operation<AuthState, (), IgnoredAny> = Operation::new(
    OperationReducer::new(keys::LOGOUT, |state, _, _| state.sign_out()),
    Thunk::new("logout", HttpMethod::Post, endpoints::auth::LOGOUT),
);

const INITIALIZE_ADMIN: Operation<AuthState, JsonBody, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::INITIALIZE_ADMIN, |_, _, _| {}),
    Thunk::new("initializeAdmin", HttpMethod::Post, endpoints::auth::INITIALIZE),
);

const GENERATE_OTP: Operation<AuthState, JsonBody, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::GENERATE_OTP, |_, _, _| {}),
    Thunk::new("generateOTP", HttpMethod::Post, endpoints::auth::GENERATE_OTP),
);

const VERIFY_OTP_UPDATE_EMAIL: Operation<AuthState, JsonBody, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::VERIFY_OTP_UPDATE_EMAIL, |_, _, _| {}),
    Thunk::new(
        "verifyOTPAndUpdateEmail",
        HttpMethod::Post,
        endpoints::auth::VERIFY_OTP_UPDATE_EMAIL,
    ),
);

const VERIFY_OTP_UPDATE_PASSWORD: Operation<AuthState, JsonBody, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::VERIFY_OTP_UPDATE_PASSWORD, |_, _, _| {}),
    Thunk::new(
        "verifyOTPAndUpdatePassword",
        HttpMethod::Post,
        endpoints::auth::VERIFY_OTP_UPDATE_PASSWORD,
    ),
);

/// Reducer of the session slice
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AdminEnvironment;

    fn reduce(
        &self,
        state: &mut AuthState,
        action: AuthAction,
        env: &AdminEnvironment,
    ) -> SmallVec<[Effect<AuthAction>; 4]> {
        match action {
            AuthAction::Login(phase) => LOGIN.drive(state, phase, env, AuthAction::Login),
            AuthAction::CheckAuth(phase) => CHECK_AUTH.drive(state, phase, env, AuthAction::CheckAuth),
            AuthAction::Logout(phase) => LOGOUT.drive(state, phase, env, AuthAction::Logout),
            AuthAction::InitializeAdmin(phase) => {
                INITIALIZE_ADMIN.drive(state, phase, env, AuthAction::InitializeAdmin)
            },
            AuthAction::GenerateOtp(phase) => {
                GENERATE_OTP.drive(state, phase, env, AuthAction::GenerateOtp)
            },
            AuthAction::VerifyOtpAndUpdateEmail(phase) => VERIFY_OTP_UPDATE_EMAIL.drive(
                state,
                phase,
                env,
                AuthAction::VerifyOtpAndUpdateEmail,
            ),
            AuthAction::VerifyOtpAndUpdatePassword(phase) => VERIFY_OTP_UPDATE_PASSWORD.drive(
                state,
                phase,
                env,
                AuthAction::VerifyOtpAndUpdatePassword,
            ),
            AuthAction::ClearError => {
                state.status.clear_error();
                SmallVec::new()
            },
            AuthAction::Reset => {
                *state = AuthState::default();
                SmallVec::new()
            },
            AuthAction::SetUser(user) => {
                state.is_authenticated = user.is_some();
                state.user = user;
                SmallVec::new()
            },
        }
    }
}
