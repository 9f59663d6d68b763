use super::{AsyncPhase, Reducer};
use crate::route::Viewer;
use templateshare_shared::{Role, Session, User};

/// 认证状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// 启动时从持久化存储恢复
    Restore(Option<Session>),
    Login(AsyncPhase<Session>),
    Register(AsyncPhase<()>),
    /// 主动登出，或 token 被服务端拒绝
    Logout,
    ClearError,
}

impl AuthState {
    pub fn from_session(session: Option<Session>) -> Self {
        let mut state = Self::default();
        state.reduce(AuthAction::Restore(session));
        state
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.role() == Some(Role::Admin)
    }

    /// 路由守卫所需的视图
    pub fn viewer(&self) -> Viewer {
        Viewer {
            is_authenticated: self.is_authenticated,
            role: self.role(),
        }
    }

    fn sign_in(&mut self, session: Session) {
        self.token = Some(session.token);
        self.user = Some(session.user);
        self.is_authenticated = true;
    }

    fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
        self.is_authenticated = false;
    }
}

impl Reducer for AuthState {
    type Action = AuthAction;

    fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::Restore(Some(session)) => self.sign_in(session),
            AuthAction::Restore(None) => self.sign_out(),
            AuthAction::Login(AsyncPhase::Pending) | AuthAction::Register(AsyncPhase::Pending) => {
                self.loading = true;
                self.error = None;
            }
            AuthAction::Login(AsyncPhase::Fulfilled(session)) => {
                self.loading = false;
                self.error = None;
                self.sign_in(session);
            }
            AuthAction::Register(AsyncPhase::Fulfilled(())) => {
                self.loading = false;
                self.error = None;
            }
            AuthAction::Login(AsyncPhase::Rejected(message))
            | AuthAction::Register(AsyncPhase::Rejected(message)) => {
                self.loading = false;
                self.error = Some(message);
            }
            AuthAction::Login(AsyncPhase::Cancelled) | AuthAction::Register(AsyncPhase::Cancelled) => {
                self.loading = false;
            }
            AuthAction::Logout => {
                self.sign_out();
                self.loading = false;
                self.error = None;
            }
            AuthAction::ClearError => self.error = None,
        }
    }
}
