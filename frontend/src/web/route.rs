//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

use clinic_shared::UserRole;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 控制面板 (`/` 与 `/Dashboard`)
    #[default]
    Dashboard,
    Profile,
    Patients,
    Appointments,
    Users,
    Reports,
    BookAppointment,
    Login,
    Register,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/Dashboard" => Self::Dashboard,
            "/Profile" => Self::Profile,
            "/Patients" => Self::Patients,
            "/Appointments" => Self::Appointments,
            "/Users" => Self::Users,
            "/Reports" => Self::Reports,
            "/BookAppointment" => Self::BookAppointment,
            "/Auth/Login" => Self::Login,
            "/Auth/Register" => Self::Register,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Dashboard => "/Dashboard",
            Self::Profile => "/Profile",
            Self::Patients => "/Patients",
            Self::Appointments => "/Appointments",
            Self::Users => "/Users",
            Self::Reports => "/Reports",
            Self::BookAppointment => "/BookAppointment",
            Self::Login => "/Auth/Login",
            Self::Register => "/Auth/Register",
            Self::NotFound => "/404",
        }
    }

    /// 是否在主布局内渲染（需要登录）
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register | Self::NotFound)
    }

    /// 已登录用户访问登录/注册页时直接进入面板
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 守卫要求的角色；空表示任意已登录用户
    pub fn required_roles(&self) -> &'static [UserRole] {
        match self {
            Self::Patients | Self::Appointments => &[UserRole::Admin, UserRole::Doctor],
            Self::Users | Self::Reports => &[UserRole::Admin],
            Self::BookAppointment => &[UserRole::Patient],
            _ => &[],
        }
    }

    /// 登录成功后的落点
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_admin::auth::allowed_roles;

    const ROUTES: [AppRoute; 9] = [
        AppRoute::Dashboard,
        AppRoute::Profile,
        AppRoute::Patients,
        AppRoute::Appointments,
        AppRoute::Users,
        AppRoute::Reports,
        AppRoute::BookAppointment,
        AppRoute::Login,
        AppRoute::Register,
    ];

    #[test]
    fn paths_round_trip() {
        for route in ROUTES {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::NotFound);
    }

    #[test]
    fn guarded_roles_agree_with_permission_table() {
        for route in ROUTES.into_iter().filter(|r| !r.required_roles().is_empty()) {
            assert_eq!(allowed_roles(route.to_path()), Some(route.required_roles()));
        }
    }

    #[test]
    fn public_pages_skip_the_layout() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::Register.requires_auth());
        assert!(AppRoute::Profile.requires_auth());
        assert!(AppRoute::Register.should_redirect_when_authenticated());
    }
}
