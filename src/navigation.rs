//! Navigation affordances derived from session state

use crate::types::Session;

/// Pages of the demo site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Signup,
    Upload,
}

impl Page {
    pub fn href(self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::Login => "login.html",
            Page::Signup => "signup.html",
            Page::Upload => "upload.html",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Login => "Login",
            Page::Signup => "Sign Up",
            Page::Upload => "Upload",
        }
    }

    /// Resolve the last path segment of a location, e.g. `/site/upload.html`
    pub fn from_path(path: &str) -> Option<Self> {
        let last = path.rsplit('/').next().unwrap_or(path);
        [Page::Home, Page::Login, Page::Signup, Page::Upload]
            .into_iter()
            .find(|page| page.href() == last)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub page: Page,
    pub active: bool,
}

/// What the navigation bar shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationView {
    pub items: Vec<NavItem>,
    pub show_signup: bool,
    pub show_logout: bool,
    pub user_name: Option<String>,
}

impl NavigationView {
    pub fn derive(session: Option<&Session>, current: Option<Page>) -> Self {
        let logged_in = session.is_some();
        let items = [Page::Home, Page::Upload, Page::Login]
            .into_iter()
            .chain((!logged_in).then_some(Page::Signup))
            .map(|page| NavItem {
                page,
                active: current == Some(page),
            })
            .collect();

        Self {
            items,
            show_signup: !logged_in,
            show_logout: logged_in,
            user_name: session.map(|s| s.user_name.clone()),
        }
    }
}

/// Whether the upload form may be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadAccess {
    Allowed,
    /// Replace the form with the "Authentication Required" panel
    AuthRequired { login: Page, signup: Page },
}

pub fn upload_gate(session: Option<&Session>) -> UploadAccess {
    match session {
        Some(_) => UploadAccess::Allowed,
        None => UploadAccess::AuthRequired {
            login: Page::Login,
            signup: Page::Signup,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            auth_token: "t".to_string(),
            user_email: "ana@example.com".to_string(),
            user_name: "ana".to_string(),
        }
    }

    #[test]
    fn test_logged_out_navigation() {
        let view = NavigationView::derive(None, Page::from_path("/site/signup.html"));
        assert!(view.show_signup);
        assert!(!view.show_logout);

        let active: Vec<Page> = view.items.iter().filter(|i| i.active).map(|i| i.page).collect();
        assert_eq!(active, vec![Page::Signup]);
    }

    #[test]
    fn test_logged_in_navigation_hides_signup() {
        let session = session();
        let view = NavigationView::derive(Some(&session), Some(Page::Upload));
        assert!(!view.show_signup);
        assert!(view.show_logout);
        assert!(view.items.iter().all(|i| i.page != Page::Signup));
        assert_eq!(view.user_name.as_deref(), Some("ana"));
    }

    #[test]
    fn test_upload_gate() {
        assert!(matches!(upload_gate(None), UploadAccess::AuthRequired { .. }));
        assert_eq!(upload_gate(Some(&session())), UploadAccess::Allowed);
    }
}
