// Screen routing
// The app has four screens: landing, login and registration placeholders, and chat.

use log::debug;

pub const BRAND: &str = "ChatVerse";
pub const TAGLINE: &str =
    "Connect, chat, and share moments with friends and family in a beautiful, modern messaging experience.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    Login,
    Register,
    Chat,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Landing => "Home",
            Page::Login => "Login",
            Page::Register => "Sign Up",
            Page::Chat => "Chats",
        }
    }

    /// Login and registration are placeholders without any behavior
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Page::Login | Page::Register)
    }
}

pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 4] = [
    Feature {
        title: "Real-time Messaging",
        description: "Instant messaging with lightning-fast delivery",
    },
    Feature {
        title: "Group Chats",
        description: "Create and join group conversations with friends",
    },
    Feature {
        title: "Lightning Fast",
        description: "Optimized for speed and performance",
    },
    Feature {
        title: "Secure & Private",
        description: "End-to-end encryption for your privacy",
    },
];

/// Navigation stack. Always holds at least the landing page.
#[derive(Debug)]
pub struct Router {
    stack: Vec<Page>,
}

impl Default for Router {
    fn default() -> Self {
        Router { stack: vec![Page::Landing] }
    }
}

impl Router {
    pub fn current(&self) -> Page {
        self.stack.last().copied().unwrap_or(Page::Landing)
    }

    /// Open `page`. Navigating to the current page is a no-op, and going to
    /// the landing page resets the history.
    pub fn navigate(&mut self, page: Page) {
        if page == self.current() {
            return;
        }
        debug!("Navigating from {:?} to {:?}", self.current(), page);
        if page == Page::Landing {
            self.stack.truncate(1);
        } else {
            self.stack.push(page);
        }
    }

    /// Go back one page. Returns false when already on the landing page.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        let left = self.stack.pop();
        debug!("Leaving {:?}, back to {:?}", left, self.current());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_starts_on_landing() {
        let router = Router::default();
        assert_eq!(router.current(), Page::Landing);
    }

    #[test]
    fn test_router_navigation() {
        let mut router = Router::default();
        router.navigate(Page::Login);
        router.navigate(Page::Register);
        assert_eq!(router.current(), Page::Register);

        assert!(router.back());
        assert_eq!(router.current(), Page::Login);
        assert!(router.back());
        assert_eq!(router.current(), Page::Landing);
        assert!(!router.back());
        assert_eq!(router.current(), Page::Landing);
    }

    #[test]
    fn test_navigate_to_same_page_and_home() {
        let mut router = Router::default();
        router.navigate(Page::Chat);
        router.navigate(Page::Chat);
        assert!(router.back());
        assert_eq!(router.current(), Page::Landing);

        router.navigate(Page::Register);
        router.navigate(Page::Chat);
        router.navigate(Page::Landing);
        assert_eq!(router.current(), Page::Landing);
        assert!(!router.back());
    }

    #[test]
    fn test_placeholders() {
        assert!(Page::Login.is_placeholder());
        assert!(Page::Register.is_placeholder());
        assert!(!Page::Chat.is_placeholder());
        assert_eq!(FEATURES.len(), 4);
    }
}
