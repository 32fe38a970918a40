use login_core::{Signal, signal};

use crate::validation::login_enabled;

/// Screen-local values. Clones share the same signals.
#[derive(Clone)]
pub struct LoginState {
    pub email: Signal<String>,
    pub password: Signal<String>,
    pub show_password: Signal<bool>,
    pub button_enabled: Signal<bool>,
}

/// Plain copy of a [`LoginState`]. `Debug` never prints the password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginSnapshot {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    pub button_enabled: bool,
}

impl std::fmt::Debug for LoginSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginSnapshot")
            .field("email", &self.email)
            .field("password_len", &self.password.chars().count())
            .field("show_password", &self.show_password)
            .field("button_enabled", &self.button_enabled)
            .finish()
    }
}

impl Default for LoginState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginState {
    pub fn new() -> Self {
        Self {
            email: signal(String::new()),
            password: signal(String::new()),
            show_password: signal(false),
            button_enabled: signal(false),
        }
    }

    pub fn set_email(&self, email: String) {
        self.email.set(email);
        self.recompute();
    }

    pub fn set_password(&self, password: String) {
        self.password.set(password);
        self.recompute();
    }

    pub fn toggle_password_visibility(&self) {
        self.show_password.update(|v| *v = !*v);
        log::debug!("password visible: {}", self.show_password.get());
    }

    /// Login action shared by the button and Enter in the password field.
    /// Returns whether the form was accepted; there is no backend.
    pub fn submit(&self) -> bool {
        if !self.button_enabled.get() {
            log::debug!("login ignored: form incomplete");
            return false;
        }
        self.email.with(|e| log::info!("log in requested for {e}"));
        true
    }

    pub fn snapshot(&self) -> LoginSnapshot {
        LoginSnapshot {
            email: self.email.get(),
            password: self.password.get(),
            show_password: self.show_password.get(),
            button_enabled: self.button_enabled.get(),
        }
    }

    fn recompute(&self) {
        let enabled = self
            .email
            .with(|e| self.password.with(|p| login_enabled(e, p)));
        if enabled != self.button_enabled.get() {
            log::debug!("login button enabled: {enabled}");
        }
        self.button_enabled.set(enabled);
    }
}
