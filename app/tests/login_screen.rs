use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use instagram_login::app;
use login_core::*;
use login_ui::{Interactions, TextFieldState, layout_and_paint};

struct Screen {
    sched: Scheduler,
    states: HashMap<u64, Rc<RefCell<TextFieldState>>>,
    frame: Frame,
}

impl Screen {
    fn new() -> Self {
        let mut sched = Scheduler::new();
        sched.size = (412, 892);
        let states = HashMap::new();
        let frame = compose(&mut sched, &states);
        Self {
            sched,
            states,
            frame,
        }
    }

    fn recompose(&mut self) {
        self.frame = compose(&mut self.sched, &self.states);
    }

    fn sem(&self, role: Role, label: &str) -> &SemNode {
        self.frame
            .semantics_nodes
            .iter()
            .find(|n| n.role == role && n.label.as_deref() == Some(label))
            .unwrap_or_else(|| panic!("no {role:?} labelled {label:?}"))
    }

    fn hit(&self, id: u64) -> Option<&HitRegion> {
        self.frame.hit_regions.iter().find(|h| h.id == id)
    }

    fn type_into(&mut self, field: &str, text: &str) {
        let id = self.sem(Role::TextField, field).id;
        let cb = self
            .hit(id)
            .and_then(|h| h.on_text_change.clone())
            .expect("text field callback");
        cb(text.to_string());
        self.recompose();
    }

    fn click(&mut self, role: Role, label: &str) {
        let id = self.sem(role, label).id;
        let cb = self
            .hit(id)
            .and_then(|h| h.on_click.clone())
            .expect("click target");
        cb();
        self.recompose();
    }

    fn login_button(&self) -> &SemNode {
        self.sem(Role::Button, "Log in")
    }

    fn painted(&self, needle: &str) -> bool {
        self.frame
            .scene
            .nodes
            .iter()
            .any(|n| matches!(n, SceneNode::Text { text, .. } if text == needle))
    }
}

fn compose(sched: &mut Scheduler, states: &HashMap<u64, Rc<RefCell<TextFieldState>>>) -> Frame {
    sched
        .compose(app, |root, size| {
            layout_and_paint(root, size, states, &Interactions::default(), None)
        })
        .expect("layout")
}

#[test]
fn login_starts_disabled_without_click_target() {
    let s = Screen::new();
    let btn = s.login_button();
    assert!(!btn.enabled);
    assert!(s.hit(btn.id).is_none());
}

#[test]
fn valid_email_and_password_enable_login() {
    let mut s = Screen::new();
    s.type_into("Email", "a@b.com");
    assert!(!s.login_button().enabled);

    s.type_into("Password", "x");
    let btn = s.login_button();
    assert!(btn.enabled);
    assert!(s.hit(btn.id).and_then(|h| h.on_click.as_ref()).is_some());

    s.type_into("Email", "a@b");
    assert!(!s.login_button().enabled);
}

#[test]
fn clearing_password_disables_login() {
    let mut s = Screen::new();
    s.type_into("Email", "a@b.com");
    s.type_into("Password", "x");
    s.type_into("Password", "");
    assert!(!s.login_button().enabled);
}

#[test]
fn password_is_masked_until_toggled() {
    let mut s = Screen::new();
    s.type_into("Password", "abc");
    assert!(s.painted("•••"));
    assert!(!s.painted("abc"));

    s.click(Role::Button, "Password hidden");
    assert!(s.painted("abc"));
    let _ = s.sem(Role::Button, "Password visible");

    s.click(Role::Button, "Password visible");
    assert!(s.painted("•••"));
}

#[test]
fn toggling_visibility_keeps_login_state() {
    let mut s = Screen::new();
    s.type_into("Email", "a@b.com");
    s.type_into("Password", "x");
    s.click(Role::Button, "Password hidden");
    assert!(s.login_button().enabled);
}

#[test]
fn static_labels_are_present() {
    let s = Screen::new();
    for label in [
        "Forgot password?",
        "OR",
        "Continue with facebook",
        "Don't have an account?",
        "Sign Up.",
    ] {
        s.sem(Role::Text, label);
    }
    s.sem(Role::Image, "Instagram");
    s.sem(Role::Image, "Facebook");
}

#[test]
fn email_field_asks_for_email_keyboard() {
    let s = Screen::new();
    let email = s.sem(Role::TextField, "Email").id;
    let password = s.sem(Role::TextField, "Password").id;
    assert_eq!(s.hit(email).map(|h| h.keyboard), Some(KeyboardType::Email));
    assert_eq!(
        s.hit(password).map(|h| h.keyboard),
        Some(KeyboardType::Password)
    );
}

#[test]
fn footer_sits_at_the_bottom() {
    let s = Screen::new();
    let sign_up = s.sem(Role::Text, "Sign Up.");
    let login = s.login_button();
    assert!(sign_up.rect.y > login.rect.y);
    assert!(sign_up.rect.y + sign_up.rect.h <= 892.0);
}

#[test]
fn wordmark_is_centered_horizontally() {
    let s = Screen::new();
    let logo = s.sem(Role::Image, "Instagram");
    let center = logo.rect.x + logo.rect.w / 2.0;
    assert!((center - 206.0).abs() <= 1.0, "logo center x = {center}");
}

#[test]
fn form_fields_keep_full_width() {
    let s = Screen::new();
    let email = s.sem(Role::TextField, "Email");
    assert_eq!((email.rect.x, email.rect.w), (16.0, 380.0));
}

#[test]
fn enter_in_password_field_is_the_login_action() {
    let s = Screen::new();
    let email = s.sem(Role::TextField, "Email").id;
    let password = s.sem(Role::TextField, "Password").id;
    assert!(s.hit(email).is_some_and(|h| h.on_text_submit.is_none()));
    let submit = s
        .hit(password)
        .and_then(|h| h.on_text_submit.clone())
        .expect("password submit");
    submit(String::new());
}
