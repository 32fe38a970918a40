//! The login screen, one composable per visual block.

use std::rc::Rc;

use login_core::*;
use login_ui::*;

use crate::state::LoginState;

const LABEL_SP: f32 = 12.0;

pub fn login_screen(state: &LoginState) -> View {
    let form = Column(Modifier::new()
        .fill_max_width()
        .padding(16.0)
        .align_items(AlignItems::Center))
    .child((
        logo_wordmark(),
        input_text(InputSpec {
            value: state.email.get(),
            placeholder: "Email",
            password: None,
            on_change: Rc::new({
                let state = state.clone();
                move |v| state.set_email(v)
            }),
        }),
        Spacer(Modifier::new().height(16.0)),
        input_text(InputSpec {
            value: state.password.get(),
            placeholder: "Password",
            password: Some(PasswordToggle {
                visible: state.show_password.get(),
                on_toggle: Rc::new({
                    let state = state.clone();
                    move || state.toggle_password_visibility()
                }),
            }),
            on_change: Rc::new({
                let state = state.clone();
                move |v| state.set_password(v)
            }),
        })
        .on_submit({
            let state = state.clone();
            move |_| {
                state.submit();
            }
        }),
        forgot_password(),
        login_button(state.button_enabled.get(), {
            let state = state.clone();
            move || {
                state.submit();
            }
        }),
        or_divider(),
        continue_with_facebook(),
    ));

    Surface(
        Modifier::new().fill_max_size(),
        Box(Modifier::new()
            .fill_max_size()
            .justify_content(JustifyContent::Center)
            .align_items(AlignItems::Center))
        .child((
            form,
            sign_up_footer(
                Modifier::new()
                    .absolute()
                    .offset(Some(0.0), None, Some(0.0), Some(0.0)),
            ),
        )),
    )
}

/// Brand wordmark in a 200×120 area.
pub fn logo_wordmark() -> View {
    Box(Modifier::new()
        .size(200.0, 120.0)
        .justify_content(JustifyContent::Center)
        .align_items(AlignItems::Center))
    .child(
        Text("Instagram")
            .size(40.0)
            .weight(FontWeight::BOLD)
            .modifier(Modifier::new().semantics(Semantics::new(Role::Image).label("Instagram"))),
    )
}

pub struct PasswordToggle {
    pub visible: bool,
    pub on_toggle: Rc<dyn Fn()>,
}

/// What differs between the two form fields.
pub struct InputSpec {
    pub value: String,
    pub placeholder: &'static str,
    /// Set for the password field.
    pub password: Option<PasswordToggle>,
    pub on_change: Rc<dyn Fn(String)>,
}

pub fn input_text(input: InputSpec) -> View {
    let on_change = input.on_change;
    let field = TextField(
        input.value,
        input.placeholder,
        Modifier::new()
            .height(50.0)
            .fill_max_width()
            .background(Color::LIGHT_GRAY.copy_alpha(0.1))
            .border(1.0, Color::LIGHT_GRAY.copy_alpha(0.4), 8.0)
            .clip_rounded(8.0),
        move |v| on_change(v),
    )
    .text_size(LABEL_SP);

    match input.password {
        None => field.keyboard_type(KeyboardType::Email),
        Some(toggle) => {
            let th = theme();
            let (icon, label, tint) = if toggle.visible {
                (IconKind::Visibility, "Password visible", th.primary_variant)
            } else {
                (IconKind::VisibilityOff, "Password hidden", Color::LIGHT_GRAY)
            };
            let on_toggle = toggle.on_toggle;
            field
                .keyboard_type(KeyboardType::Password)
                .visual_transformation(if toggle.visible {
                    VisualTransformation::None
                } else {
                    VisualTransformation::Password
                })
                .trailing(IconButton(
                    Icon(icon, label, tint, Modifier::new().size(24.0, 24.0).alpha(0.5)),
                    move || on_toggle(),
                ))
        }
    }
}

pub fn forgot_password() -> View {
    Row(Modifier::new()
        .fill_max_width()
        .justify_content(JustifyContent::FlexEnd))
    .child(
        Text("Forgot password?")
            .color(theme().primary)
            .size(LABEL_SP)
            .weight(FontWeight::SEMIBOLD)
            .modifier(
                Modifier::new()
                    .padding_top(16.0)
                    .on_click(|| log::info!("forgot password tapped")),
            ),
    )
}

pub fn login_button(enabled: bool, on_login: impl Fn() + 'static) -> View {
    let th = theme();
    Box(Modifier::new().fill_max_width().padding_top(32.0)).child(
        Button("Log in", on_login)
            .enabled(enabled)
            .colors(ButtonColors {
                container: th.primary,
                content: th.on_primary,
                disabled_container: th.primary.copy_alpha(0.4),
                disabled_content: Color::WHITE,
            })
            .label_size(14.0)
            .modifier(Modifier::new().fill_max_width().height(40.0).clip_rounded(8.0)),
    )
}

pub fn or_divider() -> View {
    Row(Modifier::new()
        .fill_max_width()
        .padding_top(24.0)
        .align_items(AlignItems::Center))
    .child((
        Divider(Modifier::new().weight(1.0)),
        Text("OR")
            .color(Color::GRAY)
            .size(LABEL_SP)
            .weight(FontWeight::SEMIBOLD)
            .modifier(Modifier::new().padding_horizontal(16.0)),
        Divider(Modifier::new().weight(1.0)),
    ))
}

pub fn continue_with_facebook() -> View {
    let primary = theme().primary;
    Row(Modifier::new()
        .fill_max_width()
        .padding_top(32.0)
        .justify_content(JustifyContent::Center)
        .align_items(AlignItems::Center))
    .child((
        Icon(
            IconKind::Facebook,
            "Facebook",
            primary,
            Modifier::new().size(24.0, 24.0),
        ),
        Text("Continue with facebook")
            .color(primary)
            .size(LABEL_SP)
            .weight(FontWeight::SEMIBOLD)
            .modifier(Modifier::new().padding_start(8.0)),
    ))
}

/// Divider plus the sign-up prompt; `modifier` places it in the parent.
pub fn sign_up_footer(modifier: Modifier) -> View {
    let label = |text: &str, color: Color| {
        Text(text)
            .color(color)
            .size(LABEL_SP)
            .weight(FontWeight::SEMIBOLD)
            .modifier(Modifier::new().padding_start(8.0))
    };
    Column(modifier).child((
        Divider(Modifier::new()),
        Row(Modifier::new()
            .fill_max_width()
            .padding(24.0)
            .justify_content(JustifyContent::Center)
            .align_items(AlignItems::Center))
        .child((
            label("Don't have an account?", Color::GRAY),
            label("Sign Up.", theme().primary),
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(v: &View) -> Option<&str> {
        match &v.kind {
            ViewKind::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    fn field_input(password: Option<PasswordToggle>) -> InputSpec {
        InputSpec {
            value: "abc".into(),
            placeholder: "Password",
            password,
            on_change: Rc::new(|_| {}),
        }
    }

    #[test]
    fn email_field_uses_email_keyboard_and_no_trailing() {
        let v = input_text(field_input(None));
        let ViewKind::TextField {
            keyboard, visual, ..
        } = &v.kind
        else {
            panic!("not a text field");
        };
        assert_eq!(*keyboard, KeyboardType::Email);
        assert_eq!(*visual, VisualTransformation::None);
        assert!(v.children.is_empty());
    }

    #[test]
    fn password_field_masks_until_visible() {
        for visible in [false, true] {
            let v = input_text(field_input(Some(PasswordToggle {
                visible,
                on_toggle: Rc::new(|| {}),
            })));
            let ViewKind::TextField {
                keyboard, visual, ..
            } = &v.kind
            else {
                panic!("not a text field");
            };
            assert_eq!(*keyboard, KeyboardType::Password);
            let expected = if visible {
                VisualTransformation::None
            } else {
                VisualTransformation::Password
            };
            assert_eq!(*visual, expected);
            assert_eq!(v.children.len(), 1);
        }
    }

    #[test]
    fn visible_password_icon_uses_primary_variant() {
        let th = crate::theme::login_theme();
        let v = with_theme(th, || {
            input_text(field_input(Some(PasswordToggle {
                visible: true,
                on_toggle: Rc::new(|| {}),
            })))
        });
        let icon = &v.children[0].children[0];
        assert!(matches!(
            icon.kind,
            ViewKind::Icon { icon: IconKind::Visibility, tint } if tint == th.primary_variant
        ));
    }

    #[test]
    fn toggle_label_describes_visibility() {
        for (visible, label) in [(false, "Password hidden"), (true, "Password visible")] {
            let v = input_text(field_input(Some(PasswordToggle {
                visible,
                on_toggle: Rc::new(|| {}),
            })));
            let sem = v.children[0].modifier.semantics.clone().unwrap();
            assert_eq!(sem.label.as_deref(), Some(label));
        }
    }

    #[test]
    fn or_divider_weights_both_rules() {
        let row = or_divider();
        assert_eq!(row.children.len(), 3);
        assert_eq!(row.children[0].modifier.flex_grow, Some(1.0));
        assert_eq!(row.children[2].modifier.flex_grow, Some(1.0));
        assert_eq!(text_of(&row.children[1]), Some("OR"));
    }

    #[test]
    fn footer_labels() {
        let col = sign_up_footer(Modifier::new());
        let row = &col.children[1];
        let labels: Vec<_> = row.children.iter().filter_map(text_of).collect();
        assert_eq!(labels, ["Don't have an account?", "Sign Up."]);
    }
}
