use login_core::{Color, Theme};

pub const PRIMARY: Color = Color(0x00, 0x95, 0xF6, 255);
pub const PRIMARY_VARIANT: Color = Color(0x00, 0x37, 0x6B, 255);
pub const ON_SURFACE: Color = Color(0x26, 0x26, 0x26, 255);

/// Light brand theme.
pub fn login_theme() -> Theme {
    Theme {
        background: Color::WHITE,
        surface: Color::WHITE,
        on_surface: ON_SURFACE,
        on_surface_variant: Color::GRAY,
        primary: PRIMARY,
        primary_variant: PRIMARY_VARIANT,
        on_primary: Color::WHITE,
        outline: Color::LIGHT_GRAY,
        focus: PRIMARY,
        selection: PRIMARY.copy_alpha(0.25),
    }
}
