use iced::widget::{button, container};
use iced::{Background, Border, Color, Theme};

pub const PANEL: Color = Color::from_rgba(40.0 / 255.0, 44.0 / 255.0, 52.0 / 255.0, 0.95);
pub const FIELD: Color = Color::from_rgba(55.0 / 255.0, 60.0 / 255.0, 70.0 / 255.0, 0.95);
pub const EDGE: Color = Color::from_rgb(0x3d as f32 / 255.0, 0x3d as f32 / 255.0, 0x3d as f32 / 255.0);
pub const MUTED: Color = Color::from_rgb(0x8f as f32 / 255.0, 0x9a as f32 / 255.0, 0xab as f32 / 255.0);
pub const DANGER: Color = Color::from_rgb(1.0, 0x44 as f32 / 255.0, 0x55 as f32 / 255.0);

struct Accent {
    base: Color,
    hover: Color,
    pressed: Color,
}

fn blue() -> Accent {
    Accent {
        base: Color::from_rgb8(0x4a, 0x9e, 0xff),
        hover: Color::from_rgb8(0x3d, 0x8c, 0xe4),
        pressed: Color::from_rgb8(0x32, 0x78, 0xc7),
    }
}

fn green() -> Accent {
    Accent {
        base: Color::from_rgb8(0x45, 0xa1, 0x65),
        hover: Color::from_rgb8(0x3d, 0x89, 0x56),
        pressed: Color::from_rgb8(0x35, 0x7a, 0x4b),
    }
}

fn purple() -> Accent {
    Accent {
        base: Color::from_rgb8(0x9b, 0x59, 0xb6),
        hover: Color::from_rgb8(0x8e, 0x44, 0xad),
        pressed: Color::from_rgb8(0x7d, 0x3c, 0x98),
    }
}

fn panel_with_radius(radius: f32) -> container::Style {
    container::Style {
        background: Some(Background::Color(PANEL)),
        border: Border {
            color: EDGE,
            width: 1.0,
            radius: radius.into(),
        },
        text_color: Some(Color::WHITE),
        ..container::Style::default()
    }
}

/// Main window and dialogs.
pub fn panel(_theme: &Theme) -> container::Style {
    panel_with_radius(20.0)
}

/// Small floating panels (suggestions, rephrase).
pub fn popup(_theme: &Theme) -> container::Style {
    panel_with_radius(10.0)
}

pub fn field(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(FIELD)),
        border: Border {
            radius: 8.0.into(),
            ..Border::default()
        },
        text_color: Some(MUTED),
        ..container::Style::default()
    }
}

fn accent(accent: &Accent, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Hovered => accent.hover,
        button::Status::Pressed => accent.pressed,
        button::Status::Active => accent.base,
        button::Status::Disabled => Color {
            a: 0.5,
            ..accent.base
        },
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color: Color::WHITE,
        border: Border {
            radius: 12.0.into(),
            ..Border::default()
        },
        ..button::Style::default()
    }
}

pub fn primary(_theme: &Theme, status: button::Status) -> button::Style {
    accent(&blue(), status)
}

pub fn rephrase(_theme: &Theme, status: button::Status) -> button::Style {
    accent(&green(), status)
}

pub fn complete(_theme: &Theme, status: button::Status) -> button::Style {
    accent(&purple(), status)
}

pub fn close(_theme: &Theme, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Hovered | button::Status::Pressed => Some(Background::Color(DANGER)),
        _ => None,
    };

    button::Style {
        background,
        text_color: Color::WHITE,
        border: Border {
            radius: 15.0.into(),
            ..Border::default()
        },
        ..button::Style::default()
    }
}

pub fn suggestion(_theme: &Theme, status: button::Status) -> button::Style {
    let blue = blue();
    let background = match status {
        button::Status::Hovered => Some(Background::Color(blue.hover)),
        button::Status::Pressed => Some(Background::Color(blue.base)),
        _ => None,
    };

    button::Style {
        background,
        text_color: Color::WHITE,
        border: Border {
            radius: 4.0.into(),
            ..Border::default()
        },
        ..button::Style::default()
    }
}
