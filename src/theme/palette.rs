use bevy::prelude::*;

/// Window clear color: a polar night sky.
pub const NIGHT_SKY: Color = Color::srgb(0.035, 0.075, 0.16);

/// Near-white text for dark backgrounds
pub const LABEL_TEXT: Color = Color::srgb(0.92, 0.95, 0.98);

/// Near-white text for headers
pub const HEADER_TEXT: Color = Color::srgb(0.92, 0.95, 0.98);

/// Dark text for buttons
pub const BUTTON_TEXT: Color = Color::srgb(0.08, 0.12, 0.2);
/// #9fd4ef
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.624, 0.831, 0.937);
/// #c3e6f7
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.765, 0.902, 0.969);
/// #74a8c9
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.455, 0.659, 0.788);

/// Semi-transparent scrim behind overlay menus.
pub const MENU_SCRIM: Color = Color::srgba(0.02, 0.05, 0.12, 0.85);
