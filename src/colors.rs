//! Border color/width decision rule (spec.md 4.4); resolving a named color
//! to an X11 pixel value lives in `xserver::x11rb` (`alloc_named_color`).

use crate::config;

/// Border width and named color for a single client, given its focus state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderStyle {
    /// Border width in pixels.
    pub width: u16,
    /// Named X color to paint the border with.
    pub color: &'static str,
}

/// Decide the border style for a non-dock client.
///
/// - off the current workspace: zero-width border (it's unmapped anyway,
///   but this keeps the invariant simple to state and test)
/// - focused: `BORDER_PX_FOCUSED` in the focus color
/// - otherwise: `BORDER_PX_UNFOCUSED` in the unfocus color
pub fn style_for(on_current_workspace: bool, is_focused: bool) -> BorderStyle {
    if !on_current_workspace {
        return BorderStyle {
            width: 0,
            color: config::BORDER_COLOR_UNFOCUSED,
        };
    }

    if is_focused {
        BorderStyle {
            width: config::BORDER_PX_FOCUSED,
            color: config::BORDER_COLOR_FOCUSED,
        }
    } else {
        BorderStyle {
            width: config::BORDER_PX_UNFOCUSED,
            color: config::BORDER_COLOR_UNFOCUSED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_workspace_has_zero_width() {
        assert_eq!(style_for(false, true).width, 0);
    }

    #[test]
    fn focused_gets_focused_style() {
        let s = style_for(true, true);
        assert_eq!(s.width, config::BORDER_PX_FOCUSED);
        assert_eq!(s.color, config::BORDER_COLOR_FOCUSED);
    }

    #[test]
    fn unfocused_on_workspace_gets_unfocused_style() {
        let s = style_for(true, false);
        assert_eq!(s.width, config::BORDER_PX_UNFOCUSED);
        assert_eq!(s.color, config::BORDER_COLOR_UNFOCUSED);
    }
}
