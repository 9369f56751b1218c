//! Sensor-to-screen coordinate transform
//!
//! The touch sensor is mounted rotated 90 degrees relative to the panel
//! scan direction, so a raw sensor point maps to screen space as
//! `screen_x = raw_y`, `screen_y = panel_height - raw_x`. Only this one
//! mounted orientation is supported; a different mounting would need its
//! own transform.
//!
//! Both directions are pure integer functions and exact inverses of each
//! other for raw points with `x <= panel_height`.

use crate::touch::TouchPoint;

/// Map a raw sensor point into screen coordinates
///
/// Raw `x` values beyond `panel_height` saturate to the screen edge; the
/// sensor resolution matches the panel, so in-range samples are exact.
pub fn to_screen(raw: TouchPoint, panel_height: u16) -> TouchPoint {
    TouchPoint {
        x: raw.y,
        y: panel_height.saturating_sub(raw.x),
        strength: raw.strength,
    }
}

/// Inverse of [`to_screen`], mapping a screen point back to sensor space
pub fn to_raw(screen: TouchPoint, panel_height: u16) -> TouchPoint {
    TouchPoint {
        x: panel_height.saturating_sub(screen.y),
        y: screen.x,
        strength: screen.strength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PANEL_HEIGHT: u16 = 240;

    #[test]
    fn maps_rotated_axes() {
        let raw = TouchPoint {
            x: 30,
            y: 100,
            strength: 9,
        };
        let screen = to_screen(raw, PANEL_HEIGHT);
        assert_eq!(
            screen,
            TouchPoint {
                x: 100,
                y: 210,
                strength: 9
            }
        );
    }

    #[test]
    fn origin_maps_to_bottom_left() {
        let screen = to_screen(TouchPoint::ZERO, PANEL_HEIGHT);
        assert_eq!(screen.x, 0);
        assert_eq!(screen.y, PANEL_HEIGHT);
    }

    proptest! {
        #[test]
        fn inverse_round_trips_exactly(
            x in 0u16..=PANEL_HEIGHT,
            y in 0u16..4096,
            strength in 0u8..=255,
        ) {
            let raw = TouchPoint { x, y, strength };
            let there = to_screen(raw, PANEL_HEIGHT);
            let back = to_raw(there, PANEL_HEIGHT);
            prop_assert_eq!(back, raw);
        }
    }
}
