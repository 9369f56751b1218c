//! Touch data model and the acquisition/consumer handoff
//!
//! The touch controller reports up to [`MAX_POINTS`] simultaneous contacts
//! per acquisition. A decoded acquisition is a [`TouchFrame`]: a fixed
//! capacity array of [`TouchPoint`] records plus an explicit length, so the
//! acquisition path never allocates.
//!
//! [`TouchState`] is the single handoff point between the acquisition task
//! and the polling consumer. Delivery is edge-triggered: exactly one frame
//! is in flight, and a later publish overwrites an unread frame
//! (last-write-wins, no queueing).

/// Maximum number of simultaneous contacts the controller reports
pub const MAX_POINTS: usize = 5;

/// One decoded contact
///
/// `strength` is the controller's raw pressure/contact-quality metric and
/// has no defined unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchPoint {
    /// Horizontal coordinate
    pub x: u16,
    /// Vertical coordinate
    pub y: u16,
    /// Raw contact strength
    pub strength: u8,
}

impl TouchPoint {
    /// The all-zero point, used to fill unused frame slots
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        strength: 0,
    };
}

/// One decoded acquisition: up to [`MAX_POINTS`] contacts
///
/// Slots beyond `len` are stale and are never handed out; the only way to
/// observe the contacts is through [`TouchFrame::points`], which slices to
/// the valid prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchFrame {
    points: [TouchPoint; MAX_POINTS],
    len: u8,
    active: bool,
}

impl TouchFrame {
    /// An inactive frame with no contacts
    pub const fn empty() -> Self {
        Self {
            points: [TouchPoint::ZERO; MAX_POINTS],
            len: 0,
            active: false,
        }
    }

    /// Build a frame from decoded points
    ///
    /// At most [`MAX_POINTS`] points are kept. The frame is active exactly
    /// when at least one point is present.
    pub fn from_points(points: &[TouchPoint]) -> Self {
        let mut frame = Self::empty();
        let len = points.len().min(MAX_POINTS);
        frame.points[..len].copy_from_slice(&points[..len]);
        frame.len = len as u8;
        frame.active = len > 0;
        frame
    }

    /// Number of valid contacts
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True if the frame carries no contacts
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if the panel was being touched when this frame was acquired
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The valid contacts, in controller report order
    pub fn points(&self) -> &[TouchPoint] {
        &self.points[..self.len as usize]
    }

    /// The first contact, if any
    pub fn primary(&self) -> Option<TouchPoint> {
        self.points().first().copied()
    }

    /// Apply a per-point mapping (e.g. the sensor-to-screen transform)
    pub fn map_points(mut self, f: impl Fn(TouchPoint) -> TouchPoint) -> Self {
        for p in self.points[..self.len as usize].iter_mut() {
            *p = f(*p);
        }
        self
    }
}

impl Default for TouchFrame {
    fn default() -> Self {
        Self::empty()
    }
}

/// Handoff state between the acquisition task and the polling consumer
///
/// The acquisition side calls [`publish`](Self::publish); the consumer
/// calls [`take_if_new`](Self::take_if_new), which atomically (with respect
/// to whatever lock wraps this state) reads the latest frame and clears the
/// unread flag. No history is retained.
#[derive(Debug)]
pub struct TouchState {
    frame: TouchFrame,
    unread: bool,
}

impl TouchState {
    /// Create an empty state with nothing to consume
    pub const fn new() -> Self {
        Self {
            frame: TouchFrame::empty(),
            unread: false,
        }
    }

    /// Publish a new frame, overwriting any unread one
    pub fn publish(&mut self, frame: TouchFrame) {
        self.frame = frame;
        self.unread = true;
    }

    /// Take the latest frame if it has not been consumed yet
    pub fn take_if_new(&mut self) -> Option<TouchFrame> {
        if self.unread {
            self.unread = false;
            Some(self.frame)
        } else {
            None
        }
    }
}

impl Default for TouchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_is_inactive() {
        let frame = TouchFrame::empty();
        assert!(!frame.is_active());
        assert!(frame.is_empty());
        assert_eq!(frame.points(), &[]);
        assert_eq!(frame.primary(), None);
    }

    #[test]
    fn from_points_sets_length_and_active() {
        let pts = [
            TouchPoint {
                x: 10,
                y: 20,
                strength: 30,
            },
            TouchPoint {
                x: 40,
                y: 50,
                strength: 60,
            },
        ];
        let frame = TouchFrame::from_points(&pts);
        assert!(frame.is_active());
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.points(), &pts);
        assert_eq!(frame.primary(), Some(pts[0]));
    }

    #[test]
    fn from_points_clamps_to_capacity() {
        let pts = [TouchPoint {
            x: 1,
            y: 2,
            strength: 3,
        }; 7];
        let frame = TouchFrame::from_points(&pts);
        assert_eq!(frame.len(), MAX_POINTS);
    }

    #[test]
    fn take_if_new_is_edge_triggered() {
        let mut state = TouchState::new();
        assert_eq!(state.take_if_new(), None);

        let frame = TouchFrame::from_points(&[TouchPoint {
            x: 5,
            y: 6,
            strength: 7,
        }]);
        state.publish(frame);
        assert_eq!(state.take_if_new(), Some(frame));
        // Already consumed - not re-delivered
        assert_eq!(state.take_if_new(), None);
    }

    #[test]
    fn publish_overwrites_unread_frame() {
        let mut state = TouchState::new();
        let first = TouchFrame::from_points(&[TouchPoint {
            x: 1,
            y: 1,
            strength: 1,
        }]);
        let second = TouchFrame::from_points(&[TouchPoint {
            x: 2,
            y: 2,
            strength: 2,
        }]);

        state.publish(first);
        state.publish(second);

        // The first frame is lost - last write wins
        assert_eq!(state.take_if_new(), Some(second));
        assert_eq!(state.take_if_new(), None);
    }

    #[test]
    fn map_points_only_touches_valid_prefix() {
        let frame = TouchFrame::from_points(&[TouchPoint {
            x: 10,
            y: 20,
            strength: 1,
        }]);
        let mapped = frame.map_points(|p| TouchPoint {
            x: p.x + 1,
            y: p.y + 1,
            strength: p.strength,
        });
        assert_eq!(mapped.len(), 1);
        assert_eq!(
            mapped.points()[0],
            TouchPoint {
                x: 11,
                y: 21,
                strength: 1
            }
        );
    }
}
