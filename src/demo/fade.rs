//! Time-based tween of the fade cover's alpha.

use crate::demo::presentation::Presentation;

/// Linear alpha tween driven by [`Presentation::time`].
///
/// The clock starts on the first call to [`advance`](Fade::advance).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    started_at: Option<f32>,
}

impl Fade {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            started_at: None,
        }
    }

    /// Opaque cover becoming transparent.
    pub fn reveal(duration: f32) -> Self {
        Self::new(1.0, 0.0, duration)
    }

    /// Transparent cover becoming opaque.
    pub fn conceal(duration: f32) -> Self {
        Self::new(0.0, 1.0, duration)
    }

    /// Write the cover alpha for the current time.
    ///
    /// Returns `true` while the tween is running. Once the duration has
    /// elapsed the final alpha is written and `false` is returned.
    pub fn advance<P: Presentation + ?Sized>(&mut self, screen: &mut P) -> bool {
        let now = screen.time();
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now - started_at;

        if elapsed < self.duration {
            let percent = elapsed / self.duration;
            screen.set_cover_alpha(self.from + (self.to - self.from) * percent);
            true
        } else {
            screen.set_cover_alpha(self.to);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::HeadlessScreen;

    #[test]
    fn reveal_goes_from_opaque_to_transparent() {
        let mut screen = HeadlessScreen::new(0.25);
        let mut fade = Fade::reveal(1.0);

        let mut alphas = Vec::new();
        while fade.advance(&mut screen) {
            alphas.push(screen.cover_alpha());
            screen.advance_frame();
        }

        assert_eq!(alphas, vec![1.0, 0.75, 0.5, 0.25]);
        assert_eq!(screen.cover_alpha(), 0.0);
    }

    #[test]
    fn clock_starts_on_first_advance() {
        let mut screen = HeadlessScreen::new(0.5);
        for _ in 0..10 {
            screen.advance_frame();
        }
        let mut fade = Fade::conceal(1.0);

        assert!(fade.advance(&mut screen));
        assert_eq!(screen.cover_alpha(), 0.0);
        screen.advance_frame();
        assert!(fade.advance(&mut screen));
        assert_eq!(screen.cover_alpha(), 0.5);
        screen.advance_frame();
        assert!(!fade.advance(&mut screen));
        assert_eq!(screen.cover_alpha(), 1.0);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut screen = HeadlessScreen::new(0.1);
        let mut fade = Fade::conceal(0.0);

        assert!(!fade.advance(&mut screen));
        assert_eq!(screen.cover_alpha(), 1.0);
    }
}
