//! The seam between the demo states and whatever draws them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Callback registered on a UI widget.
pub type Listener = Box<dyn FnMut()>;

/// Identifier of a spawned target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub usize);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Green,
    Red,
}

/// Rendering, timing and input services the demo states rely on.
///
/// The demo machine uses the presentation itself as its context, so every
/// state reaches it through [`Resume::context_mut`](crate::core::Resume::context_mut).
pub trait Presentation {
    /// Seconds since the host started.
    fn time(&self) -> f32;

    /// Frames rendered since the host started.
    fn frame(&self) -> u64;

    /// Show or hide the full-screen fade cover.
    fn show_cover(&mut self, visible: bool);

    fn set_cover_alpha(&mut self, alpha: f32);

    /// Build the main menu; `on_play` runs whenever the play button is pressed.
    fn show_main_menu(&mut self, on_play: Listener);

    fn set_caption(&mut self, text: &str);

    fn hide_main_menu(&mut self);

    /// Place a new white target `offset` units along the row.
    fn spawn_target(&mut self, offset: f32) -> TargetId;

    fn set_target_color(&mut self, target: TargetId, color: Color);

    fn despawn_target(&mut self, target: TargetId);

    /// The target clicked during the current frame, if any.
    fn poll_click(&mut self) -> Option<TargetId>;
}
