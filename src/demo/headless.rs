//! A presentation that draws nothing and records what it was asked to do.

use crate::demo::presentation::{Color, Listener, Presentation, TargetId};
use std::collections::BTreeMap;
use std::fmt;

/// Everything a [`HeadlessScreen`] was asked to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum ScreenEvent {
    CoverShown,
    CoverHidden,
    MenuShown,
    MenuHidden,
    TargetSpawned { target: TargetId, offset: f32 },
    TargetColored { target: TargetId, color: Color },
    TargetDespawned(TargetId),
}

struct Menu {
    caption: String,
    on_play: Listener,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetView {
    pub offset: f32,
    pub color: Color,
}

/// Fixed-timestep presentation with scripted input.
///
/// The host calls [`advance_frame`](Self::advance_frame) after every tick.
/// Clicks registered with [`click`](Self::click) are visible to
/// [`Presentation::poll_click`] until the frame advances.
pub struct HeadlessScreen {
    time: f32,
    frame: u64,
    frame_time: f32,
    cover_visible: bool,
    cover_alpha: f32,
    menu: Option<Menu>,
    targets: BTreeMap<TargetId, TargetView>,
    next_target: usize,
    click: Option<TargetId>,
    events: Vec<ScreenEvent>,
}

impl HeadlessScreen {
    /// Screen advancing `frame_time` seconds per frame.
    pub fn new(frame_time: f32) -> Self {
        Self {
            time: 0.0,
            frame: 0,
            frame_time,
            cover_visible: false,
            cover_alpha: 0.0,
            menu: None,
            targets: BTreeMap::new(),
            next_target: 0,
            click: None,
            events: Vec::new(),
        }
    }

    pub fn advance_frame(&mut self) {
        self.frame += 1;
        self.time += self.frame_time;
        self.click = None;
    }

    /// Click `target` during the current frame.
    pub fn click(&mut self, target: TargetId) {
        self.click = Some(target);
    }

    /// Press the main menu's play button. Returns `false` if no menu is shown.
    pub fn press_play(&mut self) -> bool {
        match self.menu.as_mut() {
            Some(menu) => {
                (menu.on_play)();
                true
            }
            None => false,
        }
    }

    pub fn menu_visible(&self) -> bool {
        self.menu.is_some()
    }

    pub fn caption(&self) -> Option<&str> {
        self.menu.as_ref().map(|menu| menu.caption.as_str())
    }

    pub fn cover_visible(&self) -> bool {
        self.cover_visible
    }

    pub fn cover_alpha(&self) -> f32 {
        self.cover_alpha
    }

    /// Live targets, ordered by id.
    pub fn targets(&self) -> impl Iterator<Item = (TargetId, &TargetView)> + '_ {
        self.targets.iter().map(|(id, view)| (*id, view))
    }

    pub fn target(&self, target: TargetId) -> Option<&TargetView> {
        self.targets.get(&target)
    }

    pub fn events(&self) -> &[ScreenEvent] {
        &self.events
    }
}

impl Default for HeadlessScreen {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

impl fmt::Debug for HeadlessScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessScreen")
            .field("time", &self.time)
            .field("frame", &self.frame)
            .field("cover_visible", &self.cover_visible)
            .field("cover_alpha", &self.cover_alpha)
            .field("caption", &self.caption())
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

impl Presentation for HeadlessScreen {
    fn time(&self) -> f32 {
        self.time
    }

    fn frame(&self) -> u64 {
        self.frame
    }

    fn show_cover(&mut self, visible: bool) {
        if visible != self.cover_visible {
            self.cover_visible = visible;
            self.events.push(if visible {
                ScreenEvent::CoverShown
            } else {
                ScreenEvent::CoverHidden
            });
        }
    }

    fn set_cover_alpha(&mut self, alpha: f32) {
        self.cover_alpha = alpha.clamp(0.0, 1.0);
    }

    fn show_main_menu(&mut self, on_play: Listener) {
        self.menu = Some(Menu {
            caption: String::new(),
            on_play,
        });
        self.events.push(ScreenEvent::MenuShown);
    }

    fn set_caption(&mut self, text: &str) {
        if let Some(menu) = self.menu.as_mut() {
            menu.caption.clear();
            menu.caption.push_str(text);
        }
    }

    fn hide_main_menu(&mut self) {
        if self.menu.take().is_some() {
            self.events.push(ScreenEvent::MenuHidden);
        }
    }

    fn spawn_target(&mut self, offset: f32) -> TargetId {
        let target = TargetId(self.next_target);
        self.next_target += 1;
        self.targets.insert(
            target,
            TargetView {
                offset,
                color: Color::White,
            },
        );
        self.events.push(ScreenEvent::TargetSpawned { target, offset });
        target
    }

    fn set_target_color(&mut self, target: TargetId, color: Color) {
        if let Some(view) = self.targets.get_mut(&target) {
            view.color = color;
            self.events.push(ScreenEvent::TargetColored { target, color });
        }
    }

    fn despawn_target(&mut self, target: TargetId) {
        if self.targets.remove(&target).is_some() {
            self.events.push(ScreenEvent::TargetDespawned(target));
        }
    }

    fn poll_click(&mut self) -> Option<TargetId> {
        self.click
    }
}
