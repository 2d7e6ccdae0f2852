/// Modal popup with fade in/out.
///
/// `show` fades the frame in and only then makes it interactive. `hide`
/// cuts interactivity at once and fades out. Either call cancels whatever
/// fade was running, so a stale `Hidden` can never arrive after a fresh
/// `show` (and vice versa).

use super::tween::{Ease, Tweens, VisualId};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PopupEvent {
    Shown,
    Hidden,
}

#[derive(Clone, Copy, Debug)]
enum Step {
    FadedIn,
    HoldDone,
    FadedOut,
}

pub struct GamePopup {
    visual: VisualId,
    text: String,
    alpha: f32,
    active: bool,
    interactive: bool,
    fade_ticks: u32,
    auto_hide: Option<u32>,
    tweens: Tweens<Step>,
}

impl GamePopup {
    pub fn new(slot: u8, text: &str, fade_ticks: u32) -> Self {
        GamePopup {
            visual: VisualId::Popup(slot),
            text: text.to_string(),
            alpha: 0.0,
            active: false,
            interactive: false,
            fade_ticks,
            auto_hide: None,
            tweens: Tweens::new(),
        }
    }

    /// Fade in, optionally replacing the text. With `auto_hide_after`, the
    /// popup stays fully shown for that many ticks and then fades out.
    pub fn show(&mut self, text: Option<&str>, auto_hide_after: Option<u32>) {
        if let Some(t) = text.filter(|t| !t.is_empty()) {
            self.text = t.to_string();
        }
        self.active = true;
        self.alpha = 0.0;
        self.interactive = false;
        self.auto_hide = auto_hide_after.filter(|&n| n > 0);
        self.tweens.start(self.visual, 0.0, 1.0, self.fade_ticks, Ease::Linear, Step::FadedIn);
    }

    pub fn hide(&mut self) {
        self.interactive = false;
        self.auto_hide = None;
        self.tweens.start(self.visual, self.alpha, 0.0, self.fade_ticks, Ease::Linear, Step::FadedOut);
    }

    pub fn tick(&mut self) -> Vec<PopupEvent> {
        let mut events = Vec::new();
        let frame = self.tweens.advance();
        for (_, v) in frame.values {
            self.alpha = v;
        }
        for step in frame.done {
            match step {
                Step::FadedIn => {
                    self.interactive = true;
                    events.push(PopupEvent::Shown);
                    if let Some(hold) = self.auto_hide.take() {
                        self.tweens.start(self.visual, 1.0, 1.0, hold, Ease::Linear, Step::HoldDone);
                    }
                }
                Step::HoldDone => self.hide(),
                Step::FadedOut => {
                    self.active = false;
                    events.push(PopupEvent::Hidden);
                }
            }
        }
        events
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}
