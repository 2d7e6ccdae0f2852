/// Intro typewriter.
///
/// Flow: panel slides in → each line is typed one char at a time →
/// short pause (or Enter) → next line → after the last line the panel
/// slides out and `Finished` fires. Shown once, before the hub unlocks.
///
/// ## Enter while typing
///   1st press: speed up (`char_delay * fast_factor`)
///   2nd press: reveal the rest of the line at once
///   after the line is done: go to the next line immediately

use super::tween::{Ease, Tweens, VisualId};
use crate::config::IntroConfig;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IntroEvent {
    /// One more character became visible.
    Blip,
    Finished,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Stage {
    Hidden,
    SlidingIn,
    Typing,
    LinePause { left: u32 },
    SlidingOut,
    Done,
}

#[derive(Clone, Copy, Debug)]
enum Slide {
    In,
    Out,
}

pub struct Intro {
    lines: Vec<Vec<char>>,
    char_delay: f32,
    fast_factor: f32,
    pause_ticks: u32,
    slide_ticks: u32,

    stage: Stage,
    line: usize,
    visible: usize,
    acc: f32,
    fast: bool,
    skip: bool,
    /// 1.0 = fully below the screen, 0.0 = in place.
    offset: f32,
    finished_sent: bool,
    tweens: Tweens<Slide>,
}

impl Intro {
    pub fn new(cfg: &IntroConfig) -> Self {
        Intro {
            lines: cfg.lines.iter().map(|l| l.chars().collect()).collect(),
            char_delay: cfg.char_delay_ticks as f32,
            fast_factor: cfg.fast_factor,
            pause_ticks: cfg.after_line_pause_ticks,
            slide_ticks: cfg.slide_ticks,
            stage: Stage::Hidden,
            line: 0,
            visible: 0,
            acc: 0.0,
            fast: false,
            skip: false,
            offset: 1.0,
            finished_sent: false,
            tweens: Tweens::new(),
        }
    }

    /// Start the sequence from the first line. Ignored once finished.
    pub fn show(&mut self) {
        if self.finished_sent {
            return;
        }
        self.line = 0;
        self.visible = 0;
        self.offset = 1.0;
        self.stage = Stage::SlidingIn;
        self.tweens.start(VisualId::Intro, 1.0, 0.0, self.slide_ticks, Ease::OutBack, Slide::In);
    }

    pub fn is_shown(&self) -> bool {
        !matches!(self.stage, Stage::Hidden | Stage::Done)
    }

    pub fn is_typing(&self) -> bool {
        self.stage == Stage::Typing
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Visible part of the current line.
    pub fn visible_text(&self) -> String {
        match self.lines.get(self.line) {
            Some(chars) if matches!(self.stage, Stage::Typing | Stage::LinePause { .. }) => {
                chars[..self.visible.min(chars.len())].iter().collect()
            }
            _ => String::new(),
        }
    }

    /// Enter / confirm.
    pub fn confirm(&mut self) {
        match self.stage {
            Stage::Typing => {
                if !self.fast {
                    self.fast = true;
                } else {
                    self.skip = true;
                }
            }
            Stage::LinePause { .. } => self.next_line(),
            _ => {}
        }
    }

    pub fn tick(&mut self) -> Vec<IntroEvent> {
        let mut events = Vec::new();

        let frame = self.tweens.advance();
        for (_, v) in frame.values {
            self.offset = v;
        }
        for slide in frame.done {
            match slide {
                Slide::In => self.start_line(),
                Slide::Out => {
                    self.stage = Stage::Done;
                    if !self.finished_sent {
                        self.finished_sent = true;
                        events.push(IntroEvent::Finished);
                    }
                }
            }
        }

        match self.stage {
            Stage::Typing => self.type_chars(&mut events),
            Stage::LinePause { left } => {
                if left <= 1 {
                    self.next_line();
                } else {
                    self.stage = Stage::LinePause { left: left - 1 };
                }
            }
            _ => {}
        }

        events
    }

    fn type_chars(&mut self, events: &mut Vec<IntroEvent>) {
        let total = self.lines.get(self.line).map_or(0, Vec::len);

        if self.skip {
            if self.visible < total {
                events.push(IntroEvent::Blip);
            }
            self.visible = total;
        } else {
            let delay = if self.fast {
                self.char_delay * self.fast_factor
            } else {
                self.char_delay
            };
            self.acc += 1.0;
            // Zero delay reveals one char per tick
            let delay = delay.max(f32::EPSILON);
            while self.acc >= delay && self.visible < total {
                self.acc -= delay;
                self.visible += 1;
                events.push(IntroEvent::Blip);
                if delay <= f32::EPSILON {
                    break;
                }
            }
        }

        if self.visible >= total {
            self.stage = Stage::LinePause { left: self.pause_ticks.max(1) };
        }
    }

    fn start_line(&mut self) {
        if self.line >= self.lines.len() {
            self.hide_and_finish();
            return;
        }
        self.visible = 0;
        self.acc = 0.0;
        self.fast = false;
        self.skip = false;
        self.stage = Stage::Typing;
    }

    fn next_line(&mut self) {
        self.line += 1;
        self.start_line();
    }

    fn hide_and_finish(&mut self) {
        self.stage = Stage::SlidingOut;
        self.tweens.start(VisualId::Intro, self.offset, 1.0, self.slide_ticks, Ease::InOutSine, Slide::Out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(lines: &[&str]) -> IntroConfig {
        IntroConfig {
            char_delay_ticks: 2,
            fast_factor: 0.15,
            after_line_pause_ticks: 3,
            slide_ticks: 2,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn run(intro: &mut Intro, ticks: usize) -> Vec<IntroEvent> {
        (0..ticks).flat_map(|_| intro.tick()).collect()
    }

    #[test]
    fn hidden_until_shown() {
        let mut intro = Intro::new(&cfg(&["ab"]));
        assert!(!intro.is_shown());
        assert!(run(&mut intro, 50).is_empty());
    }

    #[test]
    fn finishes_exactly_once() {
        let mut intro = Intro::new(&cfg(&["Я забыл", "Щ"]));
        intro.show();
        let events = run(&mut intro, 200);
        let finished = events.iter().filter(|e| **e == IntroEvent::Finished).count();
        assert_eq!(finished, 1);
        assert!(!intro.is_shown());
        intro.show();
        assert!(run(&mut intro, 200).is_empty());
    }

    #[test]
    fn one_blip_per_character() {
        let mut intro = Intro::new(&cfg(&["abc", "de"]));
        intro.show();
        let blips = run(&mut intro, 200).iter().filter(|e| **e == IntroEvent::Blip).count();
        assert_eq!(blips, 5);
    }

    #[test]
    fn types_at_char_delay() {
        let mut intro = Intro::new(&cfg(&["abcd"]));
        intro.show();
        run(&mut intro, 2); // slide in
        assert!(intro.is_typing());
        run(&mut intro, 4);
        assert_eq!(intro.visible_text(), "ab");
    }

    #[test]
    fn first_enter_speeds_up_second_reveals_line() {
        let mut intro = Intro::new(&cfg(&["abcdefghijklmnopqrstuvwxyz"]));
        intro.show();
        run(&mut intro, 2);
        intro.confirm();
        run(&mut intro, 1);
        let fast = intro.visible_text().chars().count();
        assert!(fast > 1, "fast mode should reveal several chars per tick, got {fast}");
        intro.confirm();
        run(&mut intro, 1);
        assert_eq!(intro.visible_text().chars().count(), 26);
        assert!(!intro.is_typing());
    }

    #[test]
    fn enter_after_line_advances_immediately() {
        let mut intro = Intro::new(&IntroConfig { after_line_pause_ticks: 1000, ..cfg(&["a", "b"]) });
        intro.show();
        run(&mut intro, 6);
        assert_eq!(intro.visible_text(), "a");
        intro.confirm();
        assert!(intro.is_typing());
        assert_eq!(intro.visible_text(), "");
    }
}
