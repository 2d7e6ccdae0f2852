/// Tick-driven tween scheduler.
///
/// Every fading or scaling visual has a `VisualId`. A task interpolates one
/// value for one visual over a fixed number of ticks, then hands back its
/// continuation. Starting a task on a visual replaces whatever was running
/// there, and a killed task never yields its continuation.

use std::f32::consts::PI;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum VisualId {
    Hub,
    Slot(usize),
    ProgressFill,
    EyeBlink,
    EyeGlow,
    Popup(u8),
    Intro,
    Settings,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TaskId(u64);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Ease {
    #[default]
    Linear,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    OutBack,
}

impl Ease {
    /// Map `t` in [0, 1] through the curve. `OutBack` overshoots above 1
    /// before settling.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::OutSine => (t * PI / 2.0).sin(),
            Ease::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Ease::InQuad => t * t,
            Ease::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::OutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + c1 * u * u
            }
        }
    }
}

struct Task<C> {
    id: TaskId,
    visual: VisualId,
    from: f32,
    to: f32,
    ticks: u32,
    elapsed: u32,
    ease: Ease,
    then: C,
}

/// Output of one `advance` call.
pub struct Frame<C> {
    /// Current value for every visual that had a live task this tick.
    pub values: Vec<(VisualId, f32)>,
    /// Continuations of tasks that reached their end this tick, in start order.
    pub done: Vec<C>,
}

pub struct Tweens<C> {
    tasks: Vec<Task<C>>,
    next_id: u64,
}

impl<C> Tweens<C> {
    pub fn new() -> Self {
        Tweens { tasks: Vec::new(), next_id: 0 }
    }

    /// Start interpolating `visual` from `from` to `to` over `ticks` ticks.
    /// Any task already running on `visual` is killed first.
    pub fn start(&mut self, visual: VisualId, from: f32, to: f32, ticks: u32, ease: Ease, then: C) -> TaskId {
        self.kill(visual);
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task { id, visual, from, to, ticks, elapsed: 0, ease, then });
        id
    }

    /// Cancel every task on `visual`. Returns how many were dropped.
    pub fn kill(&mut self, visual: VisualId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.visual != visual);
        before - self.tasks.len()
    }

    pub fn kill_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_running(&self, visual: VisualId) -> bool {
        self.tasks.iter().any(|t| t.visual == visual)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn task_of(&self, visual: VisualId) -> Option<TaskId> {
        self.tasks.iter().find(|t| t.visual == visual).map(|t| t.id)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Step every task by one tick.
    pub fn advance(&mut self) -> Frame<C> {
        let mut values = Vec::with_capacity(self.tasks.len());
        let mut done = Vec::new();
        let mut live = Vec::with_capacity(self.tasks.len());

        for mut task in self.tasks.drain(..) {
            task.elapsed += 1;
            let t = if task.ticks == 0 {
                1.0
            } else {
                task.elapsed as f32 / task.ticks as f32
            };
            let k = task.ease.apply(t);
            values.push((task.visual, task.from + (task.to - task.from) * k));
            if task.elapsed >= task.ticks {
                done.push(task.then);
            } else {
                live.push(task);
            }
        }

        self.tasks = live;
        Frame { values, done }
    }
}

impl<C> Default for Tweens<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end<C>(tw: &mut Tweens<C>) -> Vec<C> {
        let mut out = Vec::new();
        for _ in 0..1000 {
            if tw.is_idle() {
                break;
            }
            out.extend(tw.advance().done);
        }
        out
    }

    #[test]
    fn task_completes_after_its_ticks() {
        let mut tw = Tweens::new();
        tw.start(VisualId::Hub, 1.0, 0.0, 3, Ease::Linear, "faded");
        assert!(tw.advance().done.is_empty());
        assert!(tw.advance().done.is_empty());
        let last = tw.advance();
        assert_eq!(last.done, vec!["faded"]);
        assert_eq!(last.values, vec![(VisualId::Hub, 0.0)]);
        assert!(!tw.is_running(VisualId::Hub));
    }

    #[test]
    fn zero_tick_task_finishes_on_next_advance() {
        let mut tw = Tweens::new();
        tw.start(VisualId::Slot(2), 0.0, 1.0, 0, Ease::OutSine, 7);
        let f = tw.advance();
        assert_eq!(f.done, vec![7]);
        assert_eq!(f.values, vec![(VisualId::Slot(2), 1.0)]);
    }

    #[test]
    fn killed_task_never_yields_continuation() {
        let mut tw = Tweens::new();
        tw.start(VisualId::Slot(0), 0.0, 1.0, 4, Ease::Linear, "opened");
        tw.advance();
        assert_eq!(tw.kill(VisualId::Slot(0)), 1);
        assert!(run_to_end(&mut tw).is_empty());
    }

    #[test]
    fn restarting_a_visual_replaces_its_task() {
        let mut tw = Tweens::new();
        let first = tw.start(VisualId::Hub, 1.0, 0.0, 4, Ease::Linear, "out");
        let second = tw.start(VisualId::Hub, 0.0, 1.0, 2, Ease::Linear, "in");
        assert_ne!(first, second);
        assert_eq!(tw.task_of(VisualId::Hub), Some(second));
        assert_eq!(run_to_end(&mut tw), vec!["in"]);
    }

    #[test]
    fn independent_visuals_run_together() {
        let mut tw = Tweens::new();
        tw.start(VisualId::Hub, 0.0, 1.0, 2, Ease::Linear, 'h');
        tw.start(VisualId::ProgressFill, 0.0, 0.5, 1, Ease::Linear, 'p');
        let f = tw.advance();
        assert_eq!(f.done, vec!['p']);
        assert_eq!(f.values.len(), 2);
        assert_eq!(tw.advance().done, vec!['h']);
    }

    #[test]
    fn linear_midpoint() {
        let mut tw = Tweens::new();
        tw.start(VisualId::Intro, 0.0, 10.0, 4, Ease::Linear, ());
        tw.advance();
        let f = tw.advance();
        assert_eq!(f.values[0].1, 5.0);
    }

    #[test]
    fn ease_endpoints() {
        for ease in [Ease::Linear, Ease::OutSine, Ease::InOutSine, Ease::InQuad, Ease::OutQuad, Ease::OutBack] {
            assert!(ease.apply(0.0).abs() < 1e-5, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-5, "{ease:?} at 1");
        }
        assert!(Ease::OutBack.apply(0.7) > 1.0);
        assert!(Ease::InQuad.apply(0.5) < 0.5 && Ease::OutQuad.apply(0.5) > 0.5);
    }
}
