use crate::ease::{Ease, lerp};

#[derive(Clone, Debug)]
enum Step<A> {
    Call(A),
    To { target: f64, frames: u64, ease: Ease },
}

/// A one-shot step sequence over a single scalar channel: tweens eased over a
/// fixed frame count, interleaved with actions that fire between them. Each
/// `tick` fires any due actions, then advances at most one tween frame, so a
/// sequence's behavior depends only on how many times it has been ticked.
#[derive(Clone, Debug)]
pub struct Timeline<A> {
    steps: Vec<Step<A>>,
    cursor: usize,
    frame_in_step: u64,
    from: f64,
    value: f64,
}

pub struct TimelineBuilder<A> {
    steps: Vec<Step<A>>,
    start: f64,
}

impl<A: Clone> Timeline<A> {
    pub fn builder(start_value: f64) -> TimelineBuilder<A> {
        TimelineBuilder {
            steps: Vec::new(),
            start: start_value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Advance one frame. Actions reached before the next tween are pushed
    /// onto `fired` in sequence order.
    pub fn tick(&mut self, fired: &mut Vec<A>) {
        while let Some(step) = self.steps.get(self.cursor) {
            match step {
                Step::Call(action) => {
                    fired.push(action.clone());
                    self.cursor += 1;
                }
                Step::To {
                    target,
                    frames,
                    ease,
                } => {
                    if self.frame_in_step == 0 {
                        self.from = self.value;
                    }
                    self.frame_in_step += 1;
                    let t = (self.frame_in_step as f64) / (*frames as f64);
                    self.value = lerp(self.from, *target, ease.apply(t));
                    if self.frame_in_step >= *frames {
                        self.cursor += 1;
                        self.frame_in_step = 0;
                    }
                    return;
                }
            }
        }
    }
}

impl<A> TimelineBuilder<A> {
    pub fn call(mut self, action: A) -> Self {
        self.steps.push(Step::Call(action));
        self
    }

    pub fn to(mut self, target: f64, frames: u64, ease: Ease) -> Self {
        self.steps.push(Step::To {
            target,
            frames: frames.max(1),
            ease,
        });
        self
    }

    pub fn build(self) -> Timeline<A> {
        Timeline {
            steps: self.steps,
            cursor: 0,
            frame_in_step: 0,
            from: self.start,
            value: self.start,
        }
    }
}
