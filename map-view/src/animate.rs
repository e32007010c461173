//! Timed reveal of route lines, one coordinate per interval.
//!
//! A line is revealed by repeated ticks. The first coordinate appears when the animation starts, each
//! later coordinate `n` becomes due at `start + n * REVEAL_INTERVAL_MS`. A tick that arrives early reveals
//! nothing, a tick that arrives late reveals exactly one coordinate so a slow timer never skips points.

pub const REVEAL_INTERVAL_MS: f64 = 60.;

/// Identifies one animating line of the overlay installed by a particular load.
/// Once that overlay is replaced, removed or its animations are cancelled the handle is dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle {
    pub generation: u64,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// the handle no longer refers to a live animation, nothing changed
    Cancelled,
    /// nothing revealed, try again at `due`
    NotYet { due: f64 },
    /// one coordinate revealed, the next is due at `due`
    Continue { handle: AnimationHandle, due: f64 },
    /// the whole line is visible
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    started_at: f64,
    revealed: usize,
    len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step {
    NotYet(f64),
    Revealed(Option<f64>),
    Done,
}

impl Reveal {
    /// Starts revealing `len` coordinates, the first one straight away
    pub fn start(len: usize, now: f64) -> Reveal {
        let mut reveal = Reveal {
            started_at: now,
            revealed: 0,
            len,
        };
        reveal.step(now);
        reveal
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn is_finished(&self) -> bool {
        self.revealed >= self.len
    }

    /// Earliest time coordinate `index` may be shown
    pub fn due(&self, index: usize) -> f64 {
        self.started_at + index as f64 * REVEAL_INTERVAL_MS
    }

    pub fn next_due(&self) -> Option<f64> {
        if self.is_finished() {
            None
        } else {
            Some(self.due(self.revealed))
        }
    }

    pub(crate) fn step(&mut self, now: f64) -> Step {
        match self.next_due() {
            None => Step::Done,
            Some(due) if now < due => Step::NotYet(due),
            Some(_) => {
                self.revealed += 1;
                Step::Revealed(self.next_due())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_coordinate_is_immediate() {
        let reveal = Reveal::start(3, 1000.);
        assert_eq!(reveal.revealed(), 1);
        assert_eq!(reveal.next_due(), Some(1060.));
    }

    #[test]
    fn empty_line_finishes_at_once() {
        let reveal = Reveal::start(0, 1000.);
        assert_eq!(reveal.revealed(), 0);
        assert!(reveal.is_finished());
        assert_eq!(reveal.next_due(), None);
    }

    #[test]
    fn early_ticks_reveal_nothing() {
        let mut reveal = Reveal::start(3, 0.);
        assert_eq!(reveal.step(59.), Step::NotYet(60.));
        assert_eq!(reveal.revealed(), 1);
        assert_eq!(reveal.step(60.), Step::Revealed(Some(120.)));
        assert_eq!(reveal.revealed(), 2);
    }

    #[test]
    fn late_ticks_reveal_one_at_a_time() {
        let mut reveal = Reveal::start(4, 0.);
        assert_eq!(reveal.step(10_000.), Step::Revealed(Some(120.)));
        assert_eq!(reveal.step(10_000.), Step::Revealed(Some(180.)));
        assert_eq!(reveal.step(10_000.), Step::Revealed(None));
        assert_eq!(reveal.step(10_000.), Step::Done);
        assert_eq!(reveal.revealed(), 4);
    }
}
