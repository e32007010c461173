use gloo_timers::callback::Timeout;
use js_sys::Date;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::mem;
use std::rc::Rc;

type Task = Box<dyn FnOnce()>;

/// Runs callbacks at timestamps (ms since the epoch) using a single browser timeout for the earliest one
#[derive(Clone)]
pub struct Scheduler(Rc<RefCell<SchedulerState>>);

enum SchedulerState {
    Empty,
    // these seem to be false positives with the `dead_code check
    #[allow(dead_code)]
    Scheduled {
        next_timeout: Timeout,
        /// keyed by timestamp then insertion order, so tasks due at the same time all run
        scheduled_wakes: BTreeMap<(u64, u64), Task>,
        next_seq: u64,
    },
}

impl SchedulerState {
    fn schedule(&mut self, millis_to: u32, timestamp: u64, task: Task, scheduler: &Scheduler) {
        match self {
            Self::Empty => {
                let mut scheduled_wakes = BTreeMap::new();
                scheduled_wakes.insert((timestamp, 0), task);
                *self = Self::Scheduled {
                    next_timeout: Timeout::new(millis_to, scheduler.waker()),
                    scheduled_wakes,
                    next_seq: 1,
                };
            }
            Self::Scheduled {
                ref mut next_timeout,
                ref mut scheduled_wakes,
                ref mut next_seq,
            } => {
                let earliest = scheduled_wakes.keys().next().map(|(time, _)| *time);
                if earliest.map_or(true, |earliest| timestamp < earliest) {
                    *next_timeout = Timeout::new(millis_to, scheduler.waker());
                }
                scheduled_wakes.insert((timestamp, *next_seq), task);
                *next_seq += 1;
            }
        }
    }

    fn remove_elapsed(&mut self, scheduler: &Scheduler) -> Vec<Task> {
        match self {
            // everything was cancelled after this wake was queued
            Self::Empty => vec![],
            Self::Scheduled {
                ref mut next_timeout,
                ref mut scheduled_wakes,
                next_seq: _,
            } => {
                let time = Date::now() as u64;
                let not_elapsed = scheduled_wakes.split_off(&(time + 1, 0));
                let elapsed = mem::replace(scheduled_wakes, not_elapsed)
                    .into_iter()
                    .map(|(_k, v)| v)
                    .collect();

                if let Some(((first_schedule, _), _)) = scheduled_wakes.iter().next() {
                    let millis_to = first_schedule - time;
                    *next_timeout = Timeout::new(millis_to as u32, scheduler.waker());
                } else {
                    *self = Self::Empty;
                }

                elapsed
            }
        }
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(SchedulerState::Empty)))
    }

    /// Schedules a function to be called, or called as soon as possible if the time is in the past
    pub fn schedule<F>(&self, timestamp: u64, f: F)
    where
        F: 'static + FnOnce(),
    {
        let millis_to = timestamp as i64 - (Date::now() as i64);
        let millis_to = if millis_to < 0 { 0 } else { millis_to as u32 };
        self.0
            .borrow_mut()
            .schedule(millis_to, timestamp, Box::new(f), self);
    }

    /// Drops every scheduled function without calling it
    pub fn cancel_all(&self) {
        // dropping the pending timeout clears it in the browser
        *self.0.borrow_mut() = SchedulerState::Empty;
    }

    #[cfg(all(test, target_arch = "wasm32"))]
    pub fn is_empty(&self) -> bool {
        matches!(*self.0.borrow(), SchedulerState::Empty)
    }

    fn waker(&self) -> impl FnOnce() {
        let s = self.clone();
        move || {
            s.wake();
        }
    }

    fn wake(&self) {
        let elapsed = self.0.borrow_mut().remove_elapsed(self);
        for f in elapsed {
            f();
        }
    }
}
