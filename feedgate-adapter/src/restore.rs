use crate::snapshot::ScrollSnapshot;

/// Tunables for one restoration episode.
///
/// These are configuration, not semantics: the defaults match typical
/// interactive hosts but carry no derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestoreOptions {
    /// Batch size once the loaded-depth gap is closed but the anchor is
    /// still missing.
    pub fallback_batch: usize,
    /// Hard ceiling on catch-up fetch iterations.
    pub max_iterations: usize,
    /// How long to wait for the list to actually grow after each fetch.
    pub growth_timeout_ms: u64,
    /// Scroll-correction convergence tolerance in pixels.
    pub pixel_tolerance: i64,
    /// Consecutive in-tolerance observation frames required to finalize.
    pub settle_frames: u32,
    /// Global ceiling on the whole episode.
    pub max_total_ms: u64,
}

impl RestoreOptions {
    pub fn new() -> Self {
        Self {
            fallback_batch: 20,
            max_iterations: 200,
            growth_timeout_ms: 5_000,
            pixel_tolerance: 50,
            settle_frames: 2,
            max_total_ms: 30_000,
        }
    }

    pub fn with_fallback_batch(mut self, fallback_batch: usize) -> Self {
        self.fallback_batch = fallback_batch;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_growth_timeout_ms(mut self, growth_timeout_ms: u64) -> Self {
        self.growth_timeout_ms = growth_timeout_ms;
        self
    }

    pub fn with_pixel_tolerance(mut self, pixel_tolerance: i64) -> Self {
        self.pixel_tolerance = pixel_tolerance;
        self
    }

    pub fn with_settle_frames(mut self, settle_frames: u32) -> Self {
        self.settle_frames = settle_frames;
        self
    }

    pub fn with_max_total_ms(mut self, max_total_ms: u64) -> Self {
        self.max_total_ms = max_total_ms;
        self
    }
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// What the host observes at the start of a frame, for
/// [`RestoreController::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestoreView {
    /// Current item count of the pagination source.
    pub item_count: usize,
    /// Whether the anchor item is present in the current list.
    pub anchor_present: bool,
    /// Whether the anchor item is rendered and not hidden by the reveal gate.
    pub anchor_visible: bool,
    /// The anchor item's current offset from the host's reference point, when
    /// it has a rendered element.
    pub anchor_offset_px: Option<i64>,
    /// The source's iterator id this frame.
    pub iterator_id: u64,
}

/// One command per tick; the host applies it and reports back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreCommand {
    /// Nothing to do this frame; keep ticking.
    Wait,
    /// Call `load_more(n)` on the source and report the result via
    /// [`RestoreController::on_load_result`].
    LoadMore(usize),
    /// Scroll forward by this many pixels (negative scrolls backward).
    ScrollBy(i64),
    /// Episode over: consume the snapshot and drop the restoring flag.
    /// Emitted exactly once.
    Finish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AwaitGrowth {
    baseline_len: usize,
    deadline_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RestorePhase {
    Idle,
    CatchingUp {
        iterations: usize,
        awaiting: Option<AwaitGrowth>,
        exhausted: bool,
    },
    Correcting {
        settled: u32,
    },
    Done,
}

/// Drives one scroll-restoration episode: a bounded catch-up fetch loop
/// followed by a convergent scroll-correction loop.
///
/// Tick-driven; the host calls [`RestoreController::tick`] once per frame
/// with what it currently observes and applies the returned command. Each
/// fetch iteration therefore yields at least one frame; the loop never
/// spins. A done flag plus the iterator id captured at
/// [`RestoreController::begin`] make late callbacks and stale fetches no-ops.
///
/// The episode finalizes imperfectly rather than hanging: iteration ceiling,
/// per-fetch growth timeout, no-growth exhaustion, and a global time ceiling
/// all end it.
#[derive(Clone, Debug)]
pub struct RestoreController<K> {
    options: RestoreOptions,
    snapshot: Option<ScrollSnapshot<K>>,
    iterator_id: u64,
    started_at_ms: u64,
    phase: RestorePhase,
}

impl<K> RestoreController<K> {
    pub fn new(options: RestoreOptions) -> Self {
        Self {
            options,
            snapshot: None,
            iterator_id: 0,
            started_at_ms: 0,
            phase: RestorePhase::Idle,
        }
    }

    pub fn options(&self) -> &RestoreOptions {
        &self.options
    }

    /// The snapshot driving the current episode, if any.
    pub fn snapshot(&self) -> Option<&ScrollSnapshot<K>> {
        self.snapshot.as_ref()
    }

    /// Whether an episode is in flight (the host's `restoring` flag).
    pub fn is_restoring(&self) -> bool {
        matches!(
            self.phase,
            RestorePhase::CatchingUp { .. } | RestorePhase::Correcting { .. }
        )
    }

    pub fn is_done(&self) -> bool {
        self.phase == RestorePhase::Done
    }

    /// Starts an episode for a snapshot taken by the navigator.
    ///
    /// `iterator_id` is the source's id at episode start; if the source is
    /// replaced mid-episode the controller cancels itself.
    pub fn begin(&mut self, snapshot: ScrollSnapshot<K>, iterator_id: u64, now_ms: u64) {
        fdebug!(
            loaded_until = snapshot.loaded_until,
            iterator_id,
            "RestoreController::begin"
        );
        self.snapshot = Some(snapshot);
        self.iterator_id = iterator_id;
        self.started_at_ms = now_ms;
        self.phase = RestorePhase::CatchingUp {
            iterations: 0,
            awaiting: None,
            exhausted: false,
        };
    }

    /// Synchronously kills the episode (view/root change, teardown). Late
    /// ticks become no-ops.
    pub fn cancel(&mut self) {
        if self.is_restoring() {
            fdebug!("RestoreController::cancel");
        }
        self.phase = RestorePhase::Done;
    }

    /// Reports the outcome of a [`RestoreCommand::LoadMore`]: `grew = false`
    /// signals exhaustion and ends the catch-up loop.
    pub fn on_load_result(&mut self, grew: bool) {
        if let RestorePhase::CatchingUp {
            awaiting, exhausted, ..
        } = &mut self.phase
        {
            if grew {
                *awaiting = None;
            } else {
                *exhausted = true;
            }
        }
    }

    /// Advances the episode by one frame.
    pub fn tick(&mut self, view: &RestoreView, now_ms: u64) -> RestoreCommand {
        if let RestorePhase::Idle | RestorePhase::Done = self.phase {
            return RestoreCommand::Wait;
        }
        let (loaded_until, recorded_offset_px) = match &self.snapshot {
            Some(s) => (s.loaded_until, s.offset_px),
            None => return RestoreCommand::Wait,
        };

        // Stale continuation: the query under this episode was replaced.
        if view.iterator_id != self.iterator_id {
            fdebug!(
                expected = self.iterator_id,
                got = view.iterator_id,
                "RestoreController: iterator replaced, finishing"
            );
            return self.finish();
        }

        if now_ms.saturating_sub(self.started_at_ms) >= self.options.max_total_ms {
            fdebug!("RestoreController: episode ceiling hit, finishing");
            return self.finish();
        }

        match self.phase {
            RestorePhase::CatchingUp {
                iterations,
                awaiting,
                exhausted,
            } => {
                if view.anchor_present {
                    // Anchor found; remaining depth no longer matters.
                    self.phase = RestorePhase::Correcting { settled: 0 };
                    return self.correct(view, recorded_offset_px);
                }
                if exhausted {
                    fdebug!(iterations, "RestoreController: source exhausted, finishing");
                    return self.finish();
                }
                if let Some(wait) = awaiting {
                    if view.item_count > wait.baseline_len {
                        // Growth observed; issue the next fetch below.
                    } else if now_ms >= wait.deadline_ms {
                        fdebug!(iterations, "RestoreController: growth timeout, finishing");
                        return self.finish();
                    } else {
                        return RestoreCommand::Wait;
                    }
                }
                if iterations >= self.options.max_iterations {
                    fdebug!("RestoreController: iteration ceiling hit, finishing");
                    return self.finish();
                }
                let gap = loaded_until.saturating_sub(view.item_count);
                let n = if gap > 0 { gap } else { self.options.fallback_batch };
                self.phase = RestorePhase::CatchingUp {
                    iterations: iterations + 1,
                    awaiting: Some(AwaitGrowth {
                        baseline_len: view.item_count,
                        deadline_ms: now_ms.saturating_add(self.options.growth_timeout_ms),
                    }),
                    exhausted: false,
                };
                ftrace!(n, iterations, "RestoreController: load more");
                RestoreCommand::LoadMore(n)
            }
            RestorePhase::Correcting { .. } => self.correct(view, recorded_offset_px),
            RestorePhase::Idle | RestorePhase::Done => RestoreCommand::Wait,
        }
    }

    fn correct(&mut self, view: &RestoreView, recorded_offset_px: i64) -> RestoreCommand {
        if !view.anchor_present {
            // The ranking changed under the episode and dropped the anchor;
            // finalize with whatever position we have.
            fdebug!("RestoreController: anchor vanished, finishing");
            return self.finish();
        }
        if !view.anchor_visible {
            return RestoreCommand::Wait;
        }
        let Some(current) = view.anchor_offset_px else {
            return RestoreCommand::Wait;
        };

        let delta = current - recorded_offset_px;
        if delta.abs() > self.options.pixel_tolerance {
            self.phase = RestorePhase::Correcting { settled: 0 };
            ftrace!(delta, "RestoreController: correcting");
            return RestoreCommand::ScrollBy(delta);
        }

        let RestorePhase::Correcting { settled } = self.phase else {
            return RestoreCommand::Wait;
        };
        let settled = settled + 1;
        if settled >= self.options.settle_frames {
            fdebug!(settled, "RestoreController: converged, finishing");
            return self.finish();
        }
        self.phase = RestorePhase::Correcting { settled };
        RestoreCommand::Wait
    }

    fn finish(&mut self) -> RestoreCommand {
        self.phase = RestorePhase::Done;
        RestoreCommand::Finish
    }
}
