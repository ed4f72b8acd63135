use std::cell::RefCell;

use thiserror::Error;

use crate::binder::{self, HandlerRegistry};
use crate::dataset::Dataset;
use crate::interaction::{EmphasisPlan, HoverState, InteractionController};
use crate::loader::{AssetLoader, CancelToken, LoadError};
use crate::scale::{ColorRange, ColorScale, ColorSpace};
use crate::surface::{PointerKind, PointerSample, RegionKey, RegionSurface};
use crate::svg::{self, SvgError};

/// Permission to apply one load's result. Only the most recently issued ticket
/// is honored.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    token: CancelToken,
}

impl LoadTicket {
    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid region image: {0}")]
    Document(#[from] SvgError),
}

#[derive(Debug)]
pub enum CycleOutcome {
    Bound { regions: usize, handlers: usize },
    /// A newer ticket was issued (or the instance was torn down) first.
    Superseded,
    Cancelled,
    Failed(CycleError),
}

struct InFlight {
    generation: u64,
    token: CancelToken,
    dataset: Dataset,
    domain: (f64, f64),
    range: ColorRange,
}

/// Drives load → bind cycles for one mounted image.
pub struct LifecycleCoordinator<S: RegionSurface> {
    surface: S,
    space: ColorSpace,
    generation: u64,
    in_flight: Option<InFlight>,
    registry: HandlerRegistry<S::Listener>,
    interaction: InteractionController,
    mounted: bool,
}

impl<S: RegionSurface> LifecycleCoordinator<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            space: ColorSpace::default(),
            generation: 0,
            in_flight: None,
            registry: HandlerRegistry::default(),
            interaction: InteractionController::new(),
            mounted: false,
        }
    }

    pub fn with_color_space(mut self, space: ColorSpace) -> Self {
        self.space = space;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn hover(&self) -> &HoverState {
        self.interaction.state()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn handler_count(&self) -> usize {
        self.registry.handler_count()
    }

    /// Start a new cycle for `dataset` / `range`.
    ///
    /// Everything from the previous cycle is retired first. Returns `None` when
    /// the dataset has nothing to render, in which case the container stays
    /// empty and no load should be issued.
    pub fn update(&mut self, dataset: Dataset, range: ColorRange) -> Option<LoadTicket> {
        self.retire();
        let Some(domain) = dataset.domain() else {
            tracing::debug!(entries = dataset.len(), "nothing to render, skipping region image load");
            return None;
        };

        self.generation += 1;
        let token = CancelToken::new();
        self.in_flight = Some(InFlight {
            generation: self.generation,
            token: token.clone(),
            dataset,
            domain,
            range,
        });
        Some(LoadTicket {
            generation: self.generation,
            token,
        })
    }

    /// Apply a finished load if `ticket` is still the current one.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<String, LoadError>) -> CycleOutcome {
        let flight = match self.in_flight.take() {
            Some(f) if f.generation == ticket.generation && f.token.same_as(&ticket.token) => f,
            other => {
                self.in_flight = other;
                tracing::debug!(generation = ticket.generation, "discarding superseded load");
                return CycleOutcome::Superseded;
            }
        };

        let markup = match result {
            Ok(markup) => markup,
            Err(LoadError::Cancelled) => return CycleOutcome::Cancelled,
            Err(e) => {
                tracing::warn!(error = %e, "region image load failed");
                return CycleOutcome::Failed(e.into());
            }
        };
        let markup = match svg::make_responsive(&markup) {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!(error = %e, "region image rejected");
                return CycleOutcome::Failed(e.into());
            }
        };
        debug_assert!(self.registry.is_empty());
        self.surface.inject(&markup);
        self.mounted = true;

        let scale = ColorScale::new(flight.domain, flight.range).with_space(self.space);
        let binding = binder::bind(&mut self.surface, &flight.dataset, &scale);
        let regions = binding.regions.len();
        self.registry = binding.registry;
        self.interaction.attach(binding.regions);

        let handlers = self.registry.handler_count();
        tracing::debug!(generation = flight.generation, regions, handlers, "bind cycle complete");
        CycleOutcome::Bound { regions, handlers }
    }

    /// Route a pointer event from a registered listener. Returns whether the
    /// hover state changed.
    pub fn pointer(&mut self, region: RegionKey, kind: PointerKind, sample: PointerSample) -> bool {
        let before = self.interaction.state().clone();
        let plan = self.interaction.handle(region, kind, sample);
        self.apply(plan);
        *self.interaction.state() != before
    }

    /// Dispose: cancel, unhover, deregister and unmount unconditionally.
    pub fn teardown(&mut self) {
        self.retire();
    }

    fn retire(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            tracing::debug!(generation = flight.generation, "cancelling in-flight load");
            flight.token.cancel();
        }

        let plan = self.interaction.detach();
        self.apply(plan);

        let removed = self.registry.clear(&mut self.surface);
        if removed > 0 {
            tracing::debug!(removed, "removed region listeners");
        }

        if self.mounted {
            self.surface.clear();
            self.mounted = false;
        }
    }

    fn apply(&mut self, plan: EmphasisPlan) {
        for (region, emphasis) in plan {
            self.surface.set_emphasis(region, emphasis);
        }
    }
}

/// Await `loader` for `ticket` and hand the result back to `engine`.
///
/// The engine is only borrowed after the load resolves, so pointer events and
/// newer updates can run while the fetch is pending.
pub async fn run_cycle<S, L>(
    engine: &RefCell<LifecycleCoordinator<S>>,
    loader: &L,
    source: &str,
    ticket: LoadTicket,
) -> CycleOutcome
where
    S: RegionSurface,
    L: AssetLoader,
{
    if ticket.token().is_cancelled() {
        return engine.borrow_mut().complete(ticket, Err(LoadError::Cancelled));
    }
    let result = loader.load(source, ticket.token()).await;
    engine.borrow_mut().complete(ticket, result)
}
