//! Local ticker
//!
//! Advances countdowns once per second without touching the network, and
//! turns the shared state into display values.

use std::time::Duration;

use crate::clock::{
    format_clock, format_duration, format_minutes_compact, minutes_until, seconds_until,
    TickCadence, Timestamp,
};
use crate::config::CooldownLinks;
use crate::cooldowns::CooldownCategory;
use crate::regen::ResourceKind;

use super::state::DashboardState;
use super::view::{ElementId, Renderer};

/// Label of the call-to-action shown for a ready cooldown
pub const USE_NOW_LABEL: &str = "Use now";
/// Label of the call-to-action shown when no race is running
pub const RACE_LABEL: &str = "Go to race 🏁";

/// One-second countdown driver
pub struct LocalTicker {
    cadence: TickCadence,
    links: CooldownLinks,
}

impl LocalTicker {
    pub fn new(links: CooldownLinks) -> Self {
        Self {
            cadence: TickCadence::new(Duration::from_secs(1)),
            links,
        }
    }

    /// Feed frame time; fires at most once per call and returns whether it did
    pub fn update(
        &mut self,
        delta: Duration,
        state: &mut DashboardState,
        now: Timestamp,
        renderer: &mut impl Renderer,
    ) -> bool {
        if !self.cadence.update(delta) {
            return false;
        }
        if self.cadence.behind() {
            log::debug!("Ticker catching up after a stalled frame");
        }
        self.fire(state, now, renderer);
        true
    }

    /// One tick: decrement cooldowns, expire deadlines, redraw
    pub fn fire(&self, state: &mut DashboardState, now: Timestamp, renderer: &mut impl Renderer) {
        let running: Vec<CooldownCategory> = CooldownCategory::ALL
            .into_iter()
            .filter(|&category| !state.cooldowns.is_ready(category))
            .collect();

        state.cooldowns.tick();
        for category in running {
            if state.cooldowns.is_ready(category) {
                log::info!("{} cooldown ready", category.key());
            }
        }

        state.clear_elapsed(now);
        self.render(state, now, renderer);
    }

    /// Redraw every time-dependent element from state.
    ///
    /// Reads only; calling it twice for the same `now` draws the same thing.
    pub fn render(&self, state: &DashboardState, now: Timestamp, renderer: &mut impl Renderer) {
        for category in CooldownCategory::ALL {
            render_cooldown(state, category, &self.links, renderer);
        }
        for kind in ResourceKind::ALL {
            render_regen(state, kind, now, renderer);
        }
        render_racing(state, now, &self.links, renderer);
    }

    /// Full redraw, bars included; used right after a snapshot lands
    pub fn render_all(&self, state: &DashboardState, now: Timestamp, renderer: &mut impl Renderer) {
        for kind in ResourceKind::ALL {
            render_bar(state, kind, renderer);
        }
        self.render(state, now, renderer);
    }
}

/// Bar width and `"current / maximum"` text
pub fn render_bar(state: &DashboardState, kind: ResourceKind, renderer: &mut impl Renderer) {
    if let Some(bar) = state.bar(kind).state {
        renderer.set_percent(ElementId::bar(kind), bar.percent());
        renderer.set_text(ElementId::text(kind), bar.label());
    }
}

/// Countdown, or the call-to-action once ready
pub fn render_cooldown(
    state: &DashboardState,
    category: CooldownCategory,
    links: &CooldownLinks,
    renderer: &mut impl Renderer,
) {
    let id = ElementId::cooldown(category);
    let seconds = state.cooldowns.get(category);
    if seconds == 0 {
        renderer.set_action(id, USE_NOW_LABEL, links.get(category));
    } else {
        renderer.set_text(id, format!("⏳ {}", format_duration(seconds as i64)));
    }
}

/// Remaining minutes and ready clock time, or "full".
///
/// Nothing is drawn until the bar has been seen in a snapshot.
pub fn render_regen(
    state: &DashboardState,
    kind: ResourceKind,
    now: Timestamp,
    renderer: &mut impl Renderer,
) {
    let slot = state.bar(kind);
    let timer = ElementId::timer(kind);
    let clock = ElementId::clock(kind);

    match slot.prediction {
        Some(prediction) if !prediction.is_elapsed(now) => {
            let minutes = minutes_until(prediction.ready_at, now);
            renderer.set_text(
                timer,
                format!("{} full in {}", kind.icon(), format_minutes_compact(minutes)),
            );
            renderer.set_text(clock, format!("🕒 at {}", format_clock(prediction.ready_at)));
        }
        _ if slot.state.is_some() => {
            renderer.set_text(timer, format!("{} {} full", kind.icon(), kind.name()));
            renderer.set_text(clock, String::new());
        }
        _ => {}
    }
}

/// Race countdown, or the link to enter one
pub fn render_racing(
    state: &DashboardState,
    now: Timestamp,
    links: &CooldownLinks,
    renderer: &mut impl Renderer,
) {
    let remaining = state
        .racing
        .map(|race| seconds_until(race.ends_at, now))
        .unwrap_or(0);

    if remaining > 0 {
        renderer.set_text(ElementId::Racing, format!("🏁 {}", format_duration(remaining)));
    } else {
        renderer.set_action(ElementId::Racing, RACE_LABEL, &links.racing);
    }
}
