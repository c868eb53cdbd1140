use crate::collectors::cache_stats;
use crate::collectors::discovery::{describe, discover};
use crate::collectors::lvm::LvmQuery;
use crate::config::Settings;
use crate::error::CacheError;
use crate::input::{handle_key, Action, EventSource};
use crate::menu::Selection;
use crate::models::metrics::{self, DerivedMetrics, IoRates};
use crate::models::sample::Sample;
use crate::models::volume::VolumeDescriptor;
use crate::ui::bars::BarLayout;
use crate::ui::dashboard::{self, DashboardView};
use crate::ui::footer::FooterStatus;
use crate::ui::theme::{Theme, ThemeVariant};
use crate::ui::trend;
use crate::util::ring_buffer::RingBuffer;
use chrono::{DateTime, Local};
use crossterm::event::Event;
use log::{info, warn};
use ratatui::{backend::Backend, Frame, Terminal};
use std::time::{Duration, Instant};

// ── Startup: which volume ─────────────────────────────────────────────

/// How the volume to monitor gets decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Use(VolumeDescriptor),
    Pick(Vec<VolumeDescriptor>),
}

/// One candidate is used directly unless a pick is forced; several always go
/// through the picker. No candidates at all is a discovery failure.
pub fn plan(mut candidates: Vec<VolumeDescriptor>, force_pick: bool) -> Result<Plan, CacheError> {
    match candidates.len() {
        0 => Err(CacheError::Discovery("no LVM cache volumes found".into())),
        1 if !force_pick => Ok(Plan::Use(candidates.remove(0))),
        _ => Ok(Plan::Pick(candidates)),
    }
}

/// Work out the volume from settings and LVM, calling `pick` only when the
/// operator has to choose. `Ok(None)` means the operator cancelled.
pub fn resolve_volume<Q, F>(settings: &Settings, q: &Q, pick: F) -> Result<Option<VolumeDescriptor>, CacheError>
where
    Q: LvmQuery,
    F: FnOnce(Vec<VolumeDescriptor>) -> Result<Selection, CacheError>,
{
    if let (Some(v), false) = (&settings.volume, settings.force_pick) {
        let vol = describe(q, &v.vg, &v.lv)?;
        info!("using configured volume {}", vol);
        return Ok(Some(vol));
    }

    let candidates = discover(q)?;
    info!("found {} cache volume(s): {}", candidates.len(),
        candidates.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "));

    match plan(candidates, settings.force_pick)? {
        Plan::Use(v) => {
            info!("auto-selected {}", v);
            Ok(Some(v))
        }
        Plan::Pick(list) => match pick(list)? {
            Selection::Selected(v) => Ok(Some(v)),
            Selection::Cancelled   => Ok(None),
        },
    }
}

// ── Monitor session ───────────────────────────────────────────────────

/// All mutable state of one monitoring session. Owned by the refresh loop;
/// nothing else touches it.
pub struct App {
    pub volume:  VolumeDescriptor,
    pub history: RingBuffer<DerivedMetrics>,

    pub theme:         Theme,
    pub theme_variant: ThemeVariant,

    interval:    Duration,
    next_tick:   Instant,
    needs_draw:  bool,

    prev_sample: Option<Sample>,
    rates:       Option<IoRates>,
    last_error:  Option<CacheError>,
    last_ok:     Option<DateTime<Local>>,

    pub should_quit: bool,
}

impl App {
    pub fn new(volume: VolumeDescriptor, settings: &Settings) -> Self {
        Self {
            volume,
            history:       RingBuffer::new(settings.history_depth),
            theme:         Theme::for_variant(settings.theme),
            theme_variant: settings.theme,
            interval:      settings.interval,
            next_tick:     Instant::now(),
            needs_draw:    true,
            prev_sample:   None,
            rates:         None,
            last_error:    None,
            last_ok:       None,
            should_quit:   false,
        }
    }

    /// Record a reading taken before the loop starts; the first loop tick then
    /// waits a full interval.
    pub fn start_with(&mut self, first: Result<Sample, CacheError>) {
        self.record(first);
        self.next_tick = Instant::now() + self.interval;
    }

    pub fn last_error(&self) -> Option<&CacheError> { self.last_error.as_ref() }

    /// Fold one sampling result into the session: derive, append to history,
    /// or keep the error for the inline diagnostic. History is untouched on failure.
    pub fn record(&mut self, result: Result<Sample, CacheError>) {
        match result {
            Ok(sample) => {
                let derived = metrics::derive(&sample);
                self.rates = self.prev_sample.as_ref().and_then(|p| metrics::rates(p, &sample));
                self.history.push(derived);
                self.prev_sample = Some(sample);
                self.last_ok = Some(sample.timestamp);
                if self.last_error.take().is_some() {
                    info!("sampling {} recovered", self.volume);
                }
            }
            Err(e) => {
                warn!("sampling {} failed: {}", self.volume, e);
                self.rates = None;
                self.last_error = Some(e);
            }
        }
        self.needs_draw = true;
    }

    pub fn draw(&self, f: &mut Frame) {
        let area = f.area();
        let width = area.width as usize;
        match (&self.last_error, self.history.latest()) {
            (None, Some(latest)) => {
                let history = self.history.snapshot();
                let view = DashboardView {
                    volume:     &self.volume,
                    latest,
                    history:    &history,
                    rates:      self.rates,
                    interval:   self.interval,
                    theme_name: self.theme_variant.name(),
                };
                dashboard::render(f, &view, &self.theme);
            }
            (err, _) => {
                let waiting = CacheError::Query("waiting for the first sample".into());
                let status = FooterStatus {
                    width:       area.width,
                    height:      area.height,
                    bar_width:   BarLayout::for_width(width).bar,
                    graph_width: trend::graph_width(width),
                    interval:    self.interval,
                    theme_name:  self.theme_variant.name(),
                };
                dashboard::render_error(f, &self.volume, err.as_ref().unwrap_or(&waiting),
                    self.last_ok, &status, &self.theme);
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::CycleTheme => {
                self.theme_variant = self.theme_variant.next();
                self.theme = Theme::for_variant(self.theme_variant);
                self.needs_draw = true;
            }
            Action::None => {}
        }
    }

    // ── Main loop ─────────────────────────────────────────────────────

    /// Sample, derive, record and redraw every interval until the operator quits.
    /// Sampling failures are shown inline and retried; only terminal I/O
    /// failures end the loop early.
    pub fn run<B, E, Q>(&mut self, terminal: &mut Terminal<B>, events: &mut E, q: &Q) -> Result<(), CacheError>
    where
        B: Backend,
        E: EventSource,
        Q: LvmQuery,
    {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                self.record(cache_stats::sample(q, &self.volume));
                // A slow lvs must not cause a burst of catch-up samples.
                self.next_tick = (self.next_tick + self.interval).max(Instant::now());
            }

            if self.needs_draw {
                terminal.draw(|f| self.draw(f))?;
                self.needs_draw = false;
            }

            let timeout = self.next_tick.saturating_duration_since(Instant::now());
            match events.next_event(timeout)? {
                Some(Event::Key(key))    => self.handle_action(handle_key(key)),
                Some(Event::Resize(_, _)) => self.needs_draw = true,
                _ => {}
            }

            if self.should_quit { break; }
        }
        info!("monitor for {} stopped", self.volume);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::lvm::testing::CannedLvs;
    use crate::config::{Config, Overrides, VolumeRef};
    use crate::input::testing::{ctrl_c, key, ScriptedEvents};
    use crate::menu::run_menu;
    use crate::models::volume::CacheMode;
    use crate::terminal::testing::FakeMode;
    use crossterm::event::KeyCode;
    use ratatui::backend::TestBackend;
    use std::cell::Cell;

    const TWO_VOLUMES: &str = "  vg_games|games|writeback|65536\n  vg_media|films|writethrough|131072\n";
    const STATS: &str = "  100|45|12|28934|2466|16297|2833|writeback|65536\n";

    fn settings(interval: Duration, depth: usize) -> Settings {
        let mut s = Settings::resolve(&Config::default(), Overrides::default());
        s.interval = interval;
        s.history_depth = depth;
        s
    }

    fn volume() -> VolumeDescriptor {
        VolumeDescriptor {
            vg_name: "vg_games".into(), lv_name: "games".into(),
            mode: CacheMode::Writeback, block_size: 65536,
        }
    }

    fn screen(term: &Terminal<TestBackend>) -> String {
        let buf = term.backend().buffer();
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    // ── resolution ──

    #[test]
    fn no_candidates_fails_with_exit_one() {
        let q = CannedLvs::new().ok("  vg_sys|root||\n");
        let err = resolve_volume(&settings(Duration::ZERO, 60), &q, |_| panic!("no menu expected"))
            .unwrap_err();
        assert!(matches!(err, CacheError::Discovery(_)));
        assert!(err.fatal_at_startup());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn single_candidate_skips_the_menu() {
        let q = CannedLvs::new().ok("  vg_games|games|writeback|65536\n");
        let called = Cell::new(false);
        let vol = resolve_volume(&settings(Duration::ZERO, 60), &q, |_| {
            called.set(true);
            Ok(Selection::Cancelled)
        }).unwrap();
        assert!(!called.get());
        assert_eq!(vol.unwrap().path(), "vg_games/games");
    }

    #[test]
    fn force_pick_opens_menu_for_one() {
        let q = CannedLvs::new().ok("  vg_games|games|writeback|65536\n");
        let mut s = settings(Duration::ZERO, 60);
        s.force_pick = true;
        let vol = resolve_volume(&s, &q, |list| {
            assert_eq!(list.len(), 1);
            Ok(Selection::Cancelled)
        }).unwrap();
        assert_eq!(vol, None);
    }

    #[test]
    fn two_candidates_down_enter_picks_second() {
        let q = CannedLvs::new().ok(TWO_VOLUMES);
        let mode = FakeMode::starting_raw(false);
        let mut events = ScriptedEvents::keys([KeyCode::Down, KeyCode::Enter]);
        let mut term = Terminal::new(TestBackend::new(60, 10)).unwrap();

        let vol = resolve_volume(&settings(Duration::ZERO, 60), &q, |list| {
            assert_eq!(list[0].path(), "vg_games/games");
            run_menu(list, mode.clone(), &mut events, &mut term, &Theme::default())
        }).unwrap();

        assert_eq!(vol.unwrap().path(), "vg_media/films");
        assert!(!mode.raw.get());
    }

    #[test]
    fn explicit_volume_is_described_not_discovered() {
        let q = CannedLvs::new().ok("  vg_games|games|writeback|65536\n");
        let mut s = settings(Duration::ZERO, 60);
        s.volume = Some(VolumeRef { vg: "vg_games".into(), lv: "games".into() });
        let vol = resolve_volume(&s, &q, |_| panic!("no menu expected")).unwrap().unwrap();
        assert_eq!(vol.block_size, 65536);
        assert_eq!(q.calls.borrow()[0].last().unwrap(), "vg_games/games");
    }

    #[test]
    fn plan_rules() {
        assert!(plan(Vec::new(), false).is_err());
        assert!(matches!(plan(vec![volume()], false), Ok(Plan::Use(_))));
        assert!(matches!(plan(vec![volume()], true), Ok(Plan::Pick(_))));
        assert!(matches!(plan(vec![volume(), volume()], false), Ok(Plan::Pick(_))));
    }

    // ── refresh loop ──

    #[test]
    fn each_tick_samples_and_bounds_history() {
        let q = CannedLvs::new().ok(STATS).ok(STATS).ok(STATS);
        let mut app = App::new(volume(), &settings(Duration::ZERO, 2));
        let mut events = ScriptedEvents::new([None, None, Some(key(KeyCode::Char('q')))]);
        let mut term = Terminal::new(TestBackend::new(100, 60)).unwrap();

        app.run(&mut term, &mut events, &q).unwrap();

        assert_eq!(q.calls.borrow().len(), 3);
        assert_eq!(app.history.len(), 2);
        assert_eq!(events.remaining(), 0);
        assert!(screen(&term).contains("Hit Ratio"));
    }

    #[test]
    fn parse_error_is_shown_and_loop_continues() {
        let q = CannedLvs::new()
            .ok("garbage\n")
            .ok(STATS);
        let mut app = App::new(volume(), &settings(Duration::ZERO, 60));
        let mut events = ScriptedEvents::new([None, Some(ctrl_c())]);
        let mut term = Terminal::new(TestBackend::new(100, 60)).unwrap();

        app.run(&mut term, &mut events, &q).unwrap();

        assert_eq!(app.history.len(), 1);
        assert!(app.last_error().is_none());
        assert!(screen(&term).contains("Real-time Status"));
    }

    #[test]
    fn failure_replaces_dashboard_until_recovery() {
        let mut app = App::new(volume(), &settings(Duration::from_secs(2), 60));
        app.record(cache_stats::parse_stats(STATS, Local::now()));
        app.record(Err(CacheError::Permission("denied".into())));
        assert_eq!(app.history.len(), 1);

        let mut term = Terminal::new(TestBackend::new(100, 40)).unwrap();
        term.draw(|f| app.draw(f)).unwrap();
        let s = screen(&term);
        assert!(s.contains("Permission denied"));
        assert!(s.contains("Last successful sample"));
        assert!(!s.contains("Real-time Status"));
    }

    #[test]
    fn start_with_defers_first_tick() {
        let q = CannedLvs::new();
        let mut app = App::new(volume(), &settings(Duration::from_secs(3600), 60));
        app.start_with(cache_stats::parse_stats(STATS, Local::now()));
        let mut events = ScriptedEvents::new([Some(key(KeyCode::Char('q')))]);
        let mut term = Terminal::new(TestBackend::new(100, 60)).unwrap();

        app.run(&mut term, &mut events, &q).unwrap();

        assert!(q.calls.borrow().is_empty());
        assert_eq!(app.history.len(), 1);
        assert!(screen(&term).contains("Cache Usage"));
    }

    #[test]
    fn theme_key_cycles_theme() {
        let q = CannedLvs::new().ok(STATS).ok(STATS);
        let mut app = App::new(volume(), &settings(Duration::ZERO, 60));
        let mut events = ScriptedEvents::new([Some(key(KeyCode::Char('t'))), Some(key(KeyCode::Esc))]);
        let mut term = Terminal::new(TestBackend::new(100, 60)).unwrap();
        app.run(&mut term, &mut events, &q).unwrap();
        assert_eq!(app.theme_variant, ThemeVariant::Dracula);
    }

    #[test]
    fn rates_need_two_samples() {
        let mut app = App::new(volume(), &settings(Duration::ZERO, 60));
        let t0 = Local::now();
        app.record(cache_stats::parse_stats(STATS, t0));
        assert!(app.rates.is_none());
        app.record(cache_stats::parse_stats(
            "  100|45|12|29934|2466|16297|2833|writeback|65536\n",
            t0 + chrono::Duration::seconds(2)));
        assert_eq!(app.rates.unwrap().reads_per_sec, 500.0);
    }
}
