mod app;
mod collectors;
mod config;
mod error;
mod input;
mod menu;
mod models;
mod terminal;
mod ui;
mod util;

use anyhow::Result;
use app::App;
use clap::Parser;
use collectors::{cache_stats, lvm::LvsCommand};
use config::{Config, Overrides, Settings};
use crossterm::{execute, terminal::{enable_raw_mode, EnterAlternateScreen}};
use error::CacheError;
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};
use std::io;
use std::panic;
use std::process::ExitCode;
use terminal::restore_terminal;

#[derive(Parser, Debug)]
#[command(name = "cachetop", about = "Real-time monitor for LVM cache volumes", version)]
struct Cli {
    /// Volume group of the cached LV (needs --lv)
    #[arg(long)]
    vg: Option<String>,

    /// Cached logical volume (needs --vg)
    #[arg(long)]
    lv: Option<String>,

    /// Seconds between samples
    #[arg(short, long)]
    interval: Option<f64>,

    /// Samples kept for the trend graphs
    #[arg(long)]
    history: Option<usize>,

    /// Always show the volume picker, even with a single candidate
    #[arg(long)]
    pick: bool,

    /// Color theme: default, dracula, gruvbox, nord
    #[arg(short = 't', long)]
    theme: Option<String>,

    /// Print one JSON snapshot of the volume and exit
    #[arg(long)]
    json: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            vg:       self.vg.clone(),
            lv:       self.lv.clone(),
            interval: self.interval,
            history:  self.history,
            pick:     self.pick,
            theme:    self.theme.clone(),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    util::logger::initialize_logger();

    let cfg = Config::load();
    if cli.config {
        run_print_config(&cfg);
        return Ok(ExitCode::SUCCESS);
    }

    let settings = Settings::resolve(&cfg, cli.overrides());
    info!("starting: {:?}", settings);
    let lvs = LvsCommand::new(settings.sudo.use_sudo());

    if cli.json {
        return run_json_snapshot(&settings, &lvs);
    }

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let result = run(&settings, lvs);
    // Whatever the menu or dashboard already undid, undo it again.
    if let Err(e) = restore_terminal() {
        warn!("restoring terminal failed: {}", e);
    }

    match result {
        Ok(code) => Ok(code),
        Err(e) => {
            report(&e);
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}

fn report(e: &CacheError) {
    eprintln!("{}: {}", e.kind(), e);
    eprintln!("{}", e.hint());
}

fn run(settings: &Settings, lvs: LvsCommand) -> Result<ExitCode, CacheError> {
    println!("Detecting LVM cache volumes...");
    let volume = app::resolve_volume(settings, &lvs, |candidates| {
        println!("Found {} cache volumes.", candidates.len());
        let backend = CrosstermBackend::new(io::stdout());
        let mut term = Terminal::with_options(backend, TerminalOptions {
            viewport: Viewport::Inline(ui::picker::viewport_height(candidates.len())),
        })?;
        let theme = ui::theme::Theme::for_variant(settings.theme);
        let sel = menu::run_menu(
            candidates,
            terminal::CrosstermMode,
            &mut input::CrosstermEvents,
            &mut term,
            &theme,
        );
        println!();
        sel
    })?;

    let Some(volume) = volume else {
        info!("no volume chosen, exiting");
        return Ok(ExitCode::SUCCESS);
    };
    println!("Monitoring {} ({} cache)", volume, volume.mode);

    // From here on a password prompt would fight the dashboard for the screen.
    let lvs = lvs.non_interactive();
    let first = match cache_stats::sample(&lvs, &volume) {
        Err(e) if e.fatal_at_startup() => return Err(e),
        other => other,
    };

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut term = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(volume, settings);
    app.start_with(first);
    app.run(&mut term, &mut input::CrosstermEvents, &lvs)?;
    Ok(ExitCode::SUCCESS)
}

fn run_json_snapshot(settings: &Settings, lvs: &LvsCommand) -> Result<ExitCode> {
    use serde_json::json;

    let resolved = app::resolve_volume(settings, lvs, |candidates| {
        Err(CacheError::Discovery(format!(
            "{} cache volumes found, choose one with --vg and --lv", candidates.len())))
    });
    let volume = match resolved {
        Ok(Some(v)) => v,
        Ok(None)    => return Ok(ExitCode::SUCCESS),
        Err(e) => {
            report(&e);
            return Ok(ExitCode::from(e.exit_code()));
        }
    };

    let sample = match cache_stats::sample(lvs, &volume) {
        Ok(s) => s,
        Err(e) => {
            report(&e);
            return Ok(ExitCode::from(e.exit_code()));
        }
    };
    let derived = models::metrics::derive(&sample);

    let snapshot = json!({
        "cachetop_version": env!("CARGO_PKG_VERSION"),
        "timestamp": sample.timestamp.to_rfc3339(),
        "volume":    volume,
        "counters": {
            "total_blocks": sample.total_blocks,
            "used_blocks":  sample.used_blocks,
            "dirty_blocks": sample.dirty_blocks,
            "read_hits":    sample.read_hits,
            "read_misses":  sample.read_misses(),
            "write_hits":   sample.write_hits,
            "write_misses": sample.write_misses(),
            "pool_bytes":   sample.pool_bytes(),
        },
        "metrics": derived,
    });

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(ExitCode::SUCCESS)
}

fn run_print_config(cfg: &Config) {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let log = util::logger::log_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(disabled)".to_string());
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "(auto-detect)".to_string());

    println!("Config: {}", path);
    println!("Log:    {}", log);
    println!();
    println!("[general]");
    println!("  interval_secs = {}", cfg.general.interval_secs);
    println!("  history_depth = {}", cfg.general.history_depth);
    println!("  theme         = {}", cfg.general.theme);
    println!();
    println!("[volume]");
    println!("  vg = {}", opt(&cfg.volume.vg));
    println!("  lv = {}", opt(&cfg.volume.lv));
    println!();
    println!("[lvm]");
    println!("  sudo = {:?}", cfg.lvm.sudo);
}
