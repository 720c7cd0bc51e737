//! life-runner: headless runner for the life simulation.
//!
//! Usage:
//!   life-runner --seed 12345 --years 80 --country Turkey --name Deniz
//!   life-runner --seed 12345 --ipc-mode < commands.jsonl

use anyhow::Result;
use lifepath_core::{
    command::PlayerCommand,
    config::EngineConfig,
    content::Catalog,
    event::LifeEvent,
    rng::{LifeRng, RngStream, SimRng},
    session::{LifeSession, LifeSummary, Outcome},
    snapshot::SessionSnapshot,
    subject::SubjectSeed,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command { command: PlayerCommand },
    Snapshot,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    outcome:         Option<Outcome>,
    summary:         LifeSummary,
    node_id:         &'a str,
    node_title:      String,
    node_text:       &'a str,
    options:         Vec<&'a str>,
    activities:      Vec<&'a str>,
    main_resolved:   bool,
    recent_events:   Vec<&'a LifeEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let years = parse_arg(&args, "--years", 80u32);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let country = parse_str(&args, "--country", "Turkey");
    let name = parse_str(&args, "--name", "");
    let gender = parse_str(&args, "--gender", "Female");
    let data_dir = parse_str(&args, "--data-dir", "./data");

    if !ipc_mode {
        println!("Life sim: life-runner");
        println!("  seed:      {seed}");
        println!("  years:     {years}");
        println!("  country:   {country}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let config = Arc::new(EngineConfig::load(data_dir)?);
    let catalog = Arc::new(Catalog::load(data_dir)?);
    let subject_seed = SubjectSeed {
        name: name.to_string(),
        gender: gender.to_string(),
        country: country.to_string(),
    };
    let mut session = LifeSession::start(catalog, config, subject_seed, SimRng::new(seed));

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        // Option picks come from their own stream so autopilot never shifts
        // the engine's sequence.
        let mut autopilot = SimRng::for_stream(seed, RngStream::Autopilot);
        autoplay(&mut session, &mut autopilot, years);
        print_summary(&session);
    }

    Ok(())
}

/// Each year: try one activity, resolve the presented node, then advance
/// unless the chosen option already did.
fn autoplay(session: &mut LifeSession<SimRng>, autopilot: &mut SimRng, years: u32) {
    for _ in 0..years {
        if session.is_over() {
            break;
        }
        let age = session.subject().age;
        if let Some(i) = autopilot.index(session.activities().len()) {
            session.use_activity(i);
        }
        if let Some(i) = autopilot.index(session.current_node().options.len()) {
            session.choose_option(i);
        }
        if session.subject().age == age {
            session.advance_year();
        }
    }
}

fn run_ipc_loop(session: &mut LifeSession<SimRng>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                let state = build_ui_state(session, None);
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            IpcCommand::Command { command } => {
                let outcome = command.execute(session);
                if let Outcome::Ignored(reason) = outcome {
                    log::warn!("command {command:?} ignored: {reason:?}");
                }
                let state = build_ui_state(session, Some(outcome));
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            IpcCommand::Snapshot => {
                let snapshot: SessionSnapshot = session.snapshot();
                writeln!(stdout, "{}", snapshot.to_json()?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state<R: LifeRng>(session: &LifeSession<R>, outcome: Option<Outcome>) -> UiState<'_> {
    let node = session.current_node();
    UiState {
        outcome,
        summary: session.summary(),
        node_id: &node.id,
        node_title: node.display_title(),
        node_text: &node.description,
        options: node.options.iter().map(|o| o.text.as_str()).collect(),
        activities: session.activities().iter().map(|a| a.title.as_str()).collect(),
        main_resolved: session.main_resolved(),
        recent_events: session.log().newest_first().take(10).collect(),
    }
}

fn print_summary<R: LifeRng>(session: &LifeSession<R>) {
    let summary = session.summary();

    println!("=== LIFE SUMMARY ===");
    println!("  name:         {}", summary.name);
    println!("  country:      {}", summary.country);
    println!("  age:          {}", summary.age);
    match summary.death_cause {
        Some(cause) if !summary.alive => println!("  died of:      {cause}"),
        _ => println!("  status:       alive"),
    }
    println!("  money:        {}", summary.money);
    println!(
        "  job:          {} ({})",
        summary.job_title.as_deref().unwrap_or("none"),
        summary.salary
    );
    println!("  relationship: {}", summary.relationship.label());
    println!("  children:     {}", summary.children);
    println!("  log entries:  {}", summary.log_entries);

    println!();
    println!("=== ACHIEVEMENTS ===");
    if summary.achievements.is_empty() {
        println!("  (none yet)");
    } else {
        for achievement in &summary.achievements {
            println!("  {achievement}");
        }
    }

    println!();
    println!("=== LAST 10 EVENTS ===");
    for event in session.log().newest_first().take(10) {
        match &event.impact {
            Some(impact) => println!("  [{:>3}] {}: {} ({impact})", event.age, event.title, event.description),
            None => println!("  [{:>3}] {}: {}", event.age, event.title, event.description),
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn parse_str<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .unwrap_or(default)
}
