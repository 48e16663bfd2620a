use std::io::Write;

use clap::Subcommand;
use cosmos_focus_core::storage::{Database, KeyValueStore, TIMER_STATE_KEY};
use cosmos_focus_core::timer::{FocusTimer, TickDriver};
use cosmos_focus_core::{Event, TimerMode};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current countdown state as JSON
    Status,
    /// Start if paused, pause if running
    Toggle,
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Restore the current mode's full duration
    Reset,
    /// Switch mode (focus, short, long)
    Mode { mode: TimerMode },
    /// Apply simulated one-second ticks
    Tick {
        #[arg(short = 'n', long, default_value = "1")]
        count: u64,
    },
    /// Run the countdown in real time until it stops
    Run,
}

fn print_json(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut timer = FocusTimer::restore(&db);

    match action {
        TimerAction::Status => print_json(&timer.engine().snapshot())?,
        TimerAction::Toggle => print_json(&timer.toggle())?,
        TimerAction::Start | TimerAction::Pause => {
            let wants_running = matches!(action, TimerAction::Start);
            if timer.engine().is_running() == wants_running {
                print_json(&timer.engine().snapshot())?;
            } else {
                print_json(&timer.toggle())?;
            }
        }
        TimerAction::Reset => print_json(&timer.reset())?,
        TimerAction::Mode { mode } => print_json(&timer.switch_mode(mode))?,
        TimerAction::Tick { count } => {
            for _ in 0..count {
                if let Some(event) = timer.tick() {
                    print_json(&event)?;
                }
            }
            print_json(&timer.engine().snapshot())?;
        }
        TimerAction::Run => {
            if !timer.engine().is_running() {
                timer.toggle();
            }
            let mut driver = TickDriver::new();
            let completed = timer
                .run(&mut driver, |engine, _| {
                    print!(
                        "\r{} {:<12} {:>5.1}%",
                        engine.display(),
                        engine.mode().label(),
                        engine.progress_pct()
                    );
                    let _ = std::io::stdout().flush();
                    match serde_json::to_string(&*engine) {
                        Ok(json) => {
                            if let Err(e) = db.set(TIMER_STATE_KEY, &json) {
                                tracing::warn!(error = %e, "could not save countdown state");
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "could not encode countdown state"),
                    }
                })
                .await;
            println!();
            if let Some(event) = completed {
                print_json(&event)?;
            }
        }
    }

    timer.save_state()?;
    Ok(())
}
