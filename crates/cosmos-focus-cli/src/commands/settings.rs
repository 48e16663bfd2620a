use clap::Subcommand;
use cosmos_focus_core::storage::Database;
use cosmos_focus_core::timer::FocusTimer;
use cosmos_focus_core::TimerMode;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print per-mode durations
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one mode's duration in minutes (1-120)
    Set {
        /// Mode (focus, short, long)
        mode: TimerMode,
        /// Minutes; non-numeric input counts as 1
        minutes: String,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut timer = FocusTimer::restore(&db);

    match action {
        SettingsAction::Show { json } => {
            let settings = *timer.engine().settings();
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                for mode in TimerMode::ALL {
                    println!("{:<12} {:>3} min", mode.label(), settings.duration_secs(mode) / 60);
                }
            }
        }
        SettingsAction::Set { mode, minutes } => {
            let mut draft = timer.edit_settings();
            draft.set_minutes_input(mode, &minutes);
            let event = timer.apply_settings(draft.save())?;
            println!("{}", serde_json::to_string_pretty(&event)?);
            timer.save_state()?;
        }
    }
    Ok(())
}
