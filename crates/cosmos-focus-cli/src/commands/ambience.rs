//! Decorative layer commands: previews of the starfield and shooting stars,
//! and offline rendering of the ambient soundscapes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Subcommand;
use cosmos_focus_core::ambience::{
    AmbientSound, ShootingStarSpawner, Soundscape, Starfield, Viewport, FADE_OUT_SECS,
};
use cosmos_focus_core::Config;

#[derive(Subcommand)]
pub enum AmbienceAction {
    /// List the available soundscapes
    Sounds,
    /// Print a character preview of the starfield
    Starfield {
        #[arg(long, default_value = "1280")]
        width: f64,
        #[arg(long, default_value = "720")]
        height: f64,
        #[arg(long, default_value = "1")]
        dpr: f64,
        /// Animation frames to advance before drawing
        #[arg(long, default_value = "0")]
        frames: u32,
        /// Seed for a reproducible sky
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Simulate the shooting-star spawner and print each star as JSON
    Shooting {
        #[arg(long, default_value = "30")]
        seconds: u64,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Render a soundscape, including its fade-out, to raw little-endian f32
    /// mono samples
    Render {
        /// Soundscape id (deep-space, alpha-waves, cosmic-rain)
        sound: Option<Soundscape>,
        #[arg(long, default_value = "5")]
        seconds: f64,
        /// Output file; samples go to stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub fn run(action: AmbienceAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        AmbienceAction::Sounds => {
            for sound in Soundscape::ALL {
                let marker = if sound == config.audio.default_sound { "*" } else { " " };
                println!(
                    "{marker} {:<12} {:<12} {}",
                    sound.id(),
                    sound.label(),
                    sound.description()
                );
            }
        }
        AmbienceAction::Starfield { width, height, dpr, frames, seed } => {
            let viewport = Viewport::new(width, height, dpr);
            let mut field = match seed {
                Some(seed) => Starfield::with_seed(viewport, &config.starfield, seed),
                None => Starfield::new(viewport, &config.starfield),
            };
            for _ in 0..frames {
                field.advance();
            }
            print!("{}", field.render_ascii(80, 24));
            println!("{} stars", field.stars().len());
        }
        AmbienceAction::Shooting { seconds, seed } => {
            let mut spawner = match seed {
                Some(seed) => ShootingStarSpawner::with_seed(&config.shooting_stars, seed),
                None => ShootingStarSpawner::new(&config.shooting_stars),
            };
            let mut last_id = None;
            let mut report = |spawner: &ShootingStarSpawner| -> Result<(), serde_json::Error> {
                for star in spawner.stars() {
                    if last_id.map_or(true, |id| star.id > id) {
                        println!("{}", serde_json::to_string(star)?);
                        last_id = Some(star.id);
                    }
                }
                Ok(())
            };
            spawner.start(Duration::ZERO);
            report(&spawner)?;
            for tick in 1..=seconds * 10 {
                spawner.advance(Duration::from_millis(tick * 100));
                report(&spawner)?;
            }
            spawner.stop();
        }
        AmbienceAction::Render { sound, seconds, output } => {
            let sound = sound.unwrap_or(config.audio.default_sound);
            let mut player = AmbientSound::new(config.audio.sample_rate, config.audio.master_volume);
            player.play(sound);
            let mut samples = player.render_secs(seconds.max(0.0));
            player.stop();
            samples.extend(player.render_secs(FADE_OUT_SECS));
            player.close();

            let mut out: Box<dyn Write> = match output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(BufWriter::new(std::io::stdout().lock())),
            };
            for sample in &samples {
                out.write_all(&sample.to_le_bytes())?;
            }
            out.flush()?;
            tracing::info!(%sound, samples = samples.len(), "rendered soundscape");
        }
    }
    Ok(())
}
