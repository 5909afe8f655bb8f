//! Runeforge Engine - command line roller.
//!
//! Usage: `runeforge-engine <notation> [dc]`

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runeforge_domain::OutcomeDetails;
use runeforge_engine::infrastructure::settings::DiceSettings;
use runeforge_engine::App;

fn main() -> anyhow::Result<()> {
    // Load environment from repo root so the binary works from any crate directory.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runeforge_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(notation) = args.next() else {
        anyhow::bail!("usage: runeforge-engine <notation> [dc]");
    };
    let dc = args
        .next()
        .map(|raw| raw.parse::<i32>().with_context(|| format!("invalid DC '{raw}'")))
        .transpose()?;

    let settings = DiceSettings::from_env()?;
    let app = App::new(settings);

    let roll = app.use_cases.dice.roll(&notation, Some("cli"))?;

    println!("{}: {:?}", roll.pool(), roll.raw_rolls());
    println!(
        "net successes: {} (successes {}, botches {})",
        roll.net_successes(),
        roll.successes(),
        roll.botches()
    );
    if roll.explosion_count() > 0 {
        println!("explosions: {}", roll.explosion_count());
    }
    println!("total: {}", roll.total());

    if let Some(dc) = dc {
        let outcome = OutcomeDetails::from_roll(&roll, dc);
        println!(
            "vs DC {dc}: {} (margin {})",
            outcome.outcome_type(),
            outcome.margin()
        );
    }

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
