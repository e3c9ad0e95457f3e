use anyhow::{Context, Result};

use spadl_actions::config::{self, SpadlConfig};
use spadl_actions::{pipeline, store};

fn main() -> Result<()> {
    config::load_dotenv();
    config::init_tracing();

    let cfg = SpadlConfig::from_env()?;
    let db_path = config::parse_db_path_arg()
        .or_else(config::default_db_path)
        .context("unable to resolve sqlite path")?;

    let mut conn = store::open_db(&db_path)?;
    let summary = pipeline::convert_all_games(&mut conn, &cfg, config::convert_parallelism())?;

    println!("Conversion complete");
    println!("DB: {}", db_path.display());
    println!(
        "Games: {}/{}",
        summary.games_converted, summary.games_total
    );
    println!("Actions written: {}", summary.actions_written);
    if !summary.errors.is_empty() {
        println!("Errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(8) {
            println!(" - {err}");
        }
    }
    Ok(())
}
