use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use kindred::{
    db::{get_db_pool, DatabaseConfig, PgStore},
    services::{eligibility, KeywordCatalogue, RecommendationEngine},
    utils::{init_logging, config::Config},
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let matches = Command::new("recommend")
        .about("Print the live recommendation list of one user with its score breakdown")
        .arg(
            Arg::new("user-id")
                .long("user-id")
                .short('u')
                .help("User to compute recommendations for")
                .value_parser(clap::value_parser!(i32))
                .required(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print JSON instead of a table")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("catalogue")
                .long("catalogue")
                .short('c')
                .help("Keyword catalogue file, overrides KEYWORD_CATALOGUE_PATH"),
        )
        .get_matches();

    let user_id = *matches.get_one::<i32>("user-id").context("--user-id is required")?;
    let as_json = matches.get_flag("json");

    let config = Config::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    let catalogue_path = matches
        .get_one::<String>("catalogue")
        .map(String::as_str)
        .or(config.keyword_catalogue_path.as_deref());
    let engine = RecommendationEngine::new(KeywordCatalogue::load(catalogue_path)?);
    let store = PgStore::new(pool);

    let recommendations = eligibility::recommendations_for(&store, &engine, user_id).await?;
    if recommendations.is_empty() {
        warn!("No recommendations for user {}", user_id);
    }

    if as_json {
        let rows: Vec<serde_json::Value> = recommendations
            .iter()
            .map(|c| {
                serde_json::json!({
                    "user_id": c.user_id,
                    "display_name": c.display_name,
                    "score": c.score,
                    "match_percent": c.match_percent,
                    "breakdown": c.breakdown,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    info!("Recommendations for user {}", user_id);
    println!(
        "{:>4} {:>8} {:<24} {:>6} {:>5}  {:>7} {:>7} {:>7} {:>7} {:>7} {:>7} {:>9}",
        "#", "user", "name", "score", "%", "analog", "digital", "collab", "food", "music", "loc", "km"
    );
    for (rank, c) in recommendations.iter().enumerate() {
        let b = &c.breakdown;
        println!(
            "{:>4} {:>8} {:<24} {:>6} {:>4}%  {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>9}",
            rank + 1,
            c.user_id,
            c.display_name,
            c.score,
            c.match_percent,
            b.analog,
            b.digital,
            b.collaboration,
            b.food,
            b.music,
            b.location,
            b.distance_km.map(|d| format!("{:.1}", d)).unwrap_or_else(|| "-".to_string()),
        );
    }

    Ok(())
}
