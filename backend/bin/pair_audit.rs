use anyhow::Result;
use clap::{Arg, Command};
use kindred::{
    db::{connections, get_db_pool, DatabaseConfig},
    utils::init_logging,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    // Pairs whose rows disagree are resolved by the newest (updated_at, id).
    let matches = Command::new("pair-audit")
        .about("List user pairs that carry more than one connection row")
        .arg(
            Arg::new("limit")
                .long("limit")
                .short('l')
                .help("Maximum number of pairs to report")
                .value_parser(clap::value_parser!(i64))
                .default_value("50"),
        )
        .get_matches();

    let limit = matches.get_one::<i64>("limit").copied().unwrap_or(50);

    let db_config = DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    let duplicates = connections::find_duplicate_pairs(&pool, limit).await?;
    if duplicates.is_empty() {
        info!("✅ No pair carries more than one connection row");
        return Ok(());
    }

    info!("Found {} pairs with duplicate rows", duplicates.len());
    println!("{:>8} {:>8} {:>6} {:>10} {:<12}", "low", "high", "rows", "winner", "status");
    for pair in &duplicates {
        println!(
            "{:>8} {:>8} {:>6} {:>10} {:<12}",
            pair.low_id,
            pair.high_id,
            pair.row_count,
            pair.winning_id,
            pair.winning_status.as_str(),
        );
    }

    Ok(())
}
