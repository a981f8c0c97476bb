use country_rates_cache::domain::enrich::{enrich_countries, FixedMultiplier};
use country_rates_cache::infra::config::{AppConfig, StorageBackend};
use country_rates_cache::infra::sources::{
    CountrySource, ExchangeRateClient, RateSource, RestCountriesClient,
};
use country_rates_cache::storage::{CountryStore, PostgresCountryStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--skip-sources]\n\
         \n\
         Reads the same env vars as api_server:\n\
           STORAGE_BACKEND, DATABASE_URL, COUNTRIES_API_URL, EXCHANGE_RATE_API_URL, FETCH_TIMEOUT_SECS\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let skip_sources = args.iter().any(|a| a == "--skip-sources");

    // Force-read config (nice error messages if missing)
    let config = AppConfig::from_env()?;

    println!("> Preflight:");
    println!("  STORAGE_BACKEND={:?}", config.storage_backend);
    println!("  COUNTRIES_API_URL={}", config.countries_api_url);
    println!("  EXCHANGE_RATE_API_URL={}", config.exchange_rate_api_url);
    println!("  FETCH_TIMEOUT={:?}", config.fetch_timeout);
    println!("  CACHE_DIR={}", config.cache_dir.display());

    if config.storage_backend == StorageBackend::Postgres {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let store = PostgresCountryStore::connect(url, 1).await?;
        let status = store.status().await?;
        println!(
            "  Postgres: OK (schema ready, total_countries={}, last_refreshed_at={:?})",
            status.total_countries, status.last_refreshed_at
        );
        store.close().await;
    }

    tokio::fs::create_dir_all(&config.cache_dir).await?;
    println!("  Cache dir: writable");

    if skip_sources {
        println!("> Skipping source checks.");
        return Ok(());
    }

    let countries = RestCountriesClient::new(config.countries_api_url.clone(), config.fetch_timeout)?;
    let rates = ExchangeRateClient::new(config.exchange_rate_api_url.clone(), config.fetch_timeout)?;
    let (raw, table) = tokio::try_join!(countries.fetch_countries(), rates.fetch_rates())?;
    println!("  Country source: {} entries", raw.len());
    println!("  Rate source: {} currencies", table.len());

    let report = enrich_countries(&raw, &table, &FixedMultiplier(1500.0));
    let unquoted = report
        .countries
        .iter()
        .filter(|c| c.currency_code().is_some() && c.exchange_rate().is_none())
        .count();
    println!(
        "  Dry-run enrichment: {} usable, {} skipped, {} without a quoted rate",
        report.countries.len(),
        report.skipped,
        unquoted
    );
    println!("> Preflight OK.");
    Ok(())
}
