use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use discovery::{DiscoveryConfig, DiscoveryOrchestrator, DiscoveryResult, LoadingState};
use pipeline::{MoodConfig, MoodScorer};
use place_data::parser::parse_profile;
use place_data::{GeoPoint, MoodLabel, PlaceIndex, PreferenceProfile};
use sentiment_client::GrpcSentimentClient;
use sources::{FixtureSearchClient, InMemoryPlaceCache};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::warn;

/// Makati CBD, the default search center
const DEFAULT_LAT: f64 = 14.5547;
const DEFAULT_LNG: f64 = 121.0244;

/// Gala - mood-aware place discovery
#[derive(Parser)]
#[command(name = "gala")]
#[command(about = "Find places that fit your mood, widening the search until enough turn up", long_about = None)]
struct Cli {
    /// Place fixture (JSON array of places)
    #[arg(short, long, default_value = "data/sample_places.json")]
    places: PathBuf,

    /// Discovery config (JSON, camelCase keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mood scoring config (JSON, camelCase keys)
    #[arg(long)]
    mood_config: Option<PathBuf>,

    /// Sentiment service address, e.g. http://localhost:50052
    #[arg(long)]
    sentiment_addr: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover places for a set of filters
    Discover {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of pages to fetch
        #[arg(long, default_value = "1")]
        pages: usize,

        /// Print the JSON result of each page instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Show how a place's mood score is put together
    Mood {
        /// Place ID from the fixture
        #[arg(long)]
        place_id: String,

        /// Review text to score instead of the stored one
        #[arg(long)]
        review: Option<String>,
    },

    /// Summarize the place fixture
    Inspect,

    /// Run random discovery sessions and report latency
    Benchmark {
        /// Number of sessions to run
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Sessions in flight at once
        #[arg(long, default_value = "10")]
        concurrent: usize,

        /// Simulated search latency in milliseconds
        #[arg(long, default_value = "0")]
        latency_ms: u64,

        /// Share a search cache across sessions
        #[arg(long)]
        cache: bool,
    },
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Profile JSON file; replaces the flags below
    #[arg(long)]
    profile: Option<PathBuf>,

    /// food, activity or something-new
    #[arg(long)]
    category: Option<String>,

    /// 0 (chill) to 100 (hype)
    #[arg(long)]
    mood: Option<u8>,

    /// Percent of the maximum search radius
    #[arg(long, default_value = "10")]
    distance: u8,

    /// solo, with-bae or barkada
    #[arg(long)]
    social: Option<String>,

    /// P, PP or PPP
    #[arg(long)]
    budget: Option<String>,

    /// morning, afternoon or night
    #[arg(long)]
    time: Option<String>,

    #[arg(long, default_value_t = DEFAULT_LAT, allow_negative_numbers = true)]
    lat: f64,

    #[arg(long, default_value_t = DEFAULT_LNG, allow_negative_numbers = true)]
    lng: f64,
}

impl FilterArgs {
    /// Build the profile. Missing required values are left unset so the
    /// orchestrator reports them.
    fn to_profile(&self) -> Result<PreferenceProfile> {
        if let Some(path) = &self.profile {
            return parse_profile(path)
                .with_context(|| format!("Failed to read profile {}", path.display()));
        }

        Ok(PreferenceProfile {
            category: self.category.as_deref().map(str::parse).transpose()?,
            mood: self.mood,
            social_context: self.social.as_deref().map(str::parse).transpose()?,
            budget: self.budget.as_deref().map(str::parse).transpose()?,
            time_of_day: self.time.as_deref().map(str::parse).transpose()?,
            distance_range: Some(self.distance),
            user_location: Some(GeoPoint::new(self.lat, self.lng)),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading places from {}...", cli.places.display());
    let start = Instant::now();
    let index = Arc::new(
        PlaceIndex::load_from_file(&cli.places).context("Failed to load place fixture")?,
    );
    println!(
        "{} Loaded {} places in {:?}",
        "✓".green(),
        index.counts().0,
        start.elapsed()
    );

    let config = match &cli.config {
        Some(path) => DiscoveryConfig::from_file(path)?,
        None => DiscoveryConfig::default(),
    };
    let scorer = build_scorer(cli.mood_config.as_deref(), cli.sentiment_addr.as_deref())?;

    match cli.command {
        Commands::Discover {
            filters,
            pages,
            json,
        } => handle_discover(index, scorer, config, &filters, pages, json).await?,
        Commands::Mood { place_id, review } => {
            handle_mood(&index, &scorer, &place_id, review.as_deref()).await?
        }
        Commands::Inspect => handle_inspect(&index),
        Commands::Benchmark {
            requests,
            concurrent,
            latency_ms,
            cache,
        } => handle_benchmark(index, scorer, config, requests, concurrent, latency_ms, cache).await?,
    }

    Ok(())
}

fn build_scorer(mood_config: Option<&Path>, sentiment_addr: Option<&str>) -> Result<MoodScorer> {
    let config = match mood_config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read mood config {}", path.display()))?;
            serde_json::from_str::<MoodConfig>(&content)
                .with_context(|| format!("Invalid mood config {}", path.display()))?
        }
        None => MoodConfig::default(),
    };

    let mut scorer = MoodScorer::new(config);
    if let Some(addr) = sentiment_addr {
        // Dialed on first use; an unreachable service degrades to baseline scoring
        let client = GrpcSentimentClient::connect_lazy(addr)?;
        scorer = scorer.with_sentiment(Arc::new(client));
    }
    Ok(scorer)
}

/// Handle the 'discover' command
async fn handle_discover(
    index: Arc<PlaceIndex>,
    scorer: MoodScorer,
    config: DiscoveryConfig,
    filters: &FilterArgs,
    pages: usize,
    json: bool,
) -> Result<()> {
    let profile = filters.to_profile()?;
    let search = Arc::new(FixtureSearchClient::new(index));
    let mut orchestrator = DiscoveryOrchestrator::new(search, scorer).with_config(config);

    let target = profile.mood.unwrap_or_default();
    for page in 1..=pages.max(1) {
        let start = Instant::now();
        let result = if page == 1 {
            orchestrator.discover_places(&profile).await?
        } else {
            orchestrator.get_next_batch(&profile).await?
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_page(page, &result, target, start.elapsed());
        }

        if result.places.is_empty() && result.loading_state != LoadingState::Complete {
            break;
        }
    }
    Ok(())
}

/// Handle the 'mood' command
async fn handle_mood(
    index: &PlaceIndex,
    scorer: &MoodScorer,
    place_id: &str,
    review: Option<&str>,
) -> Result<()> {
    let place = index
        .get_place(place_id)
        .ok_or_else(|| anyhow!("Place {} not found", place_id))?;
    let review = review.or(place.review.as_deref());
    let breakdown = scorer.explain(place, review).await;

    println!("{}", format!("{} ({})", place.name, place.id).bold().blue());
    println!("{}Types: {}", "• ".green(), place.types.join(", "));
    println!("{}Baseline: {:.1}", "• ".green(), breakdown.baseline);
    println!("{}Busyness: {:+.1}", "• ".green(), breakdown.busyness);
    match breakdown.sentiment {
        Some(points) => println!("{}Sentiment: {:+.1}", "• ".green(), points),
        None => println!("{}Sentiment: {}", "• ".green(), "n/a".dimmed()),
    }
    println!(
        "{}Keywords: {:+.1} (hype {}, chill {}, neutral {})",
        "• ".green(),
        breakdown.keywords,
        breakdown.hype_matches,
        breakdown.chill_matches,
        breakdown.neutral_matches
    );
    println!(
        "{}Score: {} {}",
        "• ".cyan(),
        breakdown.score,
        label(MoodLabel::from_score(breakdown.score))
    );
    Ok(())
}

/// Handle the 'inspect' command
fn handle_inspect(index: &PlaceIndex) {
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    let mut priced = 0;
    let mut reviewed = 0;

    let ids = index.all_place_ids();
    for id in &ids {
        if let Some(place) = index.get_place(id) {
            for place_type in &place.types {
                *by_type.entry(place_type.as_str()).or_default() += 1;
            }
            priced += usize::from(place.price_level.is_some());
            reviewed += usize::from(place.review.is_some());
        }
    }

    println!("{}", "Place fixture:".bold().blue());
    println!("{}Places: {}", "• ".green(), ids.len());
    println!("{}With price level: {}", "• ".green(), priced);
    println!("{}With review: {}", "• ".green(), reviewed);
    println!("Places by type:");
    for (place_type, count) in by_type {
        println!("  - {}: {}", place_type, count);
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    index: Arc<PlaceIndex>,
    scorer: MoodScorer,
    config: DiscoveryConfig,
    requests: usize,
    concurrent: usize,
    latency_ms: u64,
    use_cache: bool,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    let search = Arc::new(
        FixtureSearchClient::new(index).with_latency(Duration::from_millis(latency_ms)),
    );
    let cache = Arc::new(InMemoryPlaceCache::new());
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));

    let started = Instant::now();
    let mut handles = vec![];
    for _ in 0..requests {
        let profile = random_profile();
        let mut orchestrator =
            DiscoveryOrchestrator::new(search.clone(), scorer.clone()).with_config(config.clone());
        if use_cache {
            orchestrator = orchestrator.with_cache(cache.clone());
        }
        let permits = permits.clone();

        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            let result = orchestrator.discover_places(&profile).await?;
            Ok::<_, anyhow::Error>((start.elapsed(), result.loading_state))
        }));
    }

    let mut timings = vec![];
    let mut states: BTreeMap<String, usize> = BTreeMap::new();
    for handle in handles {
        match handle.await? {
            Ok((elapsed, state)) => {
                timings.push(elapsed);
                *states.entry(state.to_string()).or_default() += 1;
            }
            Err(e) => warn!("Benchmark session failed: {}", e),
        }
    }
    if timings.is_empty() {
        bail!("Every benchmark session failed");
    }

    let wall = started.elapsed();
    let total: Duration = timings.iter().sum();
    let avg = total / timings.len() as u32;
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];

    println!("{}", "Benchmark results:".bold().blue());
    println!("Sessions: {}", timings.len());
    println!("Wall time: {:?}", wall);
    println!("Average latency: {:?}", avg);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} sessions/second",
        timings.len() as f64 / wall.as_secs_f64()
    );
    println!("Outcomes:");
    for (state, count) in states {
        println!("  - {}: {}", state, count);
    }
    if use_cache {
        println!("Cached searches: {}", cache.len().await);
    }
    Ok(())
}

fn random_profile() -> PreferenceProfile {
    let category = match rand::random::<u8>() % 3 {
        0 => "food",
        1 => "activity",
        _ => "something-new",
    };
    PreferenceProfile {
        category: category.parse().ok(),
        mood: Some(rand::random::<u8>() % 101),
        distance_range: Some(rand::random::<u8>() % 30),
        user_location: Some(GeoPoint::new(
            DEFAULT_LAT + (rand::random::<f64>() - 0.5) * 0.05,
            DEFAULT_LNG + (rand::random::<f64>() - 0.5) * 0.05,
        )),
        ..PreferenceProfile::default()
    }
}

fn label(mood: MoodLabel) -> colored::ColoredString {
    match mood {
        MoodLabel::Chill => "chill".cyan(),
        MoodLabel::Neutral => "neutral".yellow(),
        MoodLabel::Hype => "hype".magenta(),
    }
}

/// Print one page with session status
fn print_page(page: usize, result: &DiscoveryResult, target: u8, elapsed: Duration) {
    println!(
        "{}",
        format!("Page {} ({}, {:?}):", page, result.loading_state, elapsed)
            .bold()
            .blue()
    );

    for (rank, place) in result.places.iter().enumerate() {
        let price = place
            .candidate
            .price_level
            .map(|level| "₱".repeat(level.max(1) as usize))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}. {} [{}] {} - mood {} {} (fit {})",
            (rank + 1).to_string().green(),
            place.candidate.name,
            place.candidate.types.join(", "),
            price,
            place.mood_score,
            label(place.mood_label),
            pipeline::compatibility(place.mood_score, target)
        );
    }

    if let Some(info) = result.expansion_info {
        println!(
            "   radius {} m after {} expansion(s), {} compatible found",
            info.final_radius, info.expansion_count, info.total_places_found
        );
    }
    if let Some(pool) = result.pool_info {
        println!(
            "   {} left in pool{}",
            pool.remaining_places,
            if pool.needs_refresh { ", running low" } else { "" }
        );
    }
    match result.loading_state {
        LoadingState::LimitReached => {
            println!("   {}", "Search limit reached, no more places nearby".yellow())
        }
        LoadingState::SearchUnavailable => println!(
            "   {} {}",
            "Search unavailable:".red(),
            result.last_error.as_deref().unwrap_or("unknown error")
        ),
        _ => {}
    }
}
