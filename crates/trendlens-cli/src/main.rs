use clap::{Args, Parser, Subcommand};

use trendlens_content::{derive_keywords, TemplateIdeas};
use trendlens_core::BusinessProfile;
use trendlens_sources::{
    DiscussionsClient, NewsClient, SourceConfig, SourceTtls, SuggestClient, TopicsClient,
    TrendAggregator, TrendCache,
};

#[derive(Debug, Parser)]
#[command(name = "trendlens-cli")]
#[command(about = "Trendlens command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Derive the keyword list for a business profile.
    Keywords(ProfileArgs),
    /// Run one trend analysis and print the report as JSON.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
struct ProfileArgs {
    /// Business name, e.g. "Joe's Coffee".
    #[arg(long)]
    name: String,
    /// Business type label, e.g. "Cafe".
    #[arg(long)]
    business_type: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    industry: String,
    /// Target audience description.
    #[arg(long)]
    audience: String,
    /// Services description.
    #[arg(long)]
    services: String,
}

impl ProfileArgs {
    fn into_profile(self) -> BusinessProfile {
        BusinessProfile {
            business_name: self.name,
            business_type: self.business_type,
            city: self.city,
            industry: self.industry,
            target_audience: self.audience,
            services_offered: self.services,
        }
    }
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    profile: ProfileArgs,
    /// Comma-separated keywords; derived from the profile when omitted.
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Keywords(args) => {
            let profile = args.into_profile();
            for keyword in derive_keywords(&profile) {
                println!("{keyword}");
            }
        }
        Commands::Analyze(args) => {
            let profile = args.profile.into_profile();
            let keywords = if args.keywords.is_empty() {
                derive_keywords(&profile)
            } else {
                args.keywords
            };

            let config = SourceConfig::default();
            let news_api_key = std::env::var("NEWS_API_KEY")
                .ok()
                .or_else(|| std::env::var("NEWSAPI_KEY").ok());
            let aggregator = TrendAggregator::new(
                SuggestClient::new(&config)?,
                TopicsClient::new(&config)?,
                DiscussionsClient::new(&config)?,
                NewsClient::new(&config, news_api_key)?,
                TrendCache::new(),
                SourceTtls::default(),
            );

            let report = aggregator
                .analyze(&TemplateIdeas, &profile, &keywords)
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
