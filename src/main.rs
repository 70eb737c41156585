//! Terminal dashboard for the CI/CD Fixer Agent backend

use cicd_fixer_client::analytics::{
    compute_fix_statistics, error_type_distribution, format_confidence, language_distribution,
    rank_failing_repositories,
};
use cicd_fixer_client::client::{FailureQuery, FixerClient};
use cicd_fixer_client::models::{AnalysisRequest, DashboardSummary, EffectivenessMetrics};
use cicd_fixer_client::{Config, Result};
use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser)]
#[command(
    name = "cicd-fixer-client",
    version,
    about = "Browse pipeline failures, review AI-suggested fixes, and render analytics"
)]
struct Cli {
    /// Backend base URL (overrides FIXER_API_URL and the built-in default)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Backend health and per-service status
    Health,
    /// List recorded pipeline failures
    Failures {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one failure in full, including its error log
    Failure { id: String },
    /// List proposed fixes with aggregate statistics
    Fixes,
    /// Approve a fix, optionally with a review comment
    Approve {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Reject a fix, optionally with a review comment
    Reject {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Apply an approved fix
    Apply { id: String },
    /// Dashboard summary counters and recent activity
    Dashboard,
    /// Failure patterns: repository ranking, error types, languages
    Patterns {
        #[arg(long)]
        days_back: Option<u32>,
    },
    /// Fix effectiveness metrics with per-error-type breakdown
    Effectiveness,
    /// Analytics for one repository
    Repository { owner: String, repo: String },
    /// Trigger analysis of a specific workflow run
    Analyze {
        owner: String,
        repo: String,
        run_id: i64,
    },
    /// All analytics sources, fetched concurrently
    Overview,
}

#[tokio::main]
async fn main() {
    initialize_tracing();

    let cli = Cli::parse();
    let config = Config::resolve(cli.api_url);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    let client = match FixerClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &client).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(command: Command, client: &FixerClient) -> Result<()> {
    match command {
        Command::Health => {
            let health = client.get_health().await?;
            println!("status: {}", health.status);
            if let Some(ts) = &health.timestamp {
                println!("as of:  {}", ts);
            }
            for (service, state) in &health.services {
                println!("  {:<12} {}", service, state);
            }
        }

        Command::Failures {
            limit,
            offset,
            status,
        } => {
            let query = FailureQuery {
                limit,
                offset,
                status,
            };
            let response = client.get_failures(&query).await?;
            if response.failures.is_empty() {
                println!("No failures recorded.");
                return Ok(());
            }
            for failure in &response.failures {
                println!(
                    "{:<10} {}/{} run {} [{}] fix: {}",
                    failure.id.as_deref().unwrap_or("-"),
                    failure.owner.as_deref().unwrap_or("?"),
                    failure.repo_name.as_deref().unwrap_or("?"),
                    failure.run_id.map_or("-".to_string(), |id| id.to_string()),
                    failure.conclusion.as_deref().unwrap_or("unknown"),
                    failure.fix_status,
                );
            }
            if let Some(total) = response.total {
                println!("({} of {} total)", response.failures.len(), total);
            }
        }

        Command::Failure { id } => {
            let failure = client.get_failure(&id).await?;
            println!(
                "{}/{} run {} — {}",
                failure.owner.as_deref().unwrap_or("?"),
                failure.repo_name.as_deref().unwrap_or("?"),
                failure.run_id.map_or("-".to_string(), |id| id.to_string()),
                failure.workflow_name.as_deref().unwrap_or("unknown workflow"),
            );
            println!(
                "status: {} / {}  fix: {}",
                failure.status.as_deref().unwrap_or("unknown"),
                failure.conclusion.as_deref().unwrap_or("unknown"),
                failure.fix_status,
            );
            if let Some(log) = &failure.error_log {
                println!("\n{}", log);
            }
            if let Some(fix) = &failure.suggested_fix {
                println!("\nSuggested fix:\n{}", fix);
            }
        }

        Command::Fixes => {
            let response = client.get_fixes().await?;
            let stats = compute_fix_statistics(&response.fixes);

            println!(
                "total {}  pending {}  approved {}  rejected {}  applied {}",
                stats.total, stats.pending, stats.approved, stats.rejected, stats.applied
            );
            println!(
                "success rate {:.1}%  avg confidence {}",
                stats.success_rate,
                format_confidence(Some(stats.avg_confidence)),
            );

            if response.fixes.is_empty() {
                println!("No fixes available for review.");
                return Ok(());
            }
            println!();
            for fix in &response.fixes {
                println!(
                    "{:<10} {:<18} {:<10} confidence {}",
                    fix.id.as_deref().unwrap_or("-"),
                    fix.status.to_string(),
                    fix.repository
                        .as_deref()
                        .or(fix.repo_name.as_deref())
                        .unwrap_or("?"),
                    format_confidence(fix.confidence_score),
                );
            }
        }

        Command::Approve { id, comment } => {
            let response = client.approve_fix(&id, comment.as_deref()).await?;
            println!(
                "{}",
                response.message.as_deref().unwrap_or("Fix approved.")
            );
        }

        Command::Reject { id, comment } => {
            let response = client.reject_fix(&id, comment.as_deref()).await?;
            println!(
                "{}",
                response.message.as_deref().unwrap_or("Fix rejected.")
            );
        }

        Command::Apply { id } => {
            let response = client.apply_fix(&id).await?;
            println!("{}", response.message.as_deref().unwrap_or("Fix applied."));
        }

        Command::Dashboard => {
            let response = client.get_dashboard().await?;
            print_summary(&response.summary);
        }

        Command::Patterns { days_back } => {
            let response = client.get_patterns(days_back).await?;
            let report = &response.patterns;

            println!("Most failing repositories:");
            let ranked = rank_failing_repositories(&report.most_failing_repos);
            if ranked.is_empty() {
                println!("  (no failure data)");
            }
            for entry in &ranked {
                println!("  {:<23} {:>5}", entry.label, entry.failures);
            }

            println!("\nError types:");
            for slice in error_type_distribution(&report.common_error_types) {
                println!("  {:<18} {:>5}  {}", slice.label, slice.count, slice.color);
            }

            println!("\nLanguages:");
            for slice in language_distribution(&report.language_distribution) {
                println!("  {:<18} {:>5}", slice.label, slice.count);
            }

            if !response.recommendations.is_empty() {
                println!("\nRecommendations:");
                for rec in &response.recommendations {
                    println!("  - {}", rec);
                }
            }
        }

        Command::Effectiveness => {
            let metrics = client.get_effectiveness().await?;
            print_effectiveness(&metrics);
        }

        Command::Repository { owner, repo } => {
            let profile = client.get_repository_analytics(&owner, &repo).await?;
            println!(
                "{}/{}: {} runs, {:.1}% success",
                owner,
                repo,
                profile.total_runs,
                profile.success_rate * 100.0,
            );
            if let Some(language) = &profile.primary_language {
                println!("primary language: {}", language);
            }
            for rec in &profile.recommendations {
                println!("  - {}", rec);
            }
        }

        Command::Analyze {
            owner,
            repo,
            run_id,
        } => {
            let request = AnalysisRequest {
                owner,
                repo,
                run_id,
            };
            let response = client.trigger_analysis(&request).await?;
            println!(
                "{}",
                response
                    .message
                    .as_deref()
                    .unwrap_or("Analysis triggered.")
            );
        }

        Command::Overview => {
            let overview = client.fetch_analytics_overview().await;

            match overview.summary {
                Ok(summary) => print_summary(&summary),
                Err(e) => println!("dashboard summary unavailable: {}", e),
            }
            println!();
            match overview.effectiveness {
                Ok(metrics) => print_effectiveness(&metrics),
                Err(e) => println!("effectiveness metrics unavailable: {}", e),
            }
            println!();
            match overview.patterns {
                Ok(response) => {
                    let ranked = rank_failing_repositories(&response.patterns.most_failing_repos);
                    println!("Top failing repositories:");
                    if ranked.is_empty() {
                        println!("  (no failure data)");
                    }
                    for entry in ranked.iter().take(5) {
                        println!("  {:<23} {:>5}", entry.label, entry.failures);
                    }
                }
                Err(e) => println!("failure patterns unavailable: {}", e),
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &DashboardSummary) {
    println!(
        "failures {}  repositories {}  active fixes {}  success rate {:.1}%",
        summary.total_failures,
        summary.total_repositories,
        summary.active_fixes,
        summary.success_rate * 100.0,
    );
    if let Some(avg) = &summary.avg_processing_time {
        println!("avg processing time: {}", avg);
    }
    if !summary.recent_activity.is_empty() {
        println!("recent activity:");
        for event in summary.recent_activity.iter().take(10) {
            println!(
                "  {:<24} {}  {}",
                event.repo_label(),
                event.status.as_deref().or(event.workflow_name.as_deref()).unwrap_or("-"),
                event
                    .timestamp
                    .as_deref()
                    .or(event.created_at.as_deref())
                    .unwrap_or(""),
            );
        }
    }
}

fn print_effectiveness(metrics: &EffectivenessMetrics) {
    println!(
        "fixes generated {}  approved {}  pending {}  approval rate {:.0}%",
        metrics.total_fixes_generated,
        metrics.total_fixes_approved,
        metrics.pending_fixes,
        metrics.overall_approval_rate * 100.0,
    );
    if !metrics.effectiveness_by_type.is_empty() {
        let mut by_type: Vec<_> = metrics.effectiveness_by_type.iter().collect();
        by_type.sort_by(|a, b| a.0.cmp(b.0));
        for (error_type, breakdown) in by_type {
            println!(
                "  {:<28} {:>3.0}% ({} of {})",
                error_type,
                breakdown.approval_rate * 100.0,
                breakdown.approved,
                breakdown.total,
            );
        }
    }
}
