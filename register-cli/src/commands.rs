//! Subcommands and their rendering.

use advisor::{topic, AdvisorConfig, AdvisoryDialogue, SendOutcome, Topic};
use anyhow::{anyhow, bail};
use clap::{Args, Subcommand};
use register::{
    coerce_amount, AuthMethod, CitizenRecord, IncidentInput, IncidentStatus, RedactionMode,
    ScoreReport, ViewModel,
};
use std::sync::Arc;
use tracing::info;

/// CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in (google, facebook, anonymous)
    Login {
        method: AuthMethod,
    },

    /// Show the record
    Show {
        /// Show the owner view instead of the public one
        #[arg(long)]
        owner: bool,
    },

    /// Declare an incident
    Add(AddArgs),

    /// Delete an incident by id
    Remove {
        id: String,
    },

    /// Change the display name
    Rename {
        name: String,
    },

    /// Print the reliability report
    Score,

    /// List the debate challenges
    Topics,

    /// Ask the advisor
    Ask(AskArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Incident title
    pub title: String,

    /// Amount; unparsable or negative values count as 0
    #[arg(short, long, default_value = "0")]
    pub amount: String,

    /// Free text description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// REPORTED, VERIFIED, PENDING or RESOLVED
    #[arg(short, long)]
    pub status: Option<IncidentStatus>,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Discuss a catalogued challenge
    #[arg(long, conflicts_with_all = ["incident", "context"])]
    pub topic: Option<u32>,

    /// Discuss one incident of the record
    #[arg(long, conflicts_with = "context")]
    pub incident: Option<String>,

    /// Discuss arbitrary context
    #[arg(long)]
    pub context: Option<String>,

    /// What to say. Empty asks for an opening analysis.
    #[arg(trailing_var_arg = true)]
    pub text: Vec<String>,
}

/// Execute a command against a record.
pub async fn execute_command(
    record: &mut CitizenRecord,
    advisor: &AdvisorConfig,
    command: Commands,
) -> anyhow::Result<String> {
    match command {
        Commands::Login { method } => {
            let state = record.login(method)?;
            info!(method = %method, "Signed in");
            let mut out = format!(
                "Signed in ({})",
                state.method().map_or("none", |m| m.as_str())
            );
            // Anonymous sessions carry no identity
            if let Some(profile) = record.profile()? {
                out.push_str(&format!(
                    "\nHandle: {}\nRef: {}\nName: {}",
                    profile.public_handle, profile.external_ref, profile.name
                ));
            }
            Ok(out)
        }

        Commands::Show { owner } => {
            record.set_mode(if owner {
                RedactionMode::Owner
            } else {
                RedactionMode::Public
            });
            Ok(format_view(&record.view()?))
        }

        Commands::Add(args) => {
            let mut input = IncidentInput::titled(args.title)
                .with_amount(coerce_amount(&args.amount))
                .with_description(args.description);
            if let Some(status) = args.status {
                input = input.with_status(status);
            }

            match record.add_incident(input)? {
                Some(incident) => Ok(format!(
                    "Added {} ({} pts)\n{}",
                    incident.id,
                    incident.score_impact,
                    format_report(&record.report())
                )),
                None => bail!("An incident needs a non-blank title"),
            }
        }

        Commands::Remove { id } => {
            record.set_mode(RedactionMode::Owner);
            match record.remove_incident(&id)? {
                Some(removed) => Ok(format!(
                    "Removed {}\n{}",
                    removed.id,
                    format_report(&record.report())
                )),
                None => bail!("No incident with id {}", id),
            }
        }

        Commands::Rename { name } => {
            record.set_mode(RedactionMode::Owner);
            match record.rename(&name)? {
                Some(profile) => Ok(format!("Name: {}", profile.name)),
                None => bail!("Name unchanged; blank names are ignored"),
            }
        }

        Commands::Score => Ok(format_report(&record.report())),

        Commands::Topics => Ok(format_topics()),

        Commands::Ask(args) => {
            let topic = resolve_topic(record, &args)?;
            let dialogue = AdvisoryDialogue::new(Arc::new(advisor.build_advisor()));
            dialogue.select_topic(topic);

            let text = args.text.join(" ");
            let outcome = if text.trim().is_empty() {
                dialogue.request_analysis().await
            } else {
                dialogue.send(&text).await
            };

            match outcome {
                SendOutcome::Answered(turn) | SendOutcome::Failed(turn) => Ok(turn.text),
                SendOutcome::Superseded => bail!("Topic changed before the advisor answered"),
                SendOutcome::Ignored(reason) => bail!("Nothing sent: {:?}", reason),
            }
        }
    }
}

fn resolve_topic(record: &CitizenRecord, args: &AskArgs) -> anyhow::Result<Option<Topic>> {
    if let Some(id) = args.topic {
        let challenge = topic::challenge(id).ok_or_else(|| anyhow!("No challenge {}", id))?;
        return Ok(Some(challenge.into()));
    }
    if let Some(id) = &args.incident {
        let incident = record
            .ledger()
            .get(id)
            .ok_or_else(|| anyhow!("No incident with id {}", id))?;
        return Ok(Some(Topic::profile_analysis(incident.impact_summary())));
    }
    Ok(args.context.clone().map(Topic::profile_analysis))
}

/// Render a projected record.
pub fn format_view(view: &ViewModel) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== {} [{}] ===\n",
        view.identity.display_name,
        if view.mode.is_redacted() { "PUBLIC" } else { "OWNER" }
    ));
    if let Some(external_ref) = &view.identity.external_ref {
        out.push_str(&format!("Ref: {}\n", external_ref));
    }
    out.push_str(&format_report(&view.report));
    out.push('\n');

    if view.incidents.is_empty() {
        out.push_str("No incidents declared.\n");
    }
    for incident in &view.incidents {
        out.push_str(&format!(
            "\n{} | {} | {:.2} | {}",
            incident.date.format("%Y-%m-%d"),
            incident.status,
            incident.amount,
            incident.title
        ));
        if let Some(impact) = incident.score_impact {
            out.push_str(&format!(" | {} pts", impact));
        }
        out.push_str(&format!("\n  {}", incident.description));
        if let Some(id) = &incident.delete_handle {
            out.push_str(&format!("\n  id: {}", id));
        }
        out.push('\n');
    }

    out
}

/// Render a score report.
pub fn format_report(report: &ScoreReport) -> String {
    format!(
        "Score: {}/100 ({})\nTotal debt: {:.2}\nCritical incidents: {}",
        report.score,
        report.band.as_str(),
        report.total_debt,
        report.critical_count
    )
}

fn format_topics() -> String {
    let summary = topic::catalogue_summary();
    let mut out = format!(
        "{} challenges, {} in the critical zone (ethics, legal)\n",
        summary.total, summary.critical
    );
    for (category, count) in &summary.per_category {
        out.push_str(&format!("  {}: {}\n", category.label(), count));
    }
    out.push('\n');

    for challenge in topic::catalogue() {
        out.push_str(&format!(
            "{:>2}. [{}] {}\n    {}\n",
            challenge.id,
            challenge.category.label(),
            challenge.title,
            challenge.question
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor::Provider;
    use register::{MemoryStore, RegisterConfig, RngEntropy};

    fn record() -> CitizenRecord {
        CitizenRecord::open(
            Arc::new(MemoryStore::new()),
            &RegisterConfig::default(),
            Box::new(RngEntropy::seeded(7)),
        )
        .unwrap()
    }

    fn mock_advisor() -> AdvisorConfig {
        AdvisorConfig {
            provider: Provider::Mock,
            mock_response: "Proportionality is the wrong frame.".to_string(),
            ..Default::default()
        }
    }

    async fn run(record: &mut CitizenRecord, command: Commands) -> anyhow::Result<String> {
        execute_command(record, &mock_advisor(), command).await
    }

    #[tokio::test]
    async fn test_add_then_score() {
        let mut record = record();
        run(&mut record, Commands::Login { method: AuthMethod::Anonymous })
            .await
            .unwrap();

        let out = run(
            &mut record,
            Commands::Add(AddArgs {
                title: "Rent".to_string(),
                amount: "200".to_string(),
                description: String::new(),
                status: Some(IncidentStatus::Pending),
            }),
        )
        .await
        .unwrap();
        assert!(out.contains("Score: 93/100"));

        let score = run(&mut record, Commands::Score).await.unwrap();
        assert!(score.contains("Total debt: 200.00"));
    }

    #[tokio::test]
    async fn test_login_output_per_method() {
        let mut record = record();

        let google = run(&mut record, Commands::Login { method: AuthMethod::Google })
            .await
            .unwrap();
        assert!(google.starts_with("Signed in (GOOGLE)"));
        assert!(google.contains("Handle: "));
        assert!(google.contains("Name: Google Citizen"));

        let anonymous = run(&mut record, Commands::Login { method: AuthMethod::Anonymous })
            .await
            .unwrap();
        assert_eq!(anonymous, "Signed in (ANONYMOUS)");
        assert!(record.session().is_authenticated());
        assert!(record.profile().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_title_is_an_error() {
        let mut record = record();
        let result = run(
            &mut record,
            Commands::Add(AddArgs {
                title: "  ".to_string(),
                amount: "abc".to_string(),
                description: String::new(),
                status: None,
            }),
        )
        .await;
        assert!(result.is_err());
        assert!(record.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_public_show_hides_titles() {
        let mut record = record();
        run(&mut record, Commands::Login { method: AuthMethod::Google })
            .await
            .unwrap();
        record
            .add_incident(IncidentInput::titled("Loan from Marc").with_amount(45.0))
            .unwrap();

        let public = run(&mut record, Commands::Show { owner: false }).await.unwrap();
        assert!(!public.contains("Loan from Marc"));
        assert!(!public.contains("Google Citizen"));
        assert!(public.contains("[PUBLIC]"));

        let owner = run(&mut record, Commands::Show { owner: true }).await.unwrap();
        assert!(owner.contains("Loan from Marc"));
        assert!(owner.contains("Google Citizen"));
    }

    #[tokio::test]
    async fn test_ask_about_incident() {
        let mut record = record();
        let incident = record
            .add_incident(IncidentInput::titled("Phone bill").with_amount(60.0))
            .unwrap()
            .unwrap();

        let answer = run(
            &mut record,
            Commands::Ask(AskArgs {
                topic: None,
                incident: Some(incident.id.clone()),
                context: None,
                text: vec![],
            }),
        )
        .await
        .unwrap();
        assert_eq!(answer, "Proportionality is the wrong frame.");

        let missing = run(
            &mut record,
            Commands::Ask(AskArgs {
                topic: Some(42),
                incident: None,
                context: None,
                text: vec!["hello".to_string()],
            }),
        )
        .await;
        assert!(missing.is_err());
    }

    #[test]
    fn test_topics_lists_catalogue() {
        let out = format_topics();
        assert!(out.starts_with("12 challenges, 4 in the critical zone"));
        assert!(out.contains("  Philosophy & Culture: 2\n"));
        assert!(out.contains("\n 1. [Ethics & Society] The Transparency Paradox"));
        assert!(out.contains("\n12. [Philosophy & Culture] Normativity"));
    }
}
