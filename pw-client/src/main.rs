//! PredictWell client (pw-client) - Main entry point
//!
//! Drives the prediction, report, history and contact workflows against a
//! remote PredictWell service from the command line. Results go to stdout,
//! logs to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pw_client::contact::{ContactField, SUCCESS_MESSAGE};
use pw_client::form::{Field, PredictionForm};
use pw_client::history::HistoryRow;
use pw_client::predict::{PredictView, SubmitOutcome};
use pw_client::Workflows;
use pw_common::config::ClientConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for pw-client
#[derive(Parser, Debug)]
#[command(name = "pw-client")]
#[command(about = "Command-line client for the PredictWell diabetes risk service")]
#[command(version)]
struct Args {
    /// Base URL of the PredictWell service (overrides PREDICTWELL_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit health metrics and print the risk classification
    Predict(PredictArgs),

    /// Inspect or prune stored predictions
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Send a message to the PredictWell team
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },

    /// Download the report of a stored prediction
    Report {
        id: String,
        /// Directory to write the report into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List stored predictions in store order
    List,
    /// Delete one stored prediction
    Delete { id: String },
}

/// Raw form values; validation happens in the client library
#[derive(clap::Args, Debug)]
struct PredictArgs {
    #[arg(long, allow_hyphen_values = true)]
    pregnancies: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    glucose: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    blood_pressure: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    skin_thickness: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    insulin: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    bmi: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    diabetes_pedigree: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    age: Option<String>,

    /// Also download the report into this directory on success
    #[arg(long)]
    download: Option<PathBuf>,
}

impl PredictArgs {
    fn to_form(&self) -> PredictionForm {
        let mut form = PredictionForm::new();
        for field in Field::ALL {
            let value = match field {
                Field::Pregnancies => &self.pregnancies,
                Field::Glucose => &self.glucose,
                Field::BloodPressure => &self.blood_pressure,
                Field::SkinThickness => &self.skin_thickness,
                Field::Insulin => &self.insulin,
                Field::Bmi => &self.bmi,
                Field::DiabetesPedigree => &self.diabetes_pedigree,
                Field::Age => &self.age,
            };
            form.set(field, value.clone().unwrap_or_default());
        }
        form
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging starts before config resolution so config file warnings are visible.
    // RUST_LOG wins over the config file level.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let level_from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::resolve(args.api_url.as_deref(), args.config.as_deref())
        .context("Failed to resolve configuration")?;

    if !level_from_env {
        filter_handle
            .reload(EnvFilter::new(&config.log_level))
            .context("Failed to apply configured log level")?;
    }

    info!(
        "Starting PredictWell client (pw-client) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Service: {}", config.api_url);

    let mut workflows =
        Workflows::from_config(&config).context("Failed to initialize HTTP client")?;

    match args.command {
        Command::Predict(predict) => run_predict(&mut workflows, &predict).await,
        Command::History { action } => run_history(&mut workflows, action).await,
        Command::Contact {
            name,
            email,
            message,
        } => {
            let contact = &mut workflows.contact;
            contact.set(ContactField::Name, name);
            contact.set(ContactField::Email, email);
            contact.set(ContactField::Message, message);
            contact.submit().await?;
            println!("{}", SUCCESS_MESSAGE);
            Ok(())
        }
        Command::Report { id, output } => {
            let path = workflows.report.download(&id, &output).await?;
            println!("Report saved to {}", path.display());
            Ok(())
        }
    }
}

async fn run_predict(workflows: &mut Workflows, args: &PredictArgs) -> Result<()> {
    let form = args.to_form();

    match workflows.predict.submit(&form).await {
        SubmitOutcome::Succeeded(_) => {}
        SubmitOutcome::Failed(err) => return Err(err.into()),
        SubmitOutcome::Superseded => anyhow::bail!("Prediction was superseded"),
    }

    let view = workflows.predict.view().await;
    let target = workflows.report.target_for(&view);
    print!("{}", render_prediction(&view, target.as_deref()));

    if let (Some(dir), Some(id)) = (&args.download, view.prediction_id.as_deref()) {
        let path = workflows.report.download(id, dir).await?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

async fn run_history(workflows: &mut Workflows, action: HistoryAction) -> Result<()> {
    let history = &mut workflows.history;

    match action {
        HistoryAction::List => {
            history.load().await?;
            print!("{}", render_history(&history.rows()));
        }
        HistoryAction::Delete { id } => {
            history.delete(&id).await?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

/// Output of a finished prediction: result line plus report link
fn render_prediction(view: &PredictView, report_target: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(line) = view.result_line() {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&format!(
        "Download Report: {}\n",
        report_target.unwrap_or("unavailable")
    ));
    out
}

fn render_history(rows: &[HistoryRow]) -> String {
    if rows.is_empty() {
        return "No predictions stored.\n".to_string();
    }
    rows.iter()
        .map(|row| format!("{}  {:<10}  {}  {}\n", row.date, row.result, row.id, row.inputs))
        .collect()
}
