use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use exam_registry::{
    ExamKind, ExamList, Outcome, Penalty, Registration, StudentId, config::EnvVars, report,
    store,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Driving-school exam registry
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Exam file (default: EXAMS_FILE, or exams.json)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty exam file, replacing any existing one
    Init,
    /// Add an exam record for a newly enrolled student
    Add { student_id: StudentId },
    /// Put a student's record back to zero attempts
    Reset { student_id: StudentId },
    /// Register a theory exam attempt
    Theory {
        student_id: StudentId,
        /// The attempt was passed (default: failed)
        #[arg(long)]
        passed: bool,
        /// Date of the attempt, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Register a practical exam attempt
    Practical {
        student_id: StudentId,
        #[arg(long)]
        passed: bool,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Driving hours the student has completed
        #[arg(long)]
        hours: u32,
    },
    /// Show one student's exams
    Show { student_id: StudentId },
    /// Show every exam
    List,
    /// Number of exam records
    Count,
    /// Check every record for inconsistencies
    Audit,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
        .with(sentry::integrations::tracing::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exam_registry=info,exam_utils=info".into()),
        )
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let env_vars = match EnvVars::new() {
        Ok(env_vars) => env_vars,
        Err(e) => {
            tracing::error!("invalid configuration: {e:?}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = if let Some(sentry_dsn) = env_vars.sentry_dsn.clone() {
        tracing::info!("initializing Sentry");
        // NOTE: Events are only emitted, once the guard goes out of scope.
        Some(sentry::init((
            sentry_dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(env_vars.environment.to_string().into()),
                ..Default::default()
            },
        )))
    } else {
        None
    };

    match run(cli, &env_vars).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one command. `Ok(false)` means the request was rejected without an error.
async fn run(cli: Cli, env_vars: &EnvVars) -> anyhow::Result<bool> {
    let path = cli.file.unwrap_or_else(|| env_vars.exams_file.clone());
    let mut list = ExamList::new(env_vars.rules());

    if !matches!(cli.command, Commands::Init) {
        store::load_or_empty(&mut list, &path)
            .await
            .context("unable to load exams")?;
    }

    let today = || Local::now().date_naive();

    let accepted = match cli.command {
        Commands::Init => {
            println!("Creating empty exam file {}", path.display());
            true
        }
        Commands::Add { student_id } => {
            list.initialize_exam(student_id)?;
            println!("Exam record created for student {student_id}");
            true
        }
        Commands::Reset { student_id } => {
            list.reset_exam(student_id)?;
            println!("Exam record reset for student {student_id}");
            true
        }
        Commands::Theory {
            student_id,
            passed,
            date,
        } => {
            let registration = list.register_theory_attempt(
                student_id,
                Outcome::from(passed),
                date.unwrap_or_else(today),
            );
            print_registration(ExamKind::Theory, registration)
        }
        Commands::Practical {
            student_id,
            passed,
            date,
            hours,
        } => {
            let driving_log = move |_: StudentId| Some(hours);
            let registration = list.register_practical_attempt(
                student_id,
                Outcome::from(passed),
                date.unwrap_or_else(today),
                &driving_log,
            );
            print_registration(ExamKind::Practical, registration)
        }
        Commands::Show { student_id } => {
            let exam = list
                .find(student_id)
                .with_context(|| format!("no exam for student {student_id}"))?;
            report::print_exam_details(exam)?;
            return Ok(true);
        }
        Commands::List => {
            report::print_all_exams(&list)?;
            return Ok(true);
        }
        Commands::Count => {
            report::write_summary(&mut std::io::stdout().lock(), &list)?;
            return Ok(true);
        }
        Commands::Audit => {
            let issues = list.audit();
            for issue in &issues {
                println!(
                    "Exam #{} (student {}): {}",
                    issue.index, issue.student_id, issue.reason
                );
            }
            if issues.is_empty() {
                println!("Validation complete: no errors");
            } else {
                println!("Validation complete: {} error(s) found", issues.len());
            }
            return Ok(issues.is_empty());
        }
    };

    if accepted {
        store::save(&list, &path)
            .await
            .context("unable to save exams")?;
    }
    Ok(accepted)
}

fn print_registration(kind: ExamKind, registration: Registration) -> bool {
    let Registration { code, penalty } = registration;
    if !code.is_ok() {
        println!("{kind} attempt rejected: {code}");
        return false;
    }
    println!("{kind} attempt registered");
    if let Some(penalty) = penalty {
        match penalty {
            Penalty::SuspendAndRepayFirstInstalment => {
                println!("No attempts left: student suspended, first instalment due again")
            }
            Penalty::RepayAllInstalments => {
                println!("No attempts left: all instalments due again")
            }
        }
    }
    true
}
