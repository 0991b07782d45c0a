//! gradepred CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gradepred", version, about = "GPA/CWA tracker with grade prediction")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter gradepred.toml
    Init,

    /// Record a course grade
    AddGrade {
        /// Course name
        #[arg(long)]
        course: String,

        /// Letter grade (A+ .. F)
        #[arg(long)]
        grade: String,

        /// Credit hours (1-6)
        #[arg(long)]
        credits: u32,

        /// Course code, e.g. "CS 101"
        #[arg(long)]
        code: Option<String>,

        /// Semester label, e.g. "Fall 2026"
        #[arg(long)]
        semester: Option<String>,
    },

    /// Change fields of an existing grade
    UpdateGrade {
        /// Grade id
        #[arg(long)]
        id: String,

        #[arg(long)]
        course: Option<String>,

        #[arg(long)]
        grade: Option<String>,

        #[arg(long)]
        credits: Option<u32>,

        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        semester: Option<String>,
    },

    /// Delete grades by id
    DeleteGrades {
        /// Comma-separated grade ids
        #[arg(long)]
        ids: String,
    },

    /// List recorded grades with GPA and CWA
    ListGrades,

    /// Predict the next GPA
    Predict {
        /// Current GPA (0.0-4.0)
        #[arg(long)]
        current_gpa: String,

        /// Previous GPA
        #[arg(long)]
        previous_gpa: Option<String>,

        /// Weekly study hours
        #[arg(long)]
        study_hours: Option<String>,

        /// Attendance percentage
        #[arg(long)]
        attendance: Option<String>,

        /// Course score as name:percentage:credits (repeatable)
        #[arg(long = "course")]
        courses: Vec<String>,

        /// Skip the remote predictor and use the local heuristic
        #[arg(long)]
        offline: bool,

        /// Also record the given courses as grades
        #[arg(long)]
        import_courses: bool,
    },

    /// Show prediction history
    History,

    /// Delete predictions by id
    DeletePredictions {
        /// Comma-separated prediction ids
        #[arg(long)]
        ids: String,
    },

    /// Export a prediction as JSON
    Export {
        /// Prediction id
        #[arg(long)]
        id: u64,

        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show academic statistics, trend and recommendations
    Stats,

    /// Check the remote prediction service
    Health,

    /// Show the remote service's model metrics
    Models {
        /// Ask the service to retrain first
        #[arg(long)]
        retrain: bool,
    },

    /// Pull student data and prediction history from the remote service
    Sync,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradepred=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let opts = commands::GlobalOpts {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::AddGrade {
            course,
            grade,
            credits,
            code,
            semester,
        } => commands::add_grade::execute(&opts, course, grade, credits, code, semester),
        Commands::UpdateGrade {
            id,
            course,
            grade,
            credits,
            code,
            semester,
        } => commands::update_grade::execute(
            &opts,
            commands::update_grade::GradePatch {
                id,
                course,
                grade,
                credits,
                code,
                semester,
            },
        ),
        Commands::DeleteGrades { ids } => commands::delete_grades::execute(&opts, ids),
        Commands::ListGrades => commands::list_grades::execute(&opts),
        Commands::Predict {
            current_gpa,
            previous_gpa,
            study_hours,
            attendance,
            courses,
            offline,
            import_courses,
        } => {
            commands::predict::execute(
                &opts,
                commands::predict::PredictArgs {
                    current_gpa,
                    previous_gpa,
                    study_hours,
                    attendance,
                    courses,
                    offline,
                    import_courses,
                },
            )
            .await
        }
        Commands::History => commands::history::execute(&opts),
        Commands::DeletePredictions { ids } => commands::delete_predictions::execute(&opts, ids),
        Commands::Export { id, out } => commands::export::execute(&opts, id, out),
        Commands::Stats => commands::stats::execute(&opts),
        Commands::Health => commands::health::execute(&opts).await,
        Commands::Models { retrain } => commands::models::execute(&opts, retrain).await,
        Commands::Sync => commands::sync::execute(&opts).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
