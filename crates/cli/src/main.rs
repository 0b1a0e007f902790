use api_shared::CategoryReq;
use clap::{Parser, Subcommand};
use lab_core::{
    CatalogueService, CoreConfig, DashboardService, Database, PatientService, ReportService,
};
use lab_ids::{IdKind, LabId};

#[derive(Parser)]
#[command(name = "lab")]
#[command(about = "Pathology lab records CLI")]
struct Cli {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Generate an identifier without touching the database
    NewId {
        /// patient, doctor or report (or PAT, DOC, REP)
        kind: IdKind,
    },
    /// List all patients
    ListPatients,
    /// List report summaries
    ListReports {
        /// Only reports dated today
        #[arg(long)]
        today: bool,
    },
    /// Print dashboard counts
    Summary,
    /// Add a test category
    AddCategory {
        /// Category name
        name: String,
    },
}

async fn open(database_url: Option<String>) -> anyhow::Result<Database> {
    let cfg = CoreConfig::from_env_values(
        database_url,
        std::env::var("LAB_DB_MAX_CONNECTIONS").ok(),
        std::env::var("LAB_DB_ACQUIRE_TIMEOUT_SECS").ok(),
    )?;
    let db = Database::connect(&cfg).await?;
    db.migrate().await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Migrate) => {
            open(cli.database_url).await?;
            println!("Migrations applied");
        }
        Some(Commands::NewId { kind }) => {
            println!("{}", LabId::new(kind));
        }
        Some(Commands::ListPatients) => {
            let patients = PatientService::new(open(cli.database_url).await?)
                .list()
                .await?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    println!(
                        "ID: {}, Name: {}, Gender: {}, Phone: {}",
                        patient.patient_id,
                        patient.patients_name,
                        patient.gender,
                        patient.phone_number.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        Some(Commands::ListReports { today }) => {
            let service = ReportService::new(open(cli.database_url).await?);
            let reports = if today {
                service.list_today().await?
            } else {
                service.list().await?
            };
            if reports.is_empty() {
                println!("No reports found.");
            }
            for report in reports {
                println!(
                    "{} | {} | {} | {} | {}",
                    report.report_id,
                    report.test_date,
                    report.patients_name,
                    report.status.as_deref().unwrap_or("-"),
                    report.tests
                );
            }
        }
        Some(Commands::Summary) => {
            let summary = DashboardService::new(open(cli.database_url).await?)
                .summary()
                .await?;
            println!("Reports:  {}", summary.total_reports);
            println!("Today:    {}", summary.recent_reports);
            println!("Patients: {}", summary.total_patients);
            println!("Doctors:  {}", summary.total_doctors);
            println!("Tests:    {}", summary.total_tests);
            for entry in summary.reports_by_status {
                println!(
                    "  {}: {}",
                    entry.status.as_deref().unwrap_or("(none)"),
                    entry.count
                );
            }
        }
        Some(Commands::AddCategory { name }) => {
            let category_id = CatalogueService::new(open(cli.database_url).await?)
                .create_category(CategoryReq {
                    category_name: Some(name),
                })
                .await?;
            println!("Added category with ID: {}", category_id);
        }
        None => {
            println!("Use 'lab --help' for commands");
        }
    }

    Ok(())
}
