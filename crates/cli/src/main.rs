use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use nhl_core::{random, vitals, CoreConfig, PatientService, ReferenceData};

#[derive(Parser)]
#[command(name = "nhl")]
#[command(about = "Neural Health Link patient dashboard CLI")]
struct Cli {
    /// Directory holding the JSON data files
    #[arg(long, env = "NHL_DATA_DIR", default_value = nhl_core::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Print the full causal-context report for a patient as JSON
    Report {
        /// Patient id
        patient_id: String,
    },
    /// Look up the catalog relation between two diseases
    Relation {
        /// Present disease
        present: String,
        /// Previous disease
        previous: String,
    },
    /// Print mock vitals and their risk scores for a patient id
    Vitals {
        /// Patient id (does not need to exist)
        patient_id: String,
    },
    /// Print the deterministic random value for a key
    Derive {
        /// Any string key
        key: String,
    },
}

fn service(data_dir: PathBuf) -> anyhow::Result<PatientService> {
    if !data_dir.exists() {
        anyhow::bail!("Data directory does not exist: {}", data_dir.display());
    }
    let cfg = Arc::new(CoreConfig::new(data_dir)?);
    let reference = Arc::new(ReferenceData::load(&cfg));
    Ok(PatientService::new(cfg, reference))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => {
            let patients = service(cli.data_dir)?.list_patients()?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    println!(
                        "ID: {}, Name: {}, State: {}, Present: {}",
                        patient.patient_id, patient.name, patient.state, patient.present_disease
                    );
                }
            }
        }
        Some(Commands::Report { patient_id }) => {
            let report = service(cli.data_dir)?.patient_report(&patient_id)?;
            let res = api_shared::PatientReportRes::from(report);
            println!("{}", serde_json::to_string_pretty(&res)?);
        }
        Some(Commands::Relation { present, previous }) => {
            let summary = service(cli.data_dir)?.relation(&present, &previous);
            match summary.probability {
                Some(p) => println!(
                    "{} <- {}: {:.3}\n{}",
                    summary.present_disease, summary.previous_disease, p, summary.report
                ),
                None => println!("{}", summary.report),
            }
        }
        Some(Commands::Vitals { patient_id }) => {
            let snapshot = vitals::generate_mock_vitals(&patient_id);
            let scores = vitals::map_to_scores(&snapshot);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            println!("Scores: {:?}", scores);
        }
        Some(Commands::Derive { key }) => {
            println!(
                "{:#08x} -> {:.6}",
                random::digest_prefix(&key),
                random::derive(&key)
            );
        }
        None => {
            println!("Use 'nhl --help' for commands");
        }
    }

    Ok(())
}
