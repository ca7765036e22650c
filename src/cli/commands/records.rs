//! Record command handlers
//!
//! Every handler loads the configured snapshot; mutating handlers write it
//! back only when the operation succeeds.

use crate::args::{PrereqSubcommand, RecordCommand};
use std::path::Path;
use uni_records::config::Config;
use uni_records::core::catalog::Catalog;
use uni_records::core::errors::RecordError;
use uni_records::core::store::{RecordStore, StoreError, TomlRecordStore};
use uni_records::{error, verbose};

/// Failure of a record command, printed by [`run`]
#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("no snapshot configured; set one with `unirecords config set snapshot <PATH>` or --snapshot")]
    NoSnapshot,
    #[error("unknown offering {0}")]
    UnknownOffering(u32),
}

/// Run a record command, returning the process exit code
pub fn run(command: RecordCommand, config: &Config) -> i32 {
    match dispatch(command, config) {
        Ok(()) => 0,
        Err(e) => {
            error!("{e}");
            eprintln!("✗ {e}");
            1
        }
    }
}

fn dispatch(command: RecordCommand, config: &Config) -> Result<(), CommandError> {
    if config.records.snapshot.is_empty() {
        return Err(CommandError::NoSnapshot);
    }
    let store = TomlRecordStore::new(&config.records.snapshot);
    let mut catalog = store.load()?;
    verbose!("Loaded {} from {}", catalog.name, store.path().display());

    match command {
        RecordCommand::Check => {
            check(&catalog, store.path());
            Ok(())
        }
        RecordCommand::Register { student, offering } => {
            let enrollment = catalog
                .registration()
                .register(&student, offering)
                .map_err(RecordError::from)?;
            store.save(&catalog)?;
            println!(
                "✓ {student} enrolled in offering {offering} (enrollment {})",
                enrollment.id()
            );
            Ok(())
        }
        RecordCommand::Drop {
            student,
            enrollment,
        } => {
            catalog
                .registration()
                .drop(&student, enrollment)
                .map_err(RecordError::from)?;
            store.save(&catalog)?;
            println!("✓ {student} withdrew from enrollment {enrollment}");
            Ok(())
        }
        RecordCommand::Grade {
            faculty,
            enrollment,
            grade,
        } => {
            catalog
                .registration()
                .assign_grade(&faculty, enrollment, &grade)
                .map_err(RecordError::from)?;
            store.save(&catalog)?;
            println!("✓ Enrollment {enrollment} graded {}", grade.trim());
            Ok(())
        }
        RecordCommand::Gpa { student } => {
            let gpa = if config.grading.strict {
                catalog.gpa().strict_gpa(&student).map_err(RecordError::from)?
            } else {
                catalog.gpa().gpa(&student)
            };
            println!("{student}: {gpa:.2}");
            Ok(())
        }
        RecordCommand::Prereq { subcommand } => prereq(subcommand, &mut catalog, &store),
        RecordCommand::Seats { offering } => {
            let seats = catalog
                .capacity(offering)
                .ok_or(CommandError::UnknownOffering(offering))?;
            println!("Offering {offering}: {seats}");
            Ok(())
        }
    }
}

fn prereq(
    subcommand: PrereqSubcommand,
    catalog: &mut Catalog,
    store: &TomlRecordStore,
) -> Result<(), CommandError> {
    match subcommand {
        PrereqSubcommand::Add {
            course,
            prerequisite,
        } => {
            let added = catalog
                .add_prerequisite(&course, &prerequisite)
                .map_err(RecordError::from)?;
            if added {
                store.save(catalog)?;
                println!("✓ {prerequisite} is now a prerequisite of {course}");
            } else {
                println!("{prerequisite} is already a prerequisite of {course}");
            }
        }
        PrereqSubcommand::Remove {
            course,
            prerequisite,
        } => {
            if catalog.remove_prerequisite(&course, &prerequisite) {
                store.save(catalog)?;
                println!("✓ Removed {prerequisite} from {course}");
            } else {
                println!("{prerequisite} was not a direct prerequisite of {course}");
            }
        }
        PrereqSubcommand::Check {
            course,
            prerequisite,
        } => {
            let required = catalog.is_prerequisite_of(&prerequisite, &course);
            println!(
                "{prerequisite} {} a prerequisite of {course}",
                if required { "is" } else { "is not" }
            );
        }
    }
    Ok(())
}

fn check(catalog: &Catalog, path: &Path) {
    println!("✓ {} is consistent", path.display());
    println!("  institution: {}", catalog.name);
    println!("  departments: {}", catalog.departments().len());
    println!("  courses:     {}", catalog.courses().len());
    println!("  users:       {}", catalog.users().len());
    println!("  offerings:   {}", catalog.offerings().len());
    println!("  enrollments: {}", catalog.enrollments().len());
    verbose!("{}", catalog.graph());
    for offering in catalog.offerings() {
        if let Some(seats) = catalog.capacity(offering.id()) {
            verbose!("  {offering}: {seats}");
        }
    }
}
