//! `lendkeep` command-line front end.
//!
//! Opens the inventory database, runs one command through
//! `InventoryService`, and prints the outcome. Rejected commands print to
//! stderr and exit with status 1.

mod config;

use clap::Parser;
use config::{Cli, Command};
use lendkeep_core::db::open_db;
use lendkeep_core::transfer::EXPORT_ARCHIVE_FILE_NAME;
use lendkeep_core::{
    default_log_level, init_logging, CheckoutOutcome, InventoryService, Item, SqliteBlobRepository,
    Student, StudentEdit,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut conn = open_db(&cli.db)?;
    let mut service = InventoryService::open(SqliteBlobRepository::new(&mut conn));

    match cli.command {
        Command::Students { filter } => {
            for student in service.list_students(filter.as_deref().unwrap_or_default()) {
                print_student(student, service.items_held_by(&student.net_id).len());
            }
        }
        Command::Items { filter, available } => {
            let filter = filter.as_deref().unwrap_or_default();
            let items = if available {
                service.available_items(filter)
            } else {
                service.list_items(filter)
            };
            for item in items {
                print_item(item);
            }
        }
        Command::ShowStudent { net_id } => {
            let student = service
                .find_student(&net_id)
                .ok_or_else(|| format!("student `{net_id}` not found"))?;
            let held = service.items_held_by(&net_id);
            print_student(student, held.len());
            if held.is_empty() {
                println!("  no items checked out");
            }
            for item in held {
                println!("  {} (#{})", item.name, item.number);
            }
        }
        Command::ShowItem { number } => {
            let item = service
                .find_item(&number)
                .ok_or_else(|| format!("item `{number}` not found"))?;
            print_item(item);
            match (service.holder_of(&number), item.checked_out_to.as_deref()) {
                (Some(holder), _) => println!("  held by {} ({})", holder.name, holder.net_id),
                (None, Some(net_id)) => println!("  held by unknown NetID {net_id}"),
                (None, None) => println!("  available"),
            }
        }
        Command::AddStudent {
            name,
            net_id,
            phone,
        } => {
            let student = service.add_student(name, net_id, phone)?;
            println!("added student {}", student.net_id);
        }
        Command::AddItem {
            name,
            number,
            net_id,
        } => {
            let item = match net_id {
                Some(net_id) => service.quick_add_item(name, number, &net_id)?,
                None => service.add_item(name, number)?,
            };
            println!("added item {}", item.number);
        }
        Command::EditStudent {
            net_id,
            name,
            phone,
        } => {
            service.edit_student(&net_id, StudentEdit { name, phone })?;
            println!("updated student {net_id}");
        }
        Command::EditItem { number, name } => {
            service.edit_item(&number, name)?;
            println!("updated item {number}");
        }
        Command::DeleteStudent { net_id } => {
            let returned = service.items_held_by(&net_id).len();
            service.delete_student(&net_id)?;
            println!("deleted student {net_id}; returned {returned} item(s)");
        }
        Command::DeleteItem { number } => {
            service.delete_item(&number)?;
            println!("deleted item {number}");
        }
        Command::Checkout { number, net_id } => match service.checkout(&number, &net_id)? {
            CheckoutOutcome::Linked => println!("{number} checked out to {net_id}"),
            CheckoutOutcome::Reassigned { previous } => {
                println!("{number} checked out to {net_id} (was held by {previous})")
            }
        },
        Command::Return { number } => match service.return_item(&number)? {
            Some(previous) => println!("{number} returned by {previous}"),
            None => println!("{number} was not checked out"),
        },
        Command::ImportStudents { file } => {
            let report = service.import_students(&std::fs::read_to_string(file)?)?;
            println!(
                "added {} new students ({} duplicates, {} malformed rows skipped)",
                report.added, report.duplicates, report.malformed
            );
        }
        Command::ImportItems { file } => {
            let report = service.import_items(&std::fs::read_to_string(file)?)?;
            println!(
                "added {} new items ({} duplicates, {} malformed rows skipped)",
                report.added, report.duplicates, report.malformed
            );
        }
        Command::Export { out } => {
            let path = out.unwrap_or_else(|| EXPORT_ARCHIVE_FILE_NAME.into());
            std::fs::write(&path, service.export_archive()?)?;
            println!("wrote {}", path.display());
        }
        Command::Orphans => {
            for item in service.orphaned_items() {
                print_item(item);
            }
        }
    }

    Ok(())
}

fn print_student(student: &Student, held: usize) {
    println!(
        "{} | {} | {} | {held} item(s)",
        student.name, student.net_id, student.phone
    );
}

fn print_item(item: &Item) {
    let status = match item.checked_out_to.as_deref() {
        Some(net_id) => format!("checked out to {net_id}"),
        None => "available".to_string(),
    };
    println!("{} (#{}) {status}", item.name, item.number);
}
