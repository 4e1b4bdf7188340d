use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal_macros::dec;
use time::{Date, Duration, OffsetDateTime};

use fleet_ledger::{
    Auto, AutoStatus, Driver, FuelType, NewMaintenanceRecord, Payment, PaymentMethod, RentType,
    Rental, RentalStatus, create_auto, create_driver, create_maintenance_record, create_payment,
    create_rental, initialize_db,
};

/// A utility for creating a test database for the REST API server of fleet_ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database with a small demo fleet for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let today = OffsetDateTime::now_utc().date();

    println!("Creating autos and drivers...");
    create_autos(today, &conn)?;
    create_drivers(&conn)?;

    println!("Creating rentals and payments...");
    create_rentals_and_payments(today, &conn)?;

    println!("Creating maintenance records...");
    create_maintenance(today, &conn)?;

    println!("Success!");

    Ok(())
}

fn create_autos(today: Date, conn: &Connection) -> Result<(), Box<dyn Error>> {
    let autos = [
        ("A-001", "Bajaj RE", "KA-01-1234", FuelType::Cng, AutoStatus::Active),
        ("A-002", "Mahindra Treo", "KA-01-5678", FuelType::Ev, AutoStatus::Active),
        ("A-003", "Piaggio Ape", "KA-01-9012", FuelType::Fuel, AutoStatus::Maintenance),
    ];

    for (auto_id, model, number, fuel_type, status) in autos {
        create_auto(
            Auto {
                auto_id: auto_id.to_owned(),
                model: model.to_owned(),
                number: number.to_owned(),
                fuel_type,
                purchase_date: today - Duration::days(730),
                status,
                image_url: None,
            },
            conn,
        )?;
    }

    Ok(())
}

fn create_drivers(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let drivers = [
        ("D-001", "Ravi Kumar", "9800000001", "DL-0001", Some("A-001")),
        ("D-002", "Asha Rao", "9800000002", "DL-0002", Some("A-002")),
    ];

    for (driver_id, name, phone, license_no, assigned_auto) in drivers {
        create_driver(
            Driver {
                driver_id: driver_id.to_owned(),
                name: name.to_owned(),
                phone: phone.to_owned(),
                license_no: license_no.to_owned(),
                address: "12 MG Road".to_owned(),
                assigned_auto: assigned_auto.map(str::to_owned),
            },
            conn,
        )?;
    }

    Ok(())
}

fn create_rentals_and_payments(today: Date, conn: &Connection) -> Result<(), Box<dyn Error>> {
    // A finished rental that was only partly paid, so it shows as overdue.
    create_rental(
        Rental {
            rental_id: "R-001".to_owned(),
            driver_id: "D-001".to_owned(),
            auto_id: "A-001".to_owned(),
            rent_type: RentType::Monthly,
            rent_amount: dec!(9000),
            start_date: today - Duration::days(120),
            end_date: Some(today - Duration::days(30)),
            status: RentalStatus::Completed,
        },
        conn,
    )?;
    create_rental(
        Rental {
            rental_id: "R-002".to_owned(),
            driver_id: "D-002".to_owned(),
            auto_id: "A-002".to_owned(),
            rent_type: RentType::Weekly,
            rent_amount: dec!(12500.50),
            start_date: today - Duration::days(60),
            end_date: None,
            status: RentalStatus::Active,
        },
        conn,
    )?;

    let payments = [
        ("P-001", "R-001", 110, dec!(3000), PaymentMethod::Cash),
        ("P-002", "R-001", 80, dec!(2500.75), PaymentMethod::Online),
        ("P-003", "R-002", 55, dec!(4200), PaymentMethod::Online),
        ("P-004", "R-002", 20, dec!(4200), PaymentMethod::Cash),
        ("P-005", "R-002", 2, dec!(1999.99), PaymentMethod::Online),
    ];

    for (payment_id, rental_id, days_ago, amount_paid, method) in payments {
        create_payment(
            Payment {
                payment_id: payment_id.to_owned(),
                rental_id: rental_id.to_owned(),
                date: today - Duration::days(days_ago),
                amount_paid,
                method,
            },
            conn,
        )?;
    }

    Ok(())
}

fn create_maintenance(today: Date, conn: &Connection) -> Result<(), Box<dyn Error>> {
    let records = [
        ("A-001", 95, "Clutch plate", dec!(1850)),
        ("A-003", 40, "Engine overhaul", dec!(7400.25)),
        ("A-002", 10, "Battery check", dec!(350)),
        ("A-003", 1, "Tyre replacement", dec!(2100)),
    ];

    for (auto_id, days_ago, description, cost) in records {
        create_maintenance_record(
            NewMaintenanceRecord {
                auto_id: auto_id.to_owned(),
                date: today - Duration::days(days_ago),
                description: description.to_owned(),
                cost,
            },
            conn,
        )?;
    }

    Ok(())
}
