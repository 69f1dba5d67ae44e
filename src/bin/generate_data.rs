use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, seq::IndexedRandom};
use time::{OffsetDateTime, PrimitiveDateTime, macros::datetime};
use uuid::Uuid;

use salebook::transaction::WIRE_DATETIME_FORMAT;

const CITIES: [&str; 10] = [
    "Delhi",
    "Mumbai",
    "Pune",
    "Kolkata",
    "Chennai",
    "Hyderabad",
    "Bengaluru",
    "Surat",
    "Jaipur",
    "Lucknow",
];

const PRODUCTS: [&str; 10] = [
    "lantern", "basket", "soap", "kettle", "ledger", "candle", "mirror", "teapot", "blanket",
    "sandal",
];

// Sample timestamps are drawn from the three years before 2021.
const EARLIEST_TIMESTAMP: i64 = datetime!(2018-01-01 00:00:00 UTC).unix_timestamp();
const LATEST_TIMESTAMP: i64 = datetime!(2021-01-01 00:00:00 UTC).unix_timestamp();

/// Generates a CSV file of sample transactions in the import format.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// How many records to generate.
    #[arg(short, long, default_value_t = 1000)]
    records: usize,

    /// File path the CSV is written to.
    #[arg(short, long, default_value = "data/data.csv")]
    output: PathBuf,
}

fn main() {
    let args = Args::parse();
    let mut rng = rand::rng();

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).expect("Could not create the output directory");
    }

    let mut writer = csv::Writer::from_path(&args.output).expect("Could not open the output file");

    writer
        .write_record([
            "transaction_id",
            "transaction_time",
            "product_name",
            "quantity",
            "unit_price",
            "total_price",
            "delivered_to_city",
        ])
        .expect("Could not write the CSV header");

    for _ in 0..args.records {
        let quantity: i64 = rng.random_range(1..=100);
        let unit_price: f64 = rng.random_range(2.25..55.75);

        let timestamp = rng.random_range(EARLIEST_TIMESTAMP..LATEST_TIMESTAMP);
        let datetime = OffsetDateTime::from_unix_timestamp(timestamp)
            .expect("timestamp is within the representable range");
        let transaction_time = PrimitiveDateTime::new(datetime.date(), datetime.time())
            .format(WIRE_DATETIME_FORMAT)
            .expect("the wire format accepts any datetime");

        writer
            .write_record([
                Uuid::new_v4().to_string(),
                transaction_time,
                (*PRODUCTS.choose(&mut rng).unwrap()).to_owned(),
                quantity.to_string(),
                unit_price.to_string(),
                (quantity as f64 * unit_price).to_string(),
                (*CITIES.choose(&mut rng).unwrap()).to_owned(),
            ])
            .expect("Could not write a CSV record");
    }

    writer.flush().expect("Could not flush the CSV file");

    println!("CSV generated at `{}`", args.output.display());
}
