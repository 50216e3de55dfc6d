//! Fetch one point's hourly history by name.
//!
//! ```sh
//! GV_USERNAME=... GV_PASSWORD=... \
//!     cargo run --example fetch_history -- "chaufferie nord" "compteur" "conso"
//! ```

use globalvisio::{GvClient, GvError, Point};

fn main() -> Result<(), GvError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "globalvisio=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let site_words = args
        .next()
        .ok_or_else(|| GvError::InvalidArg("usage: fetch_history SITE DEVICE POINT".into()))?;
    let device_words = args
        .next()
        .ok_or_else(|| GvError::InvalidArg("usage: fetch_history SITE DEVICE POINT".into()))?;
    let point_words = args
        .next()
        .ok_or_else(|| GvError::InvalidArg("usage: fetch_history SITE DEVICE POINT".into()))?;

    let username = std::env::var("GV_USERNAME")
        .map_err(|_| GvError::InvalidArg("GV_USERNAME is not set".into()))?;
    let password = std::env::var("GV_PASSWORD")
        .map_err(|_| GvError::InvalidArg("GV_PASSWORD is not set".into()))?;

    let mut builder = GvClient::builder(username, password);
    if let Ok(key) = std::env::var("GV_API_KEY") {
        builder = builder.api_key(key);
    }
    let client = builder.build()?;

    let site_id = client.find_site_id(&site_words.split_whitespace().collect::<Vec<_>>())?;
    let device_ids =
        client.find_device_ids(site_id, &device_words.split_whitespace().collect::<Vec<_>>())?;
    let point_ids =
        client.find_point_ids(device_ids[0], &point_words.split_whitespace().collect::<Vec<_>>())?;
    let Some(&point_id) = point_ids.first() else {
        return Err(GvError::not_found(format!("point matching {point_words:?}")));
    };

    let point = Point::fetch(&client, point_id)?;
    println!(
        "point {} ({})",
        point.info().id,
        point.info().display_label()
    );

    let today = chrono::Utc::now().date_naive();
    let start = today - chrono::Days::new(30);
    match point.history(&client, start, today)? {
        Some(series) => {
            for s in series.samples() {
                println!("{}\t{}", s.ts.format("%Y-%m-%d %H:%M"), s.value);
            }
            println!("{} rows", series.len());
        }
        None => println!("no data in the last 30 days"),
    }
    if let Some(remaining) = client.remaining_day_requests() {
        println!("remaining daily requests: {remaining}");
    }
    Ok(())
}
