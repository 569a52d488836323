//! Initial dataset for the game database.
//!
//! Seeding is a sequence of explicit steps, each returning the name -> id
//! map the next step needs: artists first, then albums (which reference
//! artist ids), then songs, venues, concerts and sales. The steps are not
//! wrapped in a transaction; the caller guards re-seeding by checking
//! whether the Artists table is empty.

use anyhow::{Context, Result};
use rand::Rng;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use tracing::info;

const ARTISTS: &[(&str, &str, i64, &str)] = &[
    (
        "DJ Query",
        "Electronic",
        2010,
        "Known for blending SQL commands with electronic beats.",
    ),
    (
        "The Aggregators",
        "Rock",
        2005,
        "A band famous for bringing together different musical elements.",
    ),
    (
        "Selectors",
        "Pop",
        2015,
        "Rising stars known for their ability to pick the perfect hooks.",
    ),
    (
        "Join Junction",
        "Hip Hop",
        2008,
        "Masters of combining different musical traditions.",
    ),
    (
        "Order Ascending",
        "Jazz",
        2000,
        "Arranging notes in a precise order for maximum impact.",
    ),
];

// (title, artist name, release year, label)
const ALBUMS: &[(&str, &str, i64, &str)] = &[
    ("Beats & Bytes", "DJ Query", 2020, "Database Records"),
    (
        "Group By Elements",
        "The Aggregators",
        2018,
        "Rock Solid Productions",
    ),
    ("All Star Selection", "Selectors", 2022, "Pop Data"),
    ("Connected Vibes", "Join Junction", 2019, "Hip Hop Data"),
    ("Sorted Soul", "Order Ascending", 2021, "Jazz Schema"),
    ("Query Returns", "DJ Query", 2023, "Database Records"),
];

// (title, album title, track number, duration in seconds)
const SONGS: &[(&str, &str, i64, i64)] = &[
    ("SELECT Your Heart", "Beats & Bytes", 1, 210),
    ("DROP the Beat", "Beats & Bytes", 2, 195),
    ("JOIN With Me", "Connected Vibes", 1, 240),
    ("GROUP BY Love", "Group By Elements", 1, 180),
    ("ORDER BY Emotion", "Sorted Soul", 1, 300),
    ("WHERE You Are", "All Star Selection", 1, 220),
];

// (name, city, country, capacity)
const VENUES: &[(&str, &str, &str, i64)] = &[
    ("Database Arena", "New York", "USA", 20000),
    ("Query Stadium", "Los Angeles", "USA", 25000),
    ("Schema Theater", "London", "UK", 15000),
    ("Index Hall", "Tokyo", "Japan", 18000),
    ("Table Club", "Berlin", "Germany", 5000),
];

// (artist name, venue name, date, ticket price, tickets sold)
const CONCERTS: &[(&str, &str, &str, f64, i64)] = &[
    ("DJ Query", "Database Arena", "2023-05-15", 75.99, 18500),
    ("The Aggregators", "Query Stadium", "2023-06-20", 65.50, 22000),
    ("Selectors", "Schema Theater", "2023-07-10", 55.00, 14000),
    ("Join Junction", "Index Hall", "2023-08-05", 70.00, 17500),
    ("Order Ascending", "Table Club", "2023-09-15", 45.00, 4800),
];

const SALES_COUNTRIES: &[&str] = &["USA", "UK", "Japan", "Germany", "Canada", "Australia"];
const SALES_WEEKS: u32 = 4;

/// Insert the full seed dataset. The caller has already verified that the
/// Artists table is empty.
pub(super) fn seed_database(conn: &Connection) -> Result<()> {
    info!("Seeding database with initial data...");

    let artist_ids = insert_artists(conn)?;
    let album_ids = insert_albums(conn, &artist_ids)?;
    insert_songs(conn, &album_ids)?;
    let venue_ids = insert_venues(conn)?;
    insert_concerts(conn, &artist_ids, &venue_ids)?;
    insert_sales(conn, &album_ids)?;

    Ok(())
}

fn insert_artists(conn: &Connection) -> Result<HashMap<&'static str, i64>> {
    let mut ids = HashMap::new();
    for (name, genre, formed_year, bio) in ARTISTS {
        conn.execute(
            "INSERT INTO Artists (name, genre, formed_year, bio) VALUES (?, ?, ?, ?)",
            params![name, genre, formed_year, bio],
        )
        .with_context(|| format!("Failed to insert artist {}", name))?;
        ids.insert(*name, conn.last_insert_rowid());
    }
    Ok(ids)
}

fn insert_albums(
    conn: &Connection,
    artist_ids: &HashMap<&'static str, i64>,
) -> Result<HashMap<&'static str, i64>> {
    let mut ids = HashMap::new();
    for (title, artist_name, release_year, label) in ALBUMS {
        let artist_id = artist_ids
            .get(artist_name)
            .with_context(|| format!("Album {} references unknown artist {}", title, artist_name))?;
        conn.execute(
            "INSERT INTO Albums (title, artist_id, release_year, label) VALUES (?, ?, ?, ?)",
            params![title, artist_id, release_year, label],
        )
        .with_context(|| format!("Failed to insert album {}", title))?;
        ids.insert(*title, conn.last_insert_rowid());
    }
    Ok(ids)
}

fn insert_songs(conn: &Connection, album_ids: &HashMap<&'static str, i64>) -> Result<()> {
    for (title, album_title, track_number, duration) in SONGS {
        let album_id = album_ids
            .get(album_title)
            .with_context(|| format!("Song {} references unknown album {}", title, album_title))?;
        conn.execute(
            "INSERT INTO Songs (title, album_id, track_number, duration) VALUES (?, ?, ?, ?)",
            params![title, album_id, track_number, duration],
        )
        .with_context(|| format!("Failed to insert song {}", title))?;
    }
    Ok(())
}

fn insert_venues(conn: &Connection) -> Result<HashMap<&'static str, i64>> {
    let mut ids = HashMap::new();
    for (name, city, country, capacity) in VENUES {
        conn.execute(
            "INSERT INTO Venues (name, city, country, capacity) VALUES (?, ?, ?, ?)",
            params![name, city, country, capacity],
        )
        .with_context(|| format!("Failed to insert venue {}", name))?;
        ids.insert(*name, conn.last_insert_rowid());
    }
    Ok(ids)
}

fn insert_concerts(
    conn: &Connection,
    artist_ids: &HashMap<&'static str, i64>,
    venue_ids: &HashMap<&'static str, i64>,
) -> Result<()> {
    for (artist_name, venue_name, concert_date, ticket_price, tickets_sold) in CONCERTS {
        let artist_id = artist_ids
            .get(artist_name)
            .with_context(|| format!("Concert references unknown artist {}", artist_name))?;
        let venue_id = venue_ids
            .get(venue_name)
            .with_context(|| format!("Concert references unknown venue {}", venue_name))?;
        conn.execute(
            "INSERT INTO Concerts (artist_id, venue_id, concert_date, ticket_price, tickets_sold) \
             VALUES (?, ?, ?, ?, ?)",
            params![artist_id, venue_id, concert_date, ticket_price, tickets_sold],
        )
        .with_context(|| format!("Failed to insert concert for {}", artist_name))?;
    }
    Ok(())
}

/// Sales figures are procedural: 4 weeks x 6 countries per album, with
/// randomized unit counts in [1000, 16000) and per-unit revenue in
/// [$5, $15), rounded to cents.
fn insert_sales(conn: &Connection, album_ids: &HashMap<&'static str, i64>) -> Result<()> {
    let mut rng = rand::rng();
    for album_id in album_ids.values() {
        for week in 1..=SALES_WEEKS {
            let week_starting = format!("2023-0{}-01", week);
            for country in SALES_COUNTRIES {
                let units_sold: i64 = rng.random_range(1000..16000);
                let revenue = units_sold as f64 * rng.random_range(5.0..15.0);
                let revenue = (revenue * 100.0).round() / 100.0;
                conn.execute(
                    "INSERT INTO Sales (album_id, week_starting, units_sold, revenue, country) \
                     VALUES (?, ?, ?, ?, ?)",
                    params![album_id, week_starting, units_sold, revenue, country],
                )
                .with_context(|| {
                    format!("Failed to insert sales for album {} in {}", album_id, country)
                })?;
            }
        }
    }
    Ok(())
}
