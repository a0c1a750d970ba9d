//! Create a sample SQLite movie database with demo data

use rusqlite::{Connection, Result};

const FIRST_YEAR: i64 = 2000;
const LAST_YEAR: i64 = 2021;
const TITLES_PER_YEAR: i64 = 30;

/// Create and populate the sample database, replacing existing tables.
pub fn create_sample_database(path: &str) -> Result<()> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        DROP TABLE IF EXISTS top_movies;
        DROP TABLE IF EXISTS top_tvshows;
        DROP TABLE IF EXISTS top_budgets;
        DROP TABLE IF EXISTS top_revenues;
        DROP TABLE IF EXISTS titles_count;

        -- Ranked titles with rating aggregates
        CREATE TABLE top_movies (
            primaryTitle TEXT NOT NULL,
            averageRating REAL,
            numVotes INTEGER,
            totalRatings INTEGER,
            startYear INTEGER
        );
        CREATE TABLE top_tvshows (
            primaryTitle TEXT NOT NULL,
            averageRating REAL,
            numVotes INTEGER,
            totalRatings INTEGER,
            startYear INTEGER
        );

        -- Ranked titles with financials
        CREATE TABLE top_budgets (
            primaryTitle TEXT NOT NULL,
            averageRating REAL,
            numVotes INTEGER,
            budget REAL,
            revenue REAL,
            startYear INTEGER
        );
        CREATE TABLE top_revenues (
            primaryTitle TEXT NOT NULL,
            averageRating REAL,
            numVotes INTEGER,
            budget REAL,
            revenue REAL,
            startYear INTEGER
        );

        -- Pre-counted titles per year and type
        CREATE TABLE titles_count (
            titleType TEXT NOT NULL,
            startYear INTEGER,
            count INTEGER
        );
        ",
    )?;

    generate_rating_titles(&conn, "top_movies", 42)?;
    generate_rating_titles(&conn, "top_tvshows", 1337)?;
    generate_financial_titles(&conn, "top_budgets", 2718)?;
    generate_financial_titles(&conn, "top_revenues", 31337)?;
    generate_title_counts(&conn)?;

    conn.execute_batch(
        "
        CREATE INDEX idx_movies_year ON top_movies(startYear);
        CREATE INDEX idx_tvshows_year ON top_tvshows(startYear);
        CREATE INDEX idx_budgets_year ON top_budgets(startYear);
        CREATE INDEX idx_revenues_year ON top_revenues(startYear);
        CREATE INDEX idx_counts_type ON titles_count(titleType);
        ",
    )?;

    Ok(())
}

fn generate_rating_titles(conn: &Connection, table: &str, seed: u32) -> Result<()> {
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} (primaryTitle, averageRating, numVotes, totalRatings, startYear)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        table
    ))?;

    let mut rng = seed;
    for year in FIRST_YEAR..=LAST_YEAR {
        for idx in 0..TITLES_PER_YEAR {
            let rating = 4.0 + random_float(&mut rng) * 5.5;
            let votes = 500 + (random_int(&mut rng) % 900_000) as i64;
            let total_ratings = votes + (random_int(&mut rng) % 50_000) as i64;
            stmt.execute((
                title_name(&mut rng, year, idx),
                (rating * 10.0).round() / 10.0,
                votes,
                total_ratings,
                year,
            ))?;
        }
    }
    Ok(())
}

fn generate_financial_titles(conn: &Connection, table: &str, seed: u32) -> Result<()> {
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} (primaryTitle, averageRating, numVotes, budget, revenue, startYear)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        table
    ))?;

    let mut rng = seed;
    for year in FIRST_YEAR..=LAST_YEAR {
        for idx in 0..TITLES_PER_YEAR {
            let rating = 4.0 + random_float(&mut rng) * 5.5;
            let votes = 500 + (random_int(&mut rng) % 900_000) as i64;
            let budget = 1_000_000.0 + random_float(&mut rng) * 250_000_000.0;
            // blockbusters gross up to ~3x budget, flops far less
            let revenue = budget * (0.2 + random_float(&mut rng) * 2.8);
            stmt.execute((
                title_name(&mut rng, year, idx),
                (rating * 10.0).round() / 10.0,
                votes,
                budget.round(),
                revenue.round(),
                year,
            ))?;
        }
    }
    Ok(())
}

fn generate_title_counts(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO titles_count (titleType, startYear, count) VALUES (?1, ?2, ?3)",
    )?;

    let mut rng = 7u32;
    for year in FIRST_YEAR..=LAST_YEAR {
        let growth = (year - FIRST_YEAR) * 40;
        let movies = 800 + growth + (random_int(&mut rng) % 200) as i64;
        let tvshows = 250 + growth / 2 + (random_int(&mut rng) % 120) as i64;
        stmt.execute(("movie", year, movies))?;
        stmt.execute(("tvSeries", year, tvshows))?;
    }
    Ok(())
}

fn title_name(rng: &mut u32, year: i64, idx: i64) -> String {
    const ADJECTIVES: [&str; 8] = [
        "Silent", "Crimson", "Forgotten", "Electric", "Golden", "Midnight", "Broken", "Distant",
    ];
    const NOUNS: [&str; 8] = [
        "Horizon", "Empire", "Garden", "Signal", "Harbor", "Crown", "Echo", "Voyage",
    ];

    let adjective = ADJECTIVES[random_int(rng) as usize % ADJECTIVES.len()];
    let noun = NOUNS[random_int(rng) as usize % NOUNS.len()];
    format!("The {} {} ({}-{})", adjective, noun, year, idx + 1)
}

fn random_float(seed: &mut u32) -> f64 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    (*seed as f64) / (u32::MAX as f64)
}

fn random_int(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}
