//! Integration tests for the query pipeline.
//!
//! These run whole invocations (tokens in, rows out) against small
//! in-memory datasets and the bundled sample file.

use data_loader::{MovieRecord, RecordStore};
use pipeline::{FlagRegistry, GroupKey, QueryError, QueryRequest, QueryResult, TOP_N_LIMIT};
use std::collections::BTreeMap;
use std::path::Path;

fn movie(title: &str, year: u16, rating: f64, votes: u64) -> MovieRecord {
    let mut movie = MovieRecord::new(title, rating, votes);
    movie.year = Some(year);
    movie
}

fn run<'a>(args: &[&str], records: &'a [MovieRecord]) -> QueryResult<'a> {
    let request = QueryRequest::from_args(args, &FlagRegistry::standard()).unwrap();
    request.run(records).result
}

fn titles(result: &QueryResult<'_>) -> Vec<String> {
    match result {
        QueryResult::Movies(movies) => movies.iter().map(|m| m.title.clone()).collect(),
        QueryResult::Groups(_) => panic!("expected movies, got groups"),
    }
}

#[test]
fn test_title_and_year_example() {
    let records = vec![
        movie("Rain Man", 1988, 8.0, 488_000),
        movie("The Rainmaker", 1997, 7.2, 70_000),
    ];

    let result = run(&["--title", "rain", "--year-after", "1990"], &records);

    assert_eq!(titles(&result), vec!["The Rainmaker"]);
}

#[test]
fn test_no_flags_returns_everything_in_order() {
    let records = vec![
        movie("Zodiac", 2007, 7.7, 500_000),
        movie("Alien", 1979, 8.4, 800_000),
        movie("Memento", 2000, 8.4, 1_100_000),
    ];

    let result = run(&[], &records);

    assert_eq!(titles(&result), vec!["Zodiac", "Alien", "Memento"]);
}

#[test]
fn test_age_rating_top_ten_highest_rated() {
    let mut records = Vec::new();
    for i in 0..15u16 {
        let mut m = movie(&format!("PG-13 #{i}"), 2000 + i, 6.0 + f64::from(i) * 0.2, 10_000);
        m.age_rating = Some("PG-13".to_string());
        records.push(m);
    }
    let mut r_rated = movie("R Rated", 2010, 9.9, 10_000);
    r_rated.age_rating = Some("R".to_string());
    records.push(r_rated);

    let result = run(&["--age-rating", "PG-13", "--top-ten", "highest-rated"], &records);

    let QueryResult::Movies(movies) = result else {
        panic!("expected movies");
    };
    assert_eq!(movies.len(), TOP_N_LIMIT);
    assert_eq!(movies[0].title, "PG-13 #14");
    assert_eq!(movies[9].title, "PG-13 #5");
    assert!(movies.windows(2).all(|w| w[0].rating >= w[1].rating));
    assert!(movies.iter().all(|m| m.age_rating.as_deref() == Some("PG-13")));
}

#[test]
fn test_actor_insights_by_year_match_manual_tally() {
    let mut records = Vec::new();
    for (title, year, cast) in [
        ("Se7en", 1995, "Brad Pitt"),
        ("12 Monkeys", 1995, "Brad Pitt"),
        ("Fight Club", 1999, "Brad Pitt"),
        ("Heat", 1995, "Al Pacino"),
        ("Snatch", 2000, "Brad Pitt"),
    ] {
        let mut m = movie(title, year, 8.0, 1_000);
        m.cast = vec![cast.to_string()];
        records.push(m);
    }

    let result = run(&["--actor", "Brad Pitt", "--insights", "year"], &records);

    let QueryResult::Groups(groups) = result else {
        panic!("expected groups");
    };
    let tally: BTreeMap<String, usize> = groups
        .iter()
        .map(|g| (g.key.to_string(), g.count))
        .collect();
    assert_eq!(
        tally,
        BTreeMap::from([
            ("1995".to_string(), 2),
            ("1999".to_string(), 1),
            ("2000".to_string(), 1),
        ])
    );
    assert_eq!(groups[0].key, GroupKey::Year(Some(1995)));
}

#[test]
fn test_single_key_groupings_count_each_record_once() {
    let mut records = Vec::new();
    for (title, year, genres) in [
        ("Heat", 1995, &["Crime", "Drama"][..]),
        ("The Dark Knight", 2008, &["Action", "Crime", "Drama"][..]),
        ("Se7en", 1995, &["crime", "drama"][..]),
    ] {
        let mut m = movie(title, year, 8.5, 1_000);
        m.genres = genres.iter().map(|g| g.to_string()).collect();
        records.push(m);
    }

    let registry = FlagRegistry::standard();
    for grouping in ["genre", "genre-by-year", "year", "genre:avg-rating"] {
        let request = QueryRequest::from_args(&["--genre", "crime", "--insights", grouping], &registry).unwrap();
        let outcome = request.run(&records);

        let QueryResult::Groups(groups) = &outcome.result else {
            panic!("expected groups");
        };
        assert_eq!(outcome.matched, 3);
        assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), outcome.matched, "{grouping}");
    }

    let result = run(&["--insights", "genre:count"], &records);
    let QueryResult::Groups(groups) = result else {
        panic!("expected groups");
    };
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].key, GroupKey::Genre("Crime, Drama".to_string()));
    assert_eq!(groups[1].count, 2);
}

#[test]
fn test_every_returned_record_satisfies_every_flag() {
    let mut records = Vec::new();
    for i in 0..40u64 {
        let mut m = movie(&format!("Movie {i}"), 1960 + (i as u16), 6.0 + (i % 8) as f64 * 0.5, i * 1_000);
        m.genres = vec![if i % 2 == 0 { "Drama" } else { "Comedy" }.to_string()];
        m.runtime = Some(90 + i as u16);
        records.push(m);
    }

    let registry = FlagRegistry::standard();
    let request = QueryRequest::from_args(
        &["--genre", "drama", "--rating", "7.5", "--runtime-below", "120"],
        &registry,
    )
    .unwrap();
    let outcome = request.run(&records);

    let QueryResult::Movies(movies) = outcome.result else {
        panic!("expected movies");
    };
    assert!(!movies.is_empty());
    assert!(movies.len() < records.len());
    for m in &movies {
        assert!(request.pipeline.matches(m));
        assert!(m.has_genre("Drama") && m.rating >= 7.5 && m.runtime.unwrap() < 120);
    }
}

#[test]
fn test_hidden_gems_never_returns_zero_votes() {
    let records = vec![
        movie("Unseen", 2020, 9.8, 0),
        movie("Cult", 1985, 8.0, 30_000),
        movie("Hit", 1994, 9.0, 2_000_000),
    ];

    let result = run(&["--top-ten", "hidden-gems"], &records);

    assert_eq!(titles(&result), vec!["Cult", "Hit"]);
}

#[test]
fn test_empty_match_is_not_an_error() {
    let records = vec![movie("Heat", 1995, 8.3, 577_113)];

    let request =
        QueryRequest::from_args(&["--director", "Nobody", "--insights", "genre"], &FlagRegistry::standard())
            .unwrap();
    let outcome = request.run(&records);

    assert_eq!(outcome.matched, 0);
    assert!(outcome.result.is_empty());
}

#[test]
fn test_errors_name_the_offending_flag() {
    let registry = FlagRegistry::standard();

    let err = QueryRequest::from_args(&["--year-after", "soon"], &registry).unwrap_err();
    assert!(matches!(err, QueryError::InvalidValue { .. }));
    assert!(err.to_string().contains("--year-after"));

    let err = QueryRequest::from_args(&["--budget", "5"], &registry).unwrap_err();
    assert!(err.to_string().contains("--budget"));
}

#[test]
fn test_bundled_dataset_queries() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/imdb_top_1000.csv");
    if !path.exists() {
        return;
    }
    let store = RecordStore::load_from_file(&path).unwrap();

    let result = run(&["--top-ten", "highest-rated"], store.records());
    let QueryResult::Movies(movies) = result else {
        panic!("expected movies");
    };
    assert!(movies.len() <= TOP_N_LIMIT);
    assert!(movies.windows(2).all(|w| w[0].rating >= w[1].rating));

    let result = run(&["--insights", "year:count"], store.records());
    let QueryResult::Groups(groups) = result else {
        panic!("expected groups");
    };
    assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), store.len());
}
