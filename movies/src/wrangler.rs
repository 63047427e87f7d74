//! Normalizes catalog movie records into [`Movie`] values.

use crate::types::{Movie, MovieId, RawMovie};

/// Normalize one catalog record
#[must_use]
pub fn wrangle_one(raw: &RawMovie) -> Movie {
    Movie {
        id: MovieId::new(raw.id),
        title: raw.title.clone(),
        overview_text: raw.overview.clone().unwrap_or_default(),
        poster_path: raw.poster_path.clone().unwrap_or_default(),
    }
}

/// Normalize a catalog page, preserving order and length
#[must_use]
pub fn wrangle(raw: &[RawMovie]) -> Vec<Movie> {
    raw.iter().map(wrangle_one).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(id: i64, title: &str, overview: Option<&str>, poster_path: Option<&str>) -> RawMovie {
        RawMovie {
            id,
            title: title.to_string(),
            overview: overview.map(str::to_string),
            poster_path: poster_path.map(str::to_string),
        }
    }

    #[test]
    fn test_catalog_fields_are_renamed() {
        let movies = wrangle(&[raw(5, "X", Some("Y"), Some("/p.jpg"))]);

        assert_eq!(
            movies,
            vec![Movie {
                id: MovieId::new(5),
                title: "X".to_string(),
                overview_text: "Y".to_string(),
                poster_path: "/p.jpg".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_text_becomes_empty() {
        let movie = wrangle_one(&raw(7, "Untitled", None, None));
        assert_eq!(movie.overview_text, "");
        assert_eq!(movie.poster_path, "");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let record = raw(1, "Same", None, None);
        assert_eq!(wrangle(&[record.clone(), record]).len(), 2);
    }

    fn raw_movie() -> impl Strategy<Value = RawMovie> {
        (
            any::<i64>(),
            ".{0,12}",
            proptest::option::of(".{0,20}"),
            proptest::option::of("/[a-z]{1,8}\\.jpg"),
        )
            .prop_map(|(id, title, overview, poster_path)| RawMovie {
                id,
                title,
                overview,
                poster_path,
            })
    }

    proptest! {
        #[test]
        fn prop_length_and_order_are_preserved(records in proptest::collection::vec(raw_movie(), 0..32)) {
            let movies = wrangle(&records);
            prop_assert_eq!(movies.len(), records.len());
            for (movie, record) in movies.iter().zip(&records) {
                prop_assert_eq!(movie.id.get(), record.id);
                prop_assert_eq!(&movie.title, &record.title);
            }
        }

        #[test]
        fn prop_wrangling_is_deterministic(records in proptest::collection::vec(raw_movie(), 0..16)) {
            prop_assert_eq!(wrangle(&records), wrangle(&records));
        }
    }
}
