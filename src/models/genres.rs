use serde::Serialize;

/// Genre id with its English label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenreLabel {
    pub id: u32,
    pub name: &'static str,
}

/// Genres offered as search filters
pub const GENRES: &[GenreLabel] = &[
    GenreLabel { id: 12, name: "Adventure" },
    GenreLabel { id: 14, name: "Fantasy" },
    GenreLabel { id: 16, name: "Animation" },
    GenreLabel { id: 18, name: "Drama" },
    GenreLabel { id: 27, name: "Horror" },
    GenreLabel { id: 28, name: "Action" },
    GenreLabel { id: 35, name: "Comedy" },
    GenreLabel { id: 36, name: "History" },
    GenreLabel { id: 37, name: "Western" },
    GenreLabel { id: 53, name: "Thriller" },
    GenreLabel { id: 80, name: "Crime" },
    GenreLabel { id: 99, name: "Documentary" },
    GenreLabel { id: 878, name: "Science Fiction" },
    GenreLabel { id: 9648, name: "Mystery" },
    GenreLabel { id: 10402, name: "Music" },
    GenreLabel { id: 10749, name: "Romance" },
    GenreLabel { id: 10751, name: "Family" },
    GenreLabel { id: 10752, name: "War" },
    GenreLabel { id: 10770, name: "TV Movie" },
];
