use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::errors::FieldViolation;

/// Rate assigned to a new movie when the creation payload omits it.
pub const DEFAULT_RATE: f64 = 5.5;

/// Canonical field order used when reporting violations.
const FIELD_ORDER: [&str; 7] = [
    "title", "year", "director", "duration", "rate", "poster", "genre",
];

/// Fields a creation payload must carry. `rate` is absent because it
/// defaults to [`DEFAULT_RATE`].
const REQUIRED_FIELDS: [&str; 6] = ["title", "year", "director", "duration", "poster", "genre"];

/// Closed set of genres a movie may carry. Serialized names are exact-case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Genre {
    Action,
    Crime,
    Drama,
}

/// A catalog record.
///
/// `id` is assigned by the server on creation and never reassigned; every
/// other field may be overwritten by a partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub rate: f64,
    pub poster: String,
    pub genre: Vec<Genre>,
}

impl Movie {
    pub fn new(id: Uuid, fields: NewMovie) -> Self {
        Self {
            id,
            title: fields.title,
            year: fields.year,
            director: fields.director,
            duration: fields.duration,
            rate: fields.rate,
            poster: fields.poster,
            genre: fields.genre,
        }
    }

    /// Merge the fields present in `patch` onto this record. Absent fields
    /// are left unchanged; `id` is not part of the patch schema and can
    /// never be overwritten.
    pub fn apply(&mut self, patch: MoviePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(director) = patch.director {
            self.director = director;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
        if let Some(poster) = patch.poster {
            self.poster = poster;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
    }

    /// Whether any genre entry matches `genre` case-insensitively.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre
            .iter()
            .any(|g| g.as_ref().eq_ignore_ascii_case(genre))
    }
}

/// A fully validated creation payload, ready to become a [`Movie`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub rate: f64,
    pub poster: String,
    pub genre: Vec<Genre>,
}

impl NewMovie {
    /// Validate a creation payload against the full schema, collecting every
    /// violation rather than stopping at the first.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldViolation>> {
        let map = object_body(body)?;

        let mut violations = Vec::new();
        for field in REQUIRED_FIELDS {
            if !map.contains_key(field) {
                violations.push(FieldViolation::new(field, format!("Movie {field} is required")));
            }
        }

        let schema = MovieSchema::extract(map, &mut violations);
        if let Err(errors) = schema.validate() {
            collect_constraint_violations(&errors, &mut violations);
        }

        if !violations.is_empty() {
            sort_violations(&mut violations);
            return Err(violations);
        }

        let (Some(title), Some(year), Some(director), Some(duration), Some(poster), Some(genre)) = (
            schema.title,
            schema.year,
            schema.director,
            schema.duration,
            schema.poster,
            schema.genre,
        ) else {
            // required and type checks above guarantee these are Some
            return Err(violations);
        };

        Ok(Self {
            title,
            year,
            director,
            duration,
            rate: schema.rate.unwrap_or(DEFAULT_RATE),
            poster,
            genre,
        })
    }
}

/// A validated partial payload; `None` leaves the target field unchanged.
///
/// The schema is the creation schema with every field optional. `rate` is
/// not defaulted here: a patch that omits it keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub duration: Option<u32>,
    pub rate: Option<f64>,
    pub poster: Option<String>,
    pub genre: Option<Vec<Genre>>,
}

impl MoviePatch {
    /// Validate a partial payload. Fields present in the body must satisfy
    /// the same constraints as on creation; absent fields are simply `None`.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldViolation>> {
        let map = object_body(body)?;

        let mut violations = Vec::new();
        let schema = MovieSchema::extract(map, &mut violations);
        if let Err(errors) = schema.validate() {
            collect_constraint_violations(&errors, &mut violations);
        }

        if !violations.is_empty() {
            sort_violations(&mut violations);
            return Err(violations);
        }

        Ok(Self {
            title: schema.title,
            year: schema.year,
            director: schema.director,
            duration: schema.duration,
            rate: schema.rate,
            poster: schema.poster,
            genre: schema.genre,
        })
    }
}

/// Declarative field constraints shared by the full and partial schemas.
///
/// Extraction fills in `None` for fields that are absent or mistyped (the
/// latter already reported), so the validators below only ever run against
/// values of the right type.
#[derive(Debug, Default, Validate)]
struct MovieSchema {
    #[validate(length(min = 1, message = "Movie title must not be empty"))]
    title: Option<String>,
    #[validate(range(min = 1900, max = 2024, message = "Movie year must be between 1900 and 2024"))]
    year: Option<i32>,
    director: Option<String>,
    #[validate(range(min = 1, message = "Movie duration must be a positive number of minutes"))]
    duration: Option<u32>,
    #[validate(range(min = 0.0, max = 10.0, message = "Movie rate must be between 0 and 10"))]
    rate: Option<f64>,
    #[validate(url(message = "Movie poster must be a valid URL"))]
    poster: Option<String>,
    genre: Option<Vec<Genre>>,
}

impl MovieSchema {
    fn extract(map: &Map<String, Value>, violations: &mut Vec<FieldViolation>) -> Self {
        Self {
            title: typed_field(map, "title", "Movie title must be a string", violations),
            year: typed_field(map, "year", "Movie year must be an integer", violations),
            director: typed_field(map, "director", "Movie director must be a string", violations),
            duration: typed_field(
                map,
                "duration",
                "Movie duration must be a positive integer",
                violations,
            ),
            rate: typed_field(map, "rate", "Movie rate must be a number", violations),
            poster: typed_field(map, "poster", "Movie poster must be a string", violations),
            genre: genre_field(map, violations),
        }
    }
}

fn object_body(body: &Value) -> Result<&Map<String, Value>, Vec<FieldViolation>> {
    body.as_object()
        .ok_or_else(|| vec![FieldViolation::new("body", "Request body must be a JSON object")])
}

/// Pull one field out of the body, reporting a type mismatch when the value
/// cannot deserialize into `T`. Absent fields yield `None` silently.
fn typed_field<T: DeserializeOwned>(
    map: &Map<String, Value>,
    field: &'static str,
    mismatch: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    let value = map.get(field)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            violations.push(FieldViolation::new(field, mismatch));
            None
        }
    }
}

/// Genre carries two layered checks: the value must be an array of strings,
/// and every element must name a member of the closed [`Genre`] set.
fn genre_field(map: &Map<String, Value>, violations: &mut Vec<FieldViolation>) -> Option<Vec<Genre>> {
    let value = map.get("genre")?;
    let names: Vec<String> = match serde_json::from_value(value.clone()) {
        Ok(names) => names,
        Err(_) => {
            violations.push(FieldViolation::new(
                "genre",
                "Movie genre must be an array of strings",
            ));
            return None;
        }
    };

    let mut genres = Vec::with_capacity(names.len());
    let mut invalid = Vec::new();
    for name in &names {
        match Genre::from_str(name) {
            Ok(genre) => genres.push(genre),
            Err(_) => invalid.push(name.as_str()),
        }
    }

    if !invalid.is_empty() {
        violations.push(FieldViolation::new(
            "genre",
            format!(
                "Movie genre contains invalid values: {}; expected Action, Crime or Drama",
                invalid.join(", ")
            ),
        ));
        return None;
    }

    Some(genres)
}

fn collect_constraint_violations(
    errors: &validator::ValidationErrors,
    violations: &mut Vec<FieldViolation>,
) {
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Movie {field} is invalid"));
            violations.push(FieldViolation::new(field, message));
        }
    }
}

fn sort_violations(violations: &mut [FieldViolation]) {
    violations.sort_by_key(|v| {
        FIELD_ORDER
            .iter()
            .position(|f| *f == v.field)
            .unwrap_or(FIELD_ORDER.len())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "title": "Blade Runner",
            "year": 1982,
            "director": "Ridley Scott",
            "duration": 117,
            "rate": 8.1,
            "poster": "https://example.com/blade-runner.jpg",
            "genre": ["Action", "Drama"]
        })
    }

    #[test]
    fn valid_payload_passes() {
        let movie = NewMovie::from_json(&valid_body()).unwrap();
        assert_eq!(movie.title, "Blade Runner");
        assert_eq!(movie.genre, vec![Genre::Action, Genre::Drama]);
    }

    #[test]
    fn rate_defaults_when_absent() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("rate");
        let movie = NewMovie::from_json(&body).unwrap();
        assert_eq!(movie.rate, DEFAULT_RATE);
    }

    #[test]
    fn missing_title_is_reported_as_required() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("title");
        let violations = NewMovie::from_json(&body).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "title");
        assert_eq!(violations[0].message, "Movie title is required");
    }

    #[test]
    fn all_violations_are_collected() {
        let body = json!({
            "title": 42,
            "year": 1850,
            "director": "Someone",
            "duration": 120,
            "rate": 11.0,
            "poster": "not a url",
            "genre": ["Drama", "Romance"]
        });
        let violations = NewMovie::from_json(&body).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "year", "rate", "poster", "genre"]);
    }

    #[test]
    fn genre_must_be_an_array() {
        let mut body = valid_body();
        body["genre"] = json!("Drama");
        let violations = NewMovie::from_json(&body).unwrap_err();
        assert_eq!(violations[0].field, "genre");
        assert!(violations[0].message.contains("array"));
    }

    #[test]
    fn genre_membership_is_exact_case() {
        let mut body = valid_body();
        body["genre"] = json!(["drama"]);
        let violations = NewMovie::from_json(&body).unwrap_err();
        assert_eq!(violations[0].field, "genre");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let violations = NewMovie::from_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(violations[0].field, "body");
    }

    #[rstest]
    #[case(1899, false)]
    #[case(1900, true)]
    #[case(2024, true)]
    #[case(2025, false)]
    fn year_bounds(#[case] year: i32, #[case] ok: bool) {
        let mut body = valid_body();
        body["year"] = json!(year);
        assert_eq!(NewMovie::from_json(&body).is_ok(), ok);
    }

    #[rstest]
    #[case(json!(-0.1), false)]
    #[case(json!(0.0), true)]
    #[case(json!(10.0), true)]
    #[case(json!(10.5), false)]
    fn rate_bounds(#[case] rate: Value, #[case] ok: bool) {
        let mut body = valid_body();
        body["rate"] = rate;
        assert_eq!(NewMovie::from_json(&body).is_ok(), ok);
    }

    #[test]
    fn partial_payload_accepts_empty_body() {
        let patch = MoviePatch::from_json(&json!({})).unwrap();
        assert_eq!(patch, MoviePatch::default());
    }

    #[test]
    fn partial_payload_still_enforces_constraints() {
        let violations = MoviePatch::from_json(&json!({ "year": 3000 })).unwrap_err();
        assert_eq!(violations[0].field, "year");
    }

    #[test]
    fn partial_payload_ignores_id() {
        let patch = MoviePatch::from_json(&json!({ "id": "anything", "year": 2001 })).unwrap();
        assert_eq!(patch.year, Some(2001));
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut movie = Movie::new(
            Uuid::new_v4(),
            NewMovie::from_json(&valid_body()).unwrap(),
        );
        let before = movie.clone();
        movie.apply(MoviePatch {
            year: Some(2000),
            ..MoviePatch::default()
        });
        assert_eq!(movie.year, 2000);
        assert_eq!(movie.id, before.id);
        assert_eq!(movie.title, before.title);
        assert_eq!(movie.rate, before.rate);
        assert_eq!(movie.genre, before.genre);
    }

    #[test]
    fn has_genre_matches_case_insensitively() {
        let movie = Movie::new(Uuid::new_v4(), NewMovie::from_json(&valid_body()).unwrap());
        assert!(movie.has_genre("drama"));
        assert!(movie.has_genre("ACTION"));
        assert!(!movie.has_genre("crime"));
    }
}
