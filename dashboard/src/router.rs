/// The two client-side routes, as an explicit state machine instead of a
/// path-to-component table: the whole navigation surface is the map and one
/// parameterized detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Map,
    Junction(String),
}

impl Route {
    /// Parses the original URL scheme: `/` for the map, `/junction/:id` for
    /// a detail page. Ids are opaque strings.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        if path == "/" {
            return Some(Self::Map);
        }
        let id = path.strip_prefix("/junction/")?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Self::Junction(id.to_string()))
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Map => "/".to_string(),
            Self::Junction(id) => format!("/junction/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Map));
        assert_eq!(Route::parse("/junction/J1"), Some(Route::Junction("J1".into())));
        assert_eq!(Route::parse("/junction/t"), Some(Route::Junction("t".into())));
    }

    #[test]
    fn rejects_anything_else() {
        assert_eq!(Route::parse(""), None);
        assert_eq!(Route::parse("/junction/"), None);
        assert_eq!(Route::parse("/junction/a/b"), None);
        assert_eq!(Route::parse("/junctions/J1"), None);
    }

    #[test]
    fn path_round_trips() {
        for route in [Route::Map, Route::Junction("42".into())] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }
}
