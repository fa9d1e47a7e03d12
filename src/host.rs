use kakera_core::{ConnectorShape, UnknownShape};
use url::form_urlencoded;

/// Parameters a host page passes in its query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostParams {
    pub connector: Option<String>,
    pub level: Option<usize>,
}

impl HostParams {
    /// `level` is kept only when it indexes one of `level_count` levels.
    pub fn from_query(query: &str, level_count: usize) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = HostParams::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "connector" => params.connector = Some(value.into_owned()),
                "level" => match value.trim().parse::<usize>() {
                    Ok(level) if level < level_count => params.level = Some(level),
                    Ok(level) => {
                        log::warn!("ignoring level={level}: only {level_count} levels")
                    }
                    Err(_) => log::warn!("ignoring unparseable level={value}"),
                },
                _ => {}
            }
        }
        params
    }

    pub fn connector_shape(&self) -> Option<(ConnectorShape, Option<UnknownShape>)> {
        self.connector
            .as_deref()
            .map(ConnectorShape::parse_or_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_connector_and_level() {
        let params = HostParams::from_query("?connector=SQUARE&level=2&lang=fr", 5);
        assert_eq!(params.level, Some(2));
        assert_eq!(params.connector_shape(), Some((ConnectorShape::Square, None)));
    }

    #[test]
    fn ignores_out_of_range_or_garbage_level() {
        assert_eq!(HostParams::from_query("level=5", 5).level, None);
        assert_eq!(HostParams::from_query("level=-1", 5).level, None);
        assert_eq!(HostParams::from_query("level=two", 5).level, None);
        assert_eq!(HostParams::from_query("level=4", 5).level, Some(4));
    }

    #[test]
    fn unknown_connector_falls_back() {
        let params = HostParams::from_query("connector=round%20ish", 1);
        assert_eq!(params.connector.as_deref(), Some("round ish"));
        let (shape, warning) = params.connector_shape().expect("connector given");
        assert_eq!(shape, ConnectorShape::Spline);
        assert_eq!(warning, Some(UnknownShape("round ish".to_string())));
    }

    #[test]
    fn empty_query_has_no_params() {
        assert_eq!(HostParams::from_query("", 3), HostParams::default());
    }
}
