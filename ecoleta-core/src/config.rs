use crate::api::Endpoints;
use crate::i18n::Lang;
use crate::payload::ValidationPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:3333";
pub const DEFAULT_GEO_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";
pub const DEFAULT_HOME_ROUTE: &str = "/";

/// Host-provided settings, resolved once at start-up.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub endpoints: Endpoints,
    pub home_route: String,
    pub lang: Lang,
    pub validation: ValidationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoints: Endpoints::new(DEFAULT_API_URL, DEFAULT_GEO_URL),
            home_route: DEFAULT_HOME_ROUTE.to_string(),
            lang: Lang::default(),
            validation: ValidationPolicy::default(),
        }
    }
}

impl Config {
    /// Resolve settings from page globals (`__API_URL`, `__GEO_URL`,
    /// `__HOME_ROUTE`) and the page's query string (`lang`, `strict`).
    pub fn resolve<F>(global: F, search: &str) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str, default: &str| {
            global(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| {
                    log::debug!("{key} not set, using default: {default}");
                    default.to_string()
                })
        };
        let api = pick("__API_URL", DEFAULT_API_URL);
        let geo = pick("__GEO_URL", DEFAULT_GEO_URL);
        let home_route = pick("__HOME_ROUTE", DEFAULT_HOME_ROUTE);
        let lang = get_query_param(search, "lang")
            .map(|v| Lang::from_tag(&v))
            .unwrap_or_default();
        let validation = match get_query_param(search, "strict").as_deref() {
            Some("1") | Some("true") | Some("yes") => ValidationPolicy::Strict,
            _ => ValidationPolicy::Permissive,
        };
        Config {
            endpoints: Endpoints::new(&api, &geo),
            home_route,
            lang,
            validation,
        }
    }
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_when_host_sets_nothing() {
        let cfg = Config::resolve(|_| None, "");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.endpoints.items(), "http://localhost:3333/items");
    }

    #[test]
    fn globals_and_query_override_defaults() {
        let globals: HashMap<&str, &str> = [
            ("__API_URL", "https://api.ecoleta.test/"),
            ("__HOME_ROUTE", "/inicio"),
            ("__GEO_URL", "   "),
        ]
        .into_iter()
        .collect();
        let cfg = Config::resolve(
            |k| globals.get(k).map(|v| v.to_string()),
            "?lang=en&strict=1",
        );
        assert_eq!(cfg.endpoints.points(), "https://api.ecoleta.test/points");
        assert_eq!(cfg.endpoints, Endpoints::new("https://api.ecoleta.test", DEFAULT_GEO_URL));
        assert_eq!(cfg.home_route, "/inicio");
        assert_eq!(cfg.lang, Lang::En);
        assert_eq!(cfg.validation, ValidationPolicy::Strict);
    }

    #[test]
    fn query_values_are_percent_decoded() {
        assert_eq!(
            get_query_param("?a=1&name=S%C3%A3o+Paulo", "name").as_deref(),
            Some("São Paulo")
        );
        assert_eq!(get_query_param("?a=1", "b"), None);
    }
}
