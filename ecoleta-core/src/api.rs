use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{FormError, Resource};
use crate::models::{Category, RegionRow, SubRegionRow};

/// Characters escaped when a value is placed into a single path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// URLs of the backend and the geography service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    api_base: String,
    geo_base: String,
}

impl Endpoints {
    pub fn new(api_base: &str, geo_base: &str) -> Self {
        Endpoints {
            api_base: api_base.trim_end_matches('/').to_string(),
            geo_base: geo_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn items(&self) -> String {
        format!("{}/items", self.api_base)
    }

    pub fn points(&self) -> String {
        format!("{}/points", self.api_base)
    }

    pub fn regions(&self) -> String {
        format!("{}/estados", self.geo_base)
    }

    pub fn sub_regions(&self, region: &str) -> String {
        format!(
            "{}/estados/{}/municipios",
            self.geo_base,
            utf8_percent_encode(region, SEGMENT)
        )
    }
}

pub fn decode_categories(body: &str) -> Result<Vec<Category>, FormError> {
    serde_json::from_str(body).map_err(|source| FormError::Decode {
        resource: Resource::Categories,
        source,
    })
}

pub fn decode_regions(body: &str) -> Result<Vec<String>, FormError> {
    let rows: Vec<RegionRow> = serde_json::from_str(body).map_err(|source| FormError::Decode {
        resource: Resource::Regions,
        source,
    })?;
    Ok(rows.into_iter().map(|r| r.sigla).collect())
}

pub fn decode_sub_regions(body: &str) -> Result<Vec<String>, FormError> {
    let rows: Vec<SubRegionRow> =
        serde_json::from_str(body).map_err(|source| FormError::Decode {
            resource: Resource::SubRegions,
            source,
        })?;
    Ok(rows.into_iter().map(|r| r.nome).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_without_double_slashes() {
        let e = Endpoints::new(
            "http://localhost:3333/",
            "https://servicodados.ibge.gov.br/api/v1/localidades",
        );
        assert_eq!(e.items(), "http://localhost:3333/items");
        assert_eq!(e.points(), "http://localhost:3333/points");
        assert_eq!(
            e.regions(),
            "https://servicodados.ibge.gov.br/api/v1/localidades/estados"
        );
        assert_eq!(
            e.sub_regions("RJ"),
            "https://servicodados.ibge.gov.br/api/v1/localidades/estados/RJ/municipios"
        );
    }

    #[test]
    fn region_code_cannot_escape_its_segment() {
        let e = Endpoints::new("http://api", "http://geo");
        assert_eq!(
            e.sub_regions("../x y"),
            "http://geo/estados/..%2Fx%20y/municipios"
        );
    }

    #[test]
    fn decodes_geography_rows_and_ignores_extra_fields() {
        let regions =
            decode_regions(r#"[{"id":33,"sigla":"RJ","nome":"Rio de Janeiro"},{"sigla":"SP"}]"#)
                .unwrap();
        assert_eq!(regions, vec!["RJ", "SP"]);
        let cities = decode_sub_regions(r#"[{"id":1,"nome":"Niterói"}]"#).unwrap();
        assert_eq!(cities, vec!["Niterói"]);
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode_categories("<html>").unwrap_err();
        assert!(matches!(
            err,
            FormError::Decode {
                resource: Resource::Categories,
                ..
            }
        ));
    }
}
