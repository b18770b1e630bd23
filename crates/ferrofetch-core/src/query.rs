
use time::Date;

/// One query-string entry declared by a vendor query type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryField {
    /// Rust-side field name, matched against exclusion lists.
    pub name: &'static str,
    /// Name the vendor expects on the wire.
    pub wire_name: &'static str,
    pub value: Option<String>,
}

impl QueryField {
    pub fn new(name: &'static str, value: Option<String>) -> Self {
        Self {
            name,
            wire_name: name,
            value,
        }
    }

    pub fn renamed(name: &'static str, wire_name: &'static str, value: Option<String>) -> Self {
        Self {
            name,
            wire_name,
            value,
        }
    }
}

/// Vendor query types that can be rendered into a query string.
pub trait QueryParams {
    /// Fields in wire order. `None` values are omitted from the URL.
    fn query_fields(&self) -> Vec<QueryField>;
}

/// Deterministic endpoint URL assembly for one vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base_url: String,
    credential_param: &'static str,
}

impl UrlBuilder {
    pub fn new(base_url: impl Into<String>, credential_param: &'static str) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            credential_param,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/v{version}/{endpoint}?{query}&{credential_param}={api_key}`
    ///
    /// The credential is always the trailing argument.
    pub fn build(
        &self,
        version: u8,
        endpoint: &str,
        api_key: &str,
        query: Option<&dyn QueryParams>,
        exclude: &[&str],
    ) -> String {
        let mut url = format!(
            "{}/v{version}/{}?",
            self.base_url,
            endpoint.trim_start_matches('/')
        );

        if let Some(query) = query {
            for field in query.query_fields() {
                if exclude.contains(&field.name) {
                    continue;
                }
                if let Some(value) = field.value {
                    url.push_str(&format!(
                        "{}={}&",
                        field.wire_name,
                        urlencoding::encode(&value)
                    ));
                }
            }
        }

        url.push_str(&format!(
            "{}={}",
            self.credential_param,
            urlencoding::encode(api_key)
        ));
        url
    }
}

/// `YYYY-MM-DD`, the date format every vendor endpoint accepts.
pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// URL with the query string removed, safe to log.
pub(crate) fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}
