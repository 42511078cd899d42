use url::Url;

use crate::error::{Error, Result};

/// The novel being downloaded, identified by its home URL.
///
/// A home URL such as `https://host/novels/my-novel/` splits into the base
/// address `https://host/novels` and the slug `my-novel`; chapter pages live
/// at `{base}/{slug}-{n}.html`. The slug is kept percent-decoded, so
/// `/mi-se%C3%B1or/` has the slug `mi-señor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    home: Url,
    base_address: String,
    slug: String,
    encoded_slug: String,
    title: String,
}

impl Collection {
    pub fn from_home_url(input: &str) -> Result<Self> {
        let parsed =
            Url::parse(input).map_err(|err| Error::invalid_address(input, err.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::invalid_address(input, "must be http/https"));
        }
        if parsed.host_str().is_none() {
            return Err(Error::invalid_address(input, "must have a host"));
        }

        let home = url_with_trailing_slash(&parsed);
        let home_str = home.as_str().trim_end_matches('/');
        let (base_address, encoded_slug) = home_str
            .rsplit_once('/')
            .ok_or_else(|| Error::invalid_address(input, "missing novel path segment"))?;
        if encoded_slug.is_empty() || home.path() == "/" {
            return Err(Error::invalid_address(input, "missing novel path segment"));
        }
        let slug = urlencoding::decode(encoded_slug)
            .map_err(|err| {
                Error::invalid_address(input, format!("novel path segment is not UTF-8: {err}"))
            })?
            .into_owned();

        let title = crate::chapter::title_case(&slug.replace(['-', '_'], " "));

        Ok(Self {
            base_address: base_address.to_owned(),
            encoded_slug: encoded_slug.to_owned(),
            slug,
            title,
            home,
        })
    }

    pub fn home_address(&self) -> &Url {
        &self.home
    }

    /// Scheme, host and path prefix shared by every chapter locator, without
    /// a trailing slash.
    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The slug as it appears in the home URL path.
    pub fn encoded_slug(&self) -> &str {
        &self.encoded_slug
    }

    /// Human readable title derived from the slug.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn listing_address(&self, page_param: &str, page: u32) -> Url {
        let mut url = self.home.clone();
        url.set_fragment(None);
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair(page_param, &page.to_string());
        url
    }
}

fn url_with_trailing_slash(url: &Url) -> Url {
    let mut out = url.clone();
    out.set_fragment(None);
    out.set_query(None);
    let path = out.path();
    if !path.ends_with('/') {
        out.set_path(&format!("{path}/"));
    }
    out
}
