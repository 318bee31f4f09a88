//! Provider REST endpoint construction.

use url::Url;

use canopy_core::error::{ProviderError, ProviderResult};
use canopy_core::ports::PageRange;

/// `{base}/v2.0/Tree/TreeOfValues/{table_id}/{field_id}`
pub(crate) fn tree_of_values_url(base: &Url, table_id: &str, field_id: &str) -> ProviderResult<Url> {
    with_segments(base, &["v2.0", "Tree", "TreeOfValues", table_id, field_id])
}

/// `{base}/v3.0/Tree/{table_id}/TableEntities?from=&to=&sort_by=`
pub(crate) fn table_entities_url(
    base: &Url,
    table_id: &str,
    range: PageRange,
    sort_by: &str,
) -> ProviderResult<Url> {
    let mut url = with_segments(base, &["v3.0", "Tree", table_id, "TableEntities"])?;
    url.query_pairs_mut()
        .append_pair("from", &range.from.to_string())
        .append_pair("to", &range.to.to_string())
        .append_pair("sort_by", sort_by);
    Ok(url)
}

/// Append percent-encoded path segments to the base URL.
///
/// A trailing slash on the base URL does not produce an empty segment.
fn with_segments(base: &Url, segments: &[&str]) -> ProviderResult<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|_| ProviderError::InvalidConfig(format!("base URL cannot have a path: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_table_entities_url() {
        let range = PageRange { from: 11, to: 20 };
        let url = table_entities_url(&base("http://localhost:3000"), "roads", range, "CreationTime")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:3000/v3.0/Tree/roads/TableEntities?from=11&to=20&sort_by=CreationTime"
        );
    }

    #[test]
    fn test_trailing_slash_and_prefix_are_kept_clean() {
        let url = tree_of_values_url(&base("http://provider/api/"), "roads", "kind").unwrap();
        assert_eq!(url.as_str(), "http://provider/api/v2.0/Tree/TreeOfValues/roads/kind");

        let url = tree_of_values_url(&base("http://provider/"), "roads", "kind").unwrap();
        assert_eq!(url.as_str(), "http://provider/v2.0/Tree/TreeOfValues/roads/kind");
    }

    #[test]
    fn test_ids_are_percent_encoded() {
        // A slash in an id must not create an extra path segment
        let url = tree_of_values_url(&base("http://provider"), "a/b", "x y").unwrap();
        assert_eq!(url.path(), "/v2.0/Tree/TreeOfValues/a%2Fb/x%20y");
    }

    #[test]
    fn test_sort_key_is_query_encoded() {
        let range = PageRange { from: 1, to: 10 };
        let url = table_entities_url(&base("http://provider"), "roads", range, "a&b").unwrap();
        assert_eq!(url.query(), Some("from=1&to=10&sort_by=a%26b"));
    }
}
