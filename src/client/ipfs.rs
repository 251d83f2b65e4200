//! IPFS addressing and gateway resolution.

/// URL scheme prefix of content-addressed links.
pub const IPFS_SCHEME: &str = "ipfs://";

/// Check whether a link is an IPFS content address.
pub fn is_ipfs_url(url: &str) -> bool {
    url.len() > IPFS_SCHEME.len()
        && url
            .get(..IPFS_SCHEME.len())
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case(IPFS_SCHEME))
}

/// Resolve an `ipfs://<cid>/<path>` link against a gateway base such as
/// `https://ipfs.io/ipfs/`.
///
/// Returns `None` when the link is not an IPFS address.
pub fn gateway_url(url: &str, gateway: &str) -> Option<String> {
    if !is_ipfs_url(url) {
        return None;
    }

    let content_path = url[IPFS_SCHEME.len()..].trim_start_matches('/');
    Some(format!("{}/{}", gateway.trim_end_matches('/'), content_path))
}
