use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use wayback_engine::ProxyEndpoint;

/// Read the newline-delimited `ip:port:username:password` proxy list.
/// Malformed lines are skipped with a warning; a missing file is an error
/// for the caller to handle.
pub fn load_proxies(path: &Path) -> io::Result<Vec<ProxyEndpoint>> {
    let content = fs::read_to_string(path)?;
    let mut proxies = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match ProxyEndpoint::from_str(line) {
            Ok(endpoint) => proxies.push(endpoint),
            Err(err) => log::warn!("invalid proxy format {line:?}: {err}"),
        }
    }
    Ok(proxies)
}

#[cfg(test)]
mod tests {
    use super::load_proxies;

    #[test]
    fn skips_malformed_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("proxies.txt");
        std::fs::write(
            &path,
            "10.0.0.1:8080:alice:secret\nnot-a-proxy\n10.0.0.2:notaport:bob:pw\n\n10.0.0.3:3128:carol:pw\n",
        )
        .unwrap();

        let proxies = load_proxies(&path).unwrap();
        assert_eq!(proxies.len(), 2);
        assert_eq!(proxies[0].host, "10.0.0.1");
        assert_eq!(proxies[1].port, 3128);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_proxies(&dir.path().join("nope.txt")).is_err());
    }
}
