use std::io::{IsTerminal, Read};
use std::path::Path;

/// Read the whole input, from `path` or stdin when `None`.
///
/// Non-UTF-8 bytes are decoded as latin1 rather than rejected.
pub fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    let content = match path {
        Some(path) => std::fs::read(path)?,
        None => {
            let stdin = std::io::stdin();
            if stdin.is_terminal() {
                tracing::info!("waiting on stdin for data...");
            }
            let mut buf = Vec::new();
            stdin.lock().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(decode(content))
}

fn decode(content: Vec<u8>) -> String {
    String::from_utf8(content)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_fallback_keeps_every_byte() {
        assert_eq!(decode(b"caf\xe9 1 2".to_vec()), "caf\u{e9} 1 2");
        assert_eq!(decode(b"plain 1 2".to_vec()), "plain 1 2");
    }
}
