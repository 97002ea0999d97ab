use std::io::{self, Write};

const MAX_USERNAME_LEN: usize = 15;

/// Prompt until the user provides a valid account username.
pub fn prompt_username() -> io::Result<String> {
    let mut input = String::new();
    loop {
        print!("\nEnter a Twitter username: ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no username provided",
            ));
        }
        match normalize_username(&input) {
            Ok(username) => return Ok(username),
            Err(reason) => println!("{reason}"),
        }
    }
}

/// Strip a pasted profile URL down to its username and validate it:
/// ASCII alphanumerics and underscores, 1-15 characters.
pub fn normalize_username(raw: &str) -> Result<String, String> {
    let mut name = raw.trim();
    // Accept a pasted profile URL such as https://twitter.com/someone.
    if let Some((_, rest)) = name.split_once(".com/") {
        name = rest;
    }
    if name.is_empty() {
        return Err(r#""" - is not a valid username"#.to_string());
    }
    let well_formed = name.len() <= MAX_USERNAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if well_formed {
        Ok(name.to_string())
    } else {
        Err(
            "Username can only contain alphanumeric characters and underscores (1-15 characters)"
                .to_string(),
        )
    }
}
