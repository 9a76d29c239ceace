use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

/// Resolves the passphrase for this invocation.
///
/// `--passphrase` and `AESBRIDGE_PASSPHRASE` are handled by clap; this is
/// the fallback when neither is set.
pub fn read_passphrase(given: Option<String>) -> Result<Zeroizing<String>> {
    if let Some(pw) = given {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  stdin (Pipeline)
    //  printf "%s" "$SECRET" | aes-bridge encrypt --mode gcm --data hello
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let pw = Zeroizing::new(rpassword::prompt_password("Passphrase: ")?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("No passphrase provided")
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_passphrase_wins() {
        let pw = read_passphrase(Some("from-flag".to_string())).unwrap();
        assert_eq!(pw.as_str(), "from-flag");
    }

    #[test]
    fn trim_newline_strips_crlf_only_at_end() {
        let mut s = String::from("pass word\r\n");
        trim_newline(&mut s);
        assert_eq!(s, "pass word");

        let mut s = String::from("\nkeep");
        trim_newline(&mut s);
        assert_eq!(s, "\nkeep");
    }
}
