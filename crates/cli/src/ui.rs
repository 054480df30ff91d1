//! The concrete terminal `Ui` (§6, expansion A4): headers/messages go to
//! stderr so stdout stays reserved for machine-readable output, and
//! password-shaped prompts (anything whose id contains `password`) are
//! read with `rpassword` so they never echo.

use orch_domain::error::{Error, Result};
use orch_domain::ui::{InputOpts, Ui};
use std::io::Write;

#[derive(Debug, Default)]
pub struct TerminalUi;

impl Ui for TerminalUi {
    fn header(&self, text: &str) {
        eprintln!("\n== {text} ==");
    }

    fn message(&self, text: &str) {
        eprintln!("{text}");
    }

    fn input(&self, opts: &InputOpts) -> Result<String> {
        if opts.id.contains("password") {
            rpassword::prompt_password(format!("{}: ", opts.query))
                .map_err(|e| Error::Other(format!("reading password: {e}")))
        } else {
            eprint!("{}", opts.query);
            if !opts.description.is_empty() {
                eprint!(" ({})", opts.description);
            }
            eprint!(": ");
            std::io::stderr().flush().ok();
            let mut line = String::new();
            std::io::stdin()
                .read_line(&mut line)
                .map_err(|e| Error::Other(format!("reading input: {e}")))?;
            Ok(line.trim_end_matches(['\n', '\r']).to_string())
        }
    }
}
