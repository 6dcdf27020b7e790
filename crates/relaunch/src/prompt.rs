//! Interactive update confirmation

use dialoguer::Confirm;
use relaunch_update::prompt::is_affirmative;
use relaunch_update::{Confirmation, SemVer};
use std::io::{BufRead, Write};
use tracing::debug;

/// Asks on the terminal. Without one, reads a `y`/`n` line from stdin;
/// anything unreadable means "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerPrompt;

impl Confirmation for DialoguerPrompt {
    fn confirm(&self, current: &SemVer, latest: &SemVer) -> bool {
        let question = format!(
            "A new version is available ({} → {}). Do you want to update?",
            current, latest
        );

        if console::user_attended() {
            let prompt = Confirm::new().with_prompt(&question).default(false);
            match prompt.interact() {
                Ok(yes) => return yes,
                Err(e) => debug!("Update prompt unavailable: {}", e),
            }
        }

        print!("{} (y/n) ", question);
        let _ = std::io::stdout().flush();
        read_answer(std::io::stdin().lock())
    }
}

/// Read one answer line; EOF or a read error is "no"
fn read_answer(mut reader: impl BufRead) -> bool {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => false,
        Ok(_) => is_affirmative(&line),
        Err(e) => {
            debug!("Could not read update answer: {}", e);
            false
        }
    }
}
