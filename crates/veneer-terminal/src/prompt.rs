//! Pending prompts: a command that needs more input returns one of these,
//! and the engine hands it the next submitted line verbatim.

use std::fmt;

use veneer_types::error::Result;

use crate::interpreter::{CommandOutcome, ShellContext};

/// Boxed continuation invoked with the raw answer line.
pub type Continuation = Box<dyn FnOnce(&str, &ShellContext<'_>) -> Result<CommandOutcome>>;

/// A question waiting for the next submitted line.
///
/// Consumed exactly once by [`PendingPrompt::answer`]. The continuation may
/// return another prompt in its outcome to continue the dialog.
pub struct PendingPrompt {
    origin: String,
    text: String,
    password_mode: bool,
    continuation: Continuation,
}

impl PendingPrompt {
    /// A prompt whose answer is echoed as typed.
    ///
    /// `origin` names the command that owns the dialog; errors returned by
    /// the continuation are reported under that name.
    pub fn new<F>(origin: impl Into<String>, text: impl Into<String>, continuation: F) -> Self
    where
        F: FnOnce(&str, &ShellContext<'_>) -> Result<CommandOutcome> + 'static,
    {
        Self {
            origin: origin.into(),
            text: text.into(),
            password_mode: false,
            continuation: Box::new(continuation),
        }
    }

    /// A prompt whose answer is masked with `*` in the output log.
    pub fn password<F>(origin: impl Into<String>, text: impl Into<String>, continuation: F) -> Self
    where
        F: FnOnce(&str, &ShellContext<'_>) -> Result<CommandOutcome> + 'static,
    {
        Self {
            password_mode: true,
            ..Self::new(origin, text, continuation)
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Report continuation errors under `origin` instead.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Prompt text shown before the answer (e.g. `"password: "`).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_password(&self) -> bool {
        self.password_mode
    }

    /// How the answer appears in the output log.
    pub fn echo(&self, answer: &str) -> String {
        if self.password_mode {
            let masked: String = answer.chars().map(|_| '*').collect();
            format!("{}{masked}", self.text)
        } else {
            format!("{}{answer}", self.text)
        }
    }

    /// Run the continuation with the raw answer.
    pub fn answer(self, input: &str, ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        log::debug!("Answering prompt {:?} from {}", self.text, self.origin);
        (self.continuation)(input, ctx)
    }
}

impl fmt::Debug for PendingPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingPrompt")
            .field("origin", &self.origin)
            .field("text", &self.text)
            .field("password_mode", &self.password_mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    #[test]
    fn echo_masks_in_password_mode() {
        let p = PendingPrompt::password("login", "password: ", |_, _| Ok(CommandOutcome::new()));
        assert!(p.is_password());
        assert_eq!(p.echo("hunter2"), "password: *******");
    }

    #[test]
    fn echo_masks_per_character_not_byte() {
        let p = PendingPrompt::password("login", "pw: ", |_, _| Ok(CommandOutcome::new()));
        assert_eq!(p.echo("äö"), "pw: **");
    }

    #[test]
    fn echo_plain_shows_answer() {
        let p = PendingPrompt::new("x", "employee id: ", |_, _| Ok(CommandOutcome::new()));
        assert!(!p.is_password());
        assert_eq!(p.echo("MC-1"), "employee id: MC-1");
    }

    #[test]
    fn answer_receives_raw_line() {
        let fx = Fixture::new();
        let p = PendingPrompt::new("x", "say: ", |answer, _| {
            Ok(CommandOutcome::line(format!("[{answer}]")))
        });
        let out = p.answer("  two words \"q\" ", &fx.ctx()).unwrap();
        assert_eq!(out.output.lines()[0].text, "[  two words \"q\" ]");
    }

    #[test]
    fn with_origin_replaces_origin() {
        let p = PendingPrompt::new("portal", "token: ", |_, _| Ok(CommandOutcome::new()))
            .with_origin("./portal.sh");
        assert_eq!(p.origin(), "./portal.sh");
        assert_eq!(p.text(), "token: ");
    }

    #[test]
    fn debug_omits_continuation() {
        let p = PendingPrompt::new("login", "password: ", |_, _| Ok(CommandOutcome::new()));
        let dbg = format!("{p:?}");
        assert!(dbg.contains("password: "));
        assert!(dbg.contains("login"));
    }
}
