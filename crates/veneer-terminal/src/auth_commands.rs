//! Login commands and the admin-only audit program.

use veneer_types::config::AccessLevel;
use veneer_types::error::{Result, VeneerError};
use veneer_types::output::OutputBatch;
use veneer_vfs::ROOT;

use crate::interpreter::{Command, CommandOutcome, CommandRegistry, ShellContext};
use crate::prompt::PendingPrompt;
use crate::session::SessionMutation;
use crate::world;

/// Register login commands and the `audit` program.
pub fn register_auth_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(LoginCmd));
    reg.register(Box::new(LogoutCmd));
    reg.register_program(Box::new(AuditProgram));
}

// ---------------------------------------------------------------------------
// login
// ---------------------------------------------------------------------------

struct LoginCmd;
impl Command for LoginCmd {
    fn name(&self) -> &str {
        "login"
    }
    fn description(&self) -> &str {
        "Sign in to this terminal"
    }
    fn usage(&self) -> &str {
        "login [username]"
    }
    fn category(&self) -> &str {
        "security"
    }
    fn execute(&self, args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        let username = args
            .first()
            .map_or_else(|| ctx.config.user.clone(), |u| (*u).to_string());
        let text = format!("password for {username}: ");
        Ok(CommandOutcome::ask(PendingPrompt::password(
            "login",
            text,
            move |password, ctx| check_password(&username, password, ctx),
        )))
    }
}

fn check_password(username: &str, password: &str, ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
    let Some(cred) = ctx
        .config
        .credential(username)
        .filter(|c| c.password == password)
    else {
        let attempts = ctx.session.login_attempts().saturating_add(1);
        log::warn!("Failed login for {username} (attempt {attempts})");
        let mut out = OutputBatch::error(format!(
            "login: {}",
            VeneerError::AuthenticationFailed(username.to_string())
        ));
        if attempts >= ctx.config.login.hint_after {
            out.push_system(ctx.config.login.hint.clone());
        }
        return Ok(CommandOutcome::with_output(out).mutate(SessionMutation::RecordFailedLogin));
    };

    log::info!("{username} logged in with {} access", cred.level);
    let mut out = OutputBatch::line(format!("welcome, {username}"));
    out.push_system(format!("access level: {}", cred.level));
    let mut outcome = CommandOutcome::new().mutate(SessionMutation::LogIn {
        username: username.to_string(),
        level: cred.level,
    });

    if let Some(reveal) = cred.reveal.as_deref() {
        match world::reveal(reveal) {
            Some((name, node)) => {
                out.push_system("new files are available in your home directory");
                outcome = outcome.mutate(SessionMutation::Mount {
                    parent: ROOT.to_string(),
                    name: name.to_string(),
                    node,
                });
            },
            None => log::warn!("Credential for {username} reveals unknown subtree {reveal}"),
        }
    }

    outcome.output = out;
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// logout
// ---------------------------------------------------------------------------

struct LogoutCmd;
impl Command for LogoutCmd {
    fn name(&self) -> &str {
        "logout"
    }
    fn description(&self) -> &str {
        "End the login session"
    }
    fn usage(&self) -> &str {
        "logout"
    }
    fn category(&self) -> &str {
        "security"
    }
    fn execute(&self, _args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        let Some(username) = ctx.session.username() else {
            return Err(VeneerError::NotLoggedIn);
        };
        log::info!("{username} logged out");
        Ok(CommandOutcome::line(format!("goodbye, {username}")).mutate(SessionMutation::LogOut))
    }
}

// ---------------------------------------------------------------------------
// audit (program behind ~/admin/audit.sh)
// ---------------------------------------------------------------------------

const ACCESS_LOG: &str = "~/admin/access.log";

struct AuditProgram;
impl Command for AuditProgram {
    fn name(&self) -> &str {
        "audit"
    }
    fn description(&self) -> &str {
        "Review the access log for unknown hosts"
    }
    fn usage(&self) -> &str {
        "./audit.sh"
    }
    fn execute(&self, _args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        if ctx.session.access_level() < Some(AccessLevel::Admin) {
            return Err(VeneerError::PermissionDenied(ACCESS_LOG.to_string()));
        }
        let node = ctx.fs.lookup(ACCESS_LOG)?;
        let log_text = node.content().unwrap_or_default();
        let entries: Vec<&str> = log_text.lines().filter(|l| !l.trim().is_empty()).collect();
        let flagged: Vec<&str> = entries
            .iter()
            .copied()
            .filter(|l| l.contains("unknown"))
            .collect();

        let mut out = OutputBatch::line(format!(
            "{} entries reviewed, {} flagged",
            entries.len(),
            flagged.len()
        ));
        for line in flagged {
            out.push_system(format!("  ! {line}"));
        }
        Ok(CommandOutcome::with_output(out))
    }
}
