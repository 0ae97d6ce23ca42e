//! Simulated remote connections: the MegaCorp file share and the employee
//! portal. Both are multi-step prompt dialogs that mount a subtree under `~`
//! on success and record the connection in session flags.

use veneer_types::error::{Result, VeneerError};
use veneer_types::output::OutputBatch;
use veneer_vfs::{FsNode, ROOT, is_within, join_path};

use crate::interpreter::{Command, CommandOutcome, CommandRegistry, ShellContext};
use crate::prompt::PendingPrompt;
use crate::session::{FlagValue, SessionMutation};
use crate::world::{self, MEGACORP_MOUNT, PORTAL_BANNER, PORTAL_MOUNT};

const MEGACORP_CONNECTED: &str = "megacorp.connected";
const PORTAL_CONNECTED: &str = "portal.connected";
const PORTAL_ACCESS: &str = "portal.access";

/// Register network commands and the `portal` program.
pub fn register_network_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(MegacorpConnectCmd));
    reg.register(Box::new(MegacorpDisconnectCmd));
    reg.register_program(Box::new(PortalProgram));
}

/// Mount `node` at `~/<mount>` and set `flags`.
fn connect(mount: &str, node: FsNode, flags: Vec<(&str, FlagValue)>) -> CommandOutcome {
    log::info!("Connected {mount}");
    let mut outcome = CommandOutcome::new().mutate(SessionMutation::Mount {
        parent: ROOT.to_string(),
        name: mount.to_string(),
        node,
    });
    for (name, value) in flags {
        outcome = outcome.mutate(SessionMutation::SetFlag(name.to_string(), value));
    }
    outcome
}

/// Unmount `~/<mount>`, clear `flags`, and leave the mount if the session
/// is inside it.
fn disconnect(mount: &str, flags: &[&str], ctx: &ShellContext<'_>) -> CommandOutcome {
    log::info!("Disconnected {mount}");
    let mut outcome = CommandOutcome::line(format!("disconnected from {mount}")).mutate(
        SessionMutation::Unmount {
            parent: ROOT.to_string(),
            name: mount.to_string(),
        },
    );
    for &flag in flags {
        outcome = outcome.mutate(SessionMutation::ClearFlag(flag.to_string()));
    }
    if is_within(ctx.session.cwd(), &join_path(ROOT, mount)) {
        outcome = outcome.mutate(SessionMutation::SetCwd(ROOT.to_string()));
    }
    outcome
}

// ---------------------------------------------------------------------------
// megacorp-connect
// ---------------------------------------------------------------------------

struct MegacorpConnectCmd;
impl Command for MegacorpConnectCmd {
    fn name(&self) -> &str {
        "megacorp-connect"
    }
    fn description(&self) -> &str {
        "Connect to the MegaCorp file share"
    }
    fn usage(&self) -> &str {
        "megacorp-connect"
    }
    fn category(&self) -> &str {
        "network"
    }
    fn execute(&self, _args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        if ctx.session.flag_is_set(MEGACORP_CONNECTED) {
            return Err(VeneerError::AlreadyConnected(MEGACORP_MOUNT.to_string()));
        }
        Ok(CommandOutcome::ask(PendingPrompt::new(
            self.name(),
            "employee id: ",
            |employee_id, _| {
                let employee_id = employee_id.trim().to_string();
                Ok(CommandOutcome::ask(PendingPrompt::password(
                    "megacorp-connect",
                    "access code: ",
                    move |code, ctx| check_megacorp(&employee_id, code, ctx),
                )))
            },
        )))
    }
}

fn check_megacorp(employee_id: &str, code: &str, ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
    let expected = &ctx.config.megacorp;
    if employee_id != expected.employee_id || code != expected.access_code {
        log::warn!("MegaCorp share rejected employee id {employee_id}");
        return Err(VeneerError::AuthenticationFailed(employee_id.to_string()));
    }
    let mut outcome = connect(
        MEGACORP_MOUNT,
        world::megacorp_share(),
        vec![(MEGACORP_CONNECTED, FlagValue::Bool(true))],
    );
    let mut out = OutputBatch::line(format!("connected to MegaCorp file share as {employee_id}"));
    out.push_system(format!("share mounted at ~/{MEGACORP_MOUNT}"));
    outcome.output = out;
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// megacorp-disconnect
// ---------------------------------------------------------------------------

struct MegacorpDisconnectCmd;
impl Command for MegacorpDisconnectCmd {
    fn name(&self) -> &str {
        "megacorp-disconnect"
    }
    fn description(&self) -> &str {
        "Disconnect from the MegaCorp file share"
    }
    fn usage(&self) -> &str {
        "megacorp-disconnect"
    }
    fn category(&self) -> &str {
        "network"
    }
    fn execute(&self, _args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        if !ctx.session.flag_is_set(MEGACORP_CONNECTED) {
            return Err(VeneerError::NotConnected(MEGACORP_MOUNT.to_string()));
        }
        Ok(disconnect(MEGACORP_MOUNT, &[MEGACORP_CONNECTED], ctx))
    }
}

// ---------------------------------------------------------------------------
// portal (program behind ~/bin/portal.sh)
// ---------------------------------------------------------------------------

struct PortalProgram;
impl Command for PortalProgram {
    fn name(&self) -> &str {
        "portal"
    }
    fn description(&self) -> &str {
        "MegaCorp employee portal client"
    }
    fn usage(&self) -> &str {
        "./portal.sh [--status | --disconnect | --help]"
    }
    fn category(&self) -> &str {
        "network"
    }
    fn execute(&self, args: &[&str], ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
        let connected = ctx.session.flag_is_set(PORTAL_CONNECTED);
        match args.first().copied() {
            None if connected => Err(VeneerError::AlreadyConnected(PORTAL_MOUNT.to_string())),
            None => Ok(CommandOutcome::ask(PendingPrompt::new(
                self.name(),
                "username: ",
                ask_password,
            ))),
            Some("--help") => Ok(CommandOutcome::text(PORTAL_BANNER)),
            Some("--status") => {
                let line = match ctx.session.flag(PORTAL_ACCESS) {
                    Some(access) if connected => format!("portal: connected (access: {access})"),
                    _ => "portal: not connected".to_string(),
                };
                Ok(CommandOutcome::line(line))
            },
            Some("--disconnect") if connected => Ok(disconnect(
                PORTAL_MOUNT,
                &[PORTAL_CONNECTED, PORTAL_ACCESS],
                ctx,
            )),
            Some("--disconnect") => Err(VeneerError::NotConnected(PORTAL_MOUNT.to_string())),
            Some(other) => Err(VeneerError::InvalidOption(other.to_string())),
        }
    }
}

fn ask_password(username: &str, _ctx: &ShellContext<'_>) -> Result<CommandOutcome> {
    let username = username.trim().to_string();
    Ok(CommandOutcome::ask(PendingPrompt::password(
        "portal",
        "password: ",
        move |password, _| {
            let password = password.to_string();
            Ok(CommandOutcome::ask(PendingPrompt::new(
                "portal",
                "token: ",
                move |token, ctx| check_portal(&username, &password, token.trim(), ctx),
            )))
        },
    )))
}

fn check_portal(
    username: &str,
    password: &str,
    token: &str,
    ctx: &ShellContext<'_>,
) -> Result<CommandOutcome> {
    let expected = &ctx.config.portal;
    if username != expected.username || password != expected.password || token != expected.token
    {
        log::warn!("Portal rejected {username}");
        return Err(VeneerError::AuthenticationFailed(username.to_string()));
    }
    let mut outcome = connect(
        PORTAL_MOUNT,
        world::portal_tree(),
        vec![
            (PORTAL_CONNECTED, FlagValue::Bool(true)),
            (PORTAL_ACCESS, FlagValue::Text(expected.access.clone())),
        ],
    );
    let mut out = OutputBatch::line(format!("portal: signed in as {username}"));
    out.push_system(format!("access: {}", expected.access));
    out.push_system(format!("portal files mounted at ~/{PORTAL_MOUNT}"));
    outcome.output = out;
    Ok(outcome)
}
