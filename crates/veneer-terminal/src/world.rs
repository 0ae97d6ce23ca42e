//! Seed filesystem and the subtrees revealed by logins and connections.

use veneer_vfs::FsNode;

/// Mount name of the MegaCorp file share under `~`.
pub const MEGACORP_MOUNT: &str = "megacorp";
/// Mount name of the portal tree under `~`.
pub const PORTAL_MOUNT: &str = "portal";

/// Banner of `~/bin/portal.sh`, also printed by `./portal.sh --help`.
pub const PORTAL_BANNER: &str = "\
MegaCorp Employee Portal client v2.3
usage: ./portal.sh [--status | --disconnect | --help]
Run without arguments to sign in (username, password, one-time token).";

/// The home directory a new session starts in.
pub fn seed_filesystem() -> FsNode {
    FsNode::directory([
        (
            "readme.txt",
            FsNode::file(
                "Welcome back.\n\
                 Type 'help' to see what this terminal can do.\n\
                 Use 'ls -a' to include hidden files.",
            ),
        ),
        (
            "documents",
            FsNode::directory([
                (
                    "todo.txt",
                    FsNode::file(
                        "- renew parking permit\n\
                         - ask IT why the portal wants a token now\n\
                         - back up the journal before the audit",
                    ),
                ),
                (
                    "meeting-notes.txt",
                    FsNode::file(
                        "Q3 sync\n\
                         Share drive moved: use megacorp-connect from any terminal.\n\
                         Your employee id is on your badge (MC-xxxx).",
                    ),
                ),
                (
                    ".draft-resignation.txt",
                    FsNode::file("To whom it may concern,\n(unfinished)").hidden(),
                ),
            ]),
        ),
        (
            "mail",
            FsNode::directory([(
                "inbox",
                FsNode::directory([
                    (
                        "001-it-helpdesk.txt",
                        FsNode::file(
                            "From: IT Helpdesk\n\
                             Subject: Portal sign-in changes\n\
                             \n\
                             The portal now asks for a one-time token after your password.\n\
                             Tokens are printed on the card in your welcome pack.",
                        ),
                    ),
                    (
                        "002-jordan.txt",
                        FsNode::file(
                            "From: Jordan\n\
                             Subject: lunch?\n\
                             \n\
                             Same place as Friday. Bring the access code for the share,\n\
                             I keep forgetting mine. It's a flower, right?",
                        ),
                    ),
                ]),
            )]),
        ),
        (
            "bin",
            FsNode::directory([("portal.sh", FsNode::executable("portal", PORTAL_BANNER))]),
        ),
        (
            ".config",
            FsNode::directory([(
                "terminal.rc",
                FsNode::file("prompt=\"$CWD $ \"\nhistory=unlimited"),
            )])
            .hidden(),
        ),
    ])
}

/// A named subtree mounted at `~` by a successful login, as
/// `(mount name, node)`. `None` for names this world does not know.
pub fn reveal(name: &str) -> Option<(&'static str, FsNode)> {
    match name {
        "journal" => Some((
            ".journal",
            FsNode::directory([
                (
                    "2024-03-02.txt",
                    FsNode::file(
                        "The numbers in the Q3 report don't add up.\n\
                         Someone is moving money through the portal.",
                    ),
                ),
                (
                    "2024-03-09.txt",
                    FsNode::file("Copied the ledger to the share before they lock it."),
                ),
            ])
            .hidden(),
        )),
        "admin" => Some((
            "admin",
            FsNode::directory([
                (
                    "access.log",
                    FsNode::file(
                        "09:12 alex login ok\n\
                         09:40 portal token reset (alex.m)\n\
                         23:58 share export by unknown host",
                    ),
                ),
                (
                    "audit.sh",
                    FsNode::executable("audit", "Runs the nightly audit. Admins only."),
                ),
            ]),
        )),
        _ => None,
    }
}

/// The MegaCorp file share mounted by `megacorp-connect`.
pub fn megacorp_share() -> FsNode {
    FsNode::directory([
        (
            "announcements.txt",
            FsNode::file("All staff: the Q3 audit begins Monday."),
        ),
        (
            "finance",
            FsNode::directory([(
                "q3-ledger.csv",
                FsNode::file(
                    "account,amount,approved_by\n\
                     4471,12000,alex.m\n\
                     9002,880000,portal-service",
                ),
            )]),
        ),
    ])
}

/// The portal tree mounted by `./portal.sh`.
pub fn portal_tree() -> FsNode {
    FsNode::directory([
        (
            "profile.txt",
            FsNode::file("name: Alex M.\nrole: analyst\nclearance: staff"),
        ),
        (
            "messages",
            FsNode::directory([(
                "from-security.txt",
                FsNode::file("Unusual transfers flagged on service account portal-service."),
            )]),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_vfs::VirtualFs;

    #[test]
    fn seed_has_portal_program() {
        let fs = VirtualFs::from_root(seed_filesystem()).unwrap();
        let node = fs.lookup("~/bin/portal.sh").unwrap();
        assert!(matches!(&*node, FsNode::Executable { entry, .. } if entry == "portal"));
        assert_eq!(node.content(), Some(PORTAL_BANNER));
    }

    #[test]
    fn seed_has_no_revealed_content() {
        let fs = VirtualFs::from_root(seed_filesystem()).unwrap();
        assert!(!fs.exists("~/.journal"));
        assert!(!fs.exists("~/admin"));
        assert!(!fs.exists(&format!("~/{MEGACORP_MOUNT}")));
        assert!(!fs.exists(&format!("~/{PORTAL_MOUNT}")));
    }

    #[test]
    fn known_reveals() {
        let (name, node) = reveal("journal").unwrap();
        assert_eq!(name, ".journal");
        assert!(node.is_hidden());
        assert!(reveal("admin").is_some());
        assert!(reveal("nothing").is_none());
    }
}
