//! Process roles and default serving ports
//!
//! A Porthole-serving process runs in one of three roles, each with its own
//! default port so editor, dedicated server and game client instances running
//! on the same machine do not collide.

use serde::{Deserialize, Serialize};

/// Default serving port for an editor process.
pub const DEFAULT_EDITOR_PORT: u16 = 8890;
/// Default serving port for a dedicated server process.
pub const DEFAULT_SERVER_PORT: u16 = 8891;
/// Default serving port for a game client process.
pub const DEFAULT_CLIENT_PORT: u16 = 8892;

/// The role of the hosting process, used to pick a default serving port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessRole {
    Editor,
    Server,
    #[default]
    Client,
}

impl ProcessRole {
    /// The default serving port for this role.
    pub fn default_port(&self) -> u16 {
        match self {
            ProcessRole::Editor => DEFAULT_EDITOR_PORT,
            ProcessRole::Server => DEFAULT_SERVER_PORT,
            ProcessRole::Client => DEFAULT_CLIENT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ports_distinct() {
        let ports = [
            ProcessRole::Editor.default_port(),
            ProcessRole::Server.default_port(),
            ProcessRole::Client.default_port(),
        ];
        assert_eq!(ports, [8890, 8891, 8892]);
    }
}
