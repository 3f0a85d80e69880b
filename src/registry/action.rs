//! Second-level dispatch for `APP` nodes: what the selected integration action does.
//!
//! Action keys map to kinds through an exact-match table. A key that is not
//! listed resolves to `None` and gets the generic configuration form.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    SendMessage,
    CreateChannel,
    AddToTeam,
    RemoveFromTeam,
    InviteUser,
    CreateUser,
    RemoveUser,
    AssignLicense,
    RevokeLicense,
}

/// Configuration inputs a kind of action needs from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    Message,
    Channel,
    Team,
    Email,
    Role,
    License,
}

const ACTION_KEYS: &[(&str, ActionKind)] = &[
    ("SEND_MESSAGE", ActionKind::SendMessage),
    ("SEND_DIRECT_MESSAGE", ActionKind::SendMessage),
    ("POST_CHANNEL_MESSAGE", ActionKind::SendMessage),
    ("CREATE_CHANNEL", ActionKind::CreateChannel),
    ("ADD_TO_TEAM", ActionKind::AddToTeam),
    ("ADD_TO_GROUP", ActionKind::AddToTeam),
    ("REMOVE_FROM_TEAM", ActionKind::RemoveFromTeam),
    ("REMOVE_FROM_GROUP", ActionKind::RemoveFromTeam),
    ("INVITE_USER", ActionKind::InviteUser),
    ("CREATE_USER", ActionKind::CreateUser),
    ("REMOVE_USER", ActionKind::RemoveUser),
    ("DEACTIVATE_USER", ActionKind::RemoveUser),
    ("ASSIGN_LICENSE", ActionKind::AssignLicense),
    ("REVOKE_LICENSE", ActionKind::RevokeLicense),
];

impl ActionKind {
    pub fn from_key(key: &str) -> Option<ActionKind> {
        let key = key.trim();
        ACTION_KEYS
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, kind)| *kind)
    }

    pub fn config_fields(self) -> &'static [ConfigField] {
        match self {
            ActionKind::SendMessage => &[ConfigField::Channel, ConfigField::Message],
            ActionKind::CreateChannel => &[ConfigField::Channel],
            ActionKind::AddToTeam | ActionKind::RemoveFromTeam => &[ConfigField::Team],
            ActionKind::InviteUser => &[ConfigField::Email, ConfigField::Role],
            ActionKind::CreateUser => &[ConfigField::Email, ConfigField::Role],
            ActionKind::RemoveUser => &[ConfigField::Email],
            ActionKind::AssignLicense | ActionKind::RevokeLicense => &[ConfigField::License],
        }
    }
}
