//! Optional parent-entity lookup for diff audit logs
//!
//! `command` and `leaderskill` records belong to a character; when one of
//! them changes upstream, naming the owning character makes the update log
//! reviewable. This is observational enrichment only: it never affects the
//! translation outcome and the diff engine runs fine without it.

use std::collections::HashMap;

use crate::masters::{Record, RecordId, Table};

const LEADER_SKILL_FIELDS: [&str; 8] = [
    "m_leader_skill_id",
    "additional_m_leader_skill_id",
    "m_leader_skill_id_sub_1",
    "additional_m_leader_skill_id_sub_1",
    "m_leader_skill_id_sub_2",
    "additional_m_leader_skill_id_sub_2",
    "m_leader_skill_id_sub_3",
    "additional_m_leader_skill_id_sub_3",
];

/// Character ownership index built from the translated `character` table and
/// the raw `charactercommand` link table.
pub struct CharacterIndex {
    characters: Vec<Record>,
    by_id: HashMap<RecordId, usize>,
    command_owner: HashMap<RecordId, RecordId>,
}

impl CharacterIndex {
    pub fn build(characters: Table, links: &Table) -> Self {
        let by_id = characters
            .records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| record.id().map(|id| (id, position)))
            .collect();
        let command_owner = links
            .records
            .iter()
            .filter_map(|record| {
                let command = record.get("m_command_id").and_then(RecordId::from_value)?;
                let character = record.get("m_character_id").and_then(RecordId::from_value)?;
                Some((command, character))
            })
            .collect();
        Self {
            characters: characters.records,
            by_id,
            command_owner,
        }
    }

    /// The character carrying `id` in any of its leader-skill slots.
    pub fn find_by_leader_skill(&self, id: &RecordId) -> Option<&Record> {
        self.characters.iter().find(|character| {
            LEADER_SKILL_FIELDS.iter().any(|field| {
                character
                    .get(field)
                    .and_then(RecordId::from_value)
                    .as_ref()
                    == Some(id)
            })
        })
    }

    /// The character owning command `id` via the link table.
    pub fn find_by_command(&self, id: &RecordId) -> Option<&Record> {
        let owner = self.command_owner.get(id)?;
        self.by_id
            .get(owner)
            .map(|&position| &self.characters[position])
    }
}
